//! The sign in page and the endpoints for signing a user in and out.
//!
//! Signing in only records who the user is; there is no password check.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner},
};

use super::{Session, UserType, invalidate_session_cookie, set_session_cookie};

fn log_in_view() -> Markup {
    let spinner = loading_spinner();

    let content = html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            div class="w-full bg-white rounded-lg shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        "Billed"
                    }

                    form
                        hx-post=(endpoints::LOG_IN_API)
                        hx-indicator="#indicator"
                        hx-target-error="#alert-container"
                        class="space-y-4 md:space-y-6"
                    {
                        div
                        {
                            label for="email" class=(FORM_LABEL_STYLE) { "Votre email" }

                            input
                                type="email"
                                name="email"
                                id="email"
                                placeholder="johndoe@email.com"
                                required
                                autofocus
                                class=(FORM_TEXT_INPUT_STYLE);
                        }

                        div
                        {
                            label for="user_type" class=(FORM_LABEL_STYLE) { "Vous êtes" }

                            select name="user_type" id="user_type" class=(FORM_TEXT_INPUT_STYLE)
                            {
                                option value="Employee" selected { "Employé" }
                                option value="Admin" { "Administrateur" }
                            }
                        }

                        button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span id="indicator" class="inline htmx-indicator" { (spinner) }
                            " Se connecter"
                        }
                    }
                }
            }
        }
    };

    base("Connexion", &content)
}

/// Display the sign in page.
pub async fn get_log_in_page() -> Response {
    log_in_view().into_response()
}

/// The data sent by the sign in form.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The email the user signs in with.
    pub email: String,
    /// Whether the user is an employee or an administrator.
    pub user_type: UserType,
}

/// Store the user in the session cookie and redirect to the bills page.
pub async fn post_log_in(jar: PrivateCookieJar, Form(data): Form<LogInData>) -> Response {
    let email = data.email.trim();

    if email.is_empty() {
        return Error::InvalidForm("Veuillez saisir votre email.".to_owned()).into_alert_response();
    }

    let session = Session {
        user_type: data.user_type,
        email: email.to_owned(),
    };

    match set_session_cookie(jar, &session) {
        Ok(jar) => (
            jar,
            HxRedirect(endpoints::BILLS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set session cookie: {error}");
            error.into_alert_response()
        }
    }
}

/// Remove the session cookie and redirect to the sign in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
