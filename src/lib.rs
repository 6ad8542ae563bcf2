//! Billed is a web app for employees to submit their expense reports ("bills")
//! and the receipts that prove them.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod bill;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod session;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use bill::{
    BillRecord, BillStatus, BillStore, BillUpdate, ExpenseType, NewProof, ProofFile,
    SharedBillStore, SqliteBillStore, StoreError,
};
pub use database_id::BillId;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::{Session, UserType};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The proof file does not have one of the accepted image extensions.
    ///
    /// Callers should pass in the rejected file name.
    #[error("\"{0}\" is not a png, jpg or jpeg image")]
    InvalidProofFormat(String),

    /// A bill was submitted without a proof file.
    #[error("a proof file is required")]
    MissingProof,

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// A form field was missing or could not be parsed.
    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// A date in the future was used for an expense.
    ///
    /// Bills record expenses that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The session cookie is missing or could not be read.
    #[error("no session user in the cookie jar")]
    SessionMissing,

    /// The session user could not be serialized to JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The bill store rejected a request.
    #[error("bill store error: {0}")]
    Store(#[from] StoreError),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {error}");
        Error::SqlError(error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Store(StoreError::NotFound) => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidProofFormat(file_name) => Alert::Error {
                message: "Format de fichier non accepté".to_owned(),
                details: format!(
                    "Le justificatif \"{file_name}\" doit être une image png, jpg ou jpeg."
                ),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::MissingProof => Alert::ErrorSimple {
                message: "Veuillez joindre un justificatif.".to_owned(),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidForm(reason) => Alert::Error {
                message: "Formulaire invalide".to_owned(),
                details: reason,
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::FutureDate(date) => Alert::Error {
                message: "Date invalide".to_owned(),
                details: format!("{date} est dans le futur, choisissez une date passée."),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::MultipartError(_) => Alert::ErrorSimple {
                message: "Le formulaire n'a pas pu être lu.".to_owned(),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            Error::Store(error) => {
                let status_code = error.status_code();
                Alert::Error {
                    message: format!("Erreur {status_code}"),
                    details: "La note de frais n'a pas pu être envoyée. Veuillez réessayer."
                        .to_owned(),
                }
                .into_response_with_status(
                    StatusCode::from_u16(status_code)
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                )
            }
            _ => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
