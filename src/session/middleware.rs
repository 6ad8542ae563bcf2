//! Session middleware that passes the signed-in user to route handlers, or redirects to the sign in page.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;

use crate::endpoints;

use super::{SessionState, get_session_from_cookies};

#[inline]
async fn session_guard_internal(
    state: SessionState,
    mut request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let jar = PrivateCookieJar::from_headers(request.headers(), state.cookie_key);

    let session = match get_session_from_cookies(&jar) {
        Ok(session) => session,
        Err(_) => {
            tracing::debug!(
                "No session for request to {}. Redirecting to sign in page.",
                request.uri().path()
            );
            return get_redirect(endpoints::LOG_IN_VIEW);
        }
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Middleware function that checks for a session cookie.
/// The session is placed into the request and the request executed normally if the cookie is valid, otherwise a redirect to the sign in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(session): Extension<Session>` to receive the session.
pub async fn session_guard(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    session_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for a session cookie.
/// The session is placed into the request and the request executed normally if the cookie is valid, otherwise a HTMX redirect to the sign in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(session): Extension<Session>` to receive the session.
pub async fn session_guard_hx(
    State(state): State<SessionState>,
    request: Request,
    next: Next,
) -> Response {
    session_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod session_guard_tests {
    use axum::{
        Extension, Router,
        extract::State,
        http::StatusCode,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use sha2::Digest;

    use crate::{
        Error, endpoints,
        session::{COOKIE_USER, Session, SessionState, set_session_cookie},
    };

    use super::{session_guard, session_guard_hx};

    async fn test_handler(Extension(session): Extension<Session>) -> String {
        session.email
    }

    async fn stub_log_in_route(
        State(_state): State<SessionState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_session_cookie(jar, &Session::employee("e@e"))
    }

    const TEST_LOG_IN_ROUTE: &str = "/log_in";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";

    fn get_test_server() -> TestServer {
        let hash = sha2::Sha512::digest("nafstenoas");
        let state = SessionState {
            cookie_key: Key::from(&hash),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), session_guard))
            .merge(
                Router::new()
                    .route(TEST_API_ROUTE, post(test_handler))
                    .route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        session_guard_hx,
                    )),
            )
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn passes_session_to_handler() {
        let server = get_test_server();
        let response = server.post(TEST_LOG_IN_ROUTE).await;
        response.assert_status_ok();
        let session_cookie = response.cookie(COOKIE_USER);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(session_cookie)
            .await;

        response.assert_status_ok();
        response.assert_text("e@e");
    }

    #[tokio::test]
    async fn redirects_to_log_in_without_session() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn hx_redirects_to_log_in_without_session() {
        let server = get_test_server();

        let response = server.post(TEST_API_ROUTE).await;

        response.assert_status_ok();
        assert_eq!(response.header(HX_REDIRECT), endpoints::LOG_IN_VIEW);
    }
}
