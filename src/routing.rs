//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    bill::{
        check_proof_endpoint, create_bill_endpoint, get_bills_page, get_new_bill_page,
        get_proof_modal,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    session::{get_log_in_page, get_log_out, post_log_in, session_guard, session_guard_hx},
};

/// The largest request body accepted, sized for a proof image plus the form fields.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::BILLS_VIEW, get(get_bills_page))
        .route(endpoints::NEW_BILL_VIEW, get(get_new_bill_page))
        .route(endpoints::PROOF_MODAL, get(get_proof_modal))
        .nest_service(endpoints::PROOFS, ServeDir::new(&state.proof_dir))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard));

    // These POST routes need to use the HX-REDIRECT header for session redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::BILLS_API, post(create_bill_endpoint))
            .route(endpoints::CHECK_PROOF_API, post(check_proof_endpoint))
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                session_guard_hx,
            )),
    );

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the bills page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::BILLS_VIEW)
}


#[cfg(test)]
mod router_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::StatusCode;
    use axum_htmx::HX_REDIRECT;
    use axum_test::{
        TestResponse, TestServer,
        multipart::{MultipartForm, Part},
    };
    use rusqlite::Connection;

    use crate::{AppState, endpoints, session::COOKIE_USER};

    use super::build_router;

    fn get_test_server() -> TestServer {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let proof_dir = std::env::temp_dir().join(format!(
            "billed-router-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "nafstenoas",
            "Etc/UTC",
            proof_dir,
        )
        .unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn log_in(server: &TestServer, email: &str) -> TestResponse {
        server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", email), ("user_type", "Employee")])
            .await
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/nope").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bills_page_requires_session() {
        let server = get_test_server();

        let response = server.get(endpoints::BILLS_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn log_in_page_is_public() {
        let server = get_test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn submitted_bill_is_listed_and_proof_is_served() {
        let server = get_test_server();
        let cookie = log_in(&server, "e@e").await.cookie(COOKIE_USER);

        let form = MultipartForm::new()
            .add_text("type", "Transports")
            .add_text("name", "Vol Paris Londres")
            .add_text("date", "2004-04-04")
            .add_text("amount", "348")
            .add_text("vat", "70")
            .add_text("pct", "20")
            .add_text("commentary", "")
            .add_part(
                "file",
                Part::bytes(b"not really a png".to_vec())
                    .file_name("test.png")
                    .mime_type("image/png"),
            );

        let response = server
            .post(endpoints::BILLS_API)
            .add_cookie(cookie.clone())
            .multipart(form)
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::BILLS_VIEW);

        let response = server
            .get(endpoints::BILLS_VIEW)
            .add_cookie(cookie.clone())
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Vol Paris Londres"));
        assert!(text.contains("4 Avr. 04"));

        let response = server
            .get(&format!("{}/1-test.png", endpoints::PROOFS))
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        assert_eq!(response.as_bytes().as_ref(), b"not really a png");
    }

    #[tokio::test]
    async fn bills_are_scoped_to_session_email() {
        let server = get_test_server();
        let alice = log_in(&server, "alice@test.tld").await.cookie(COOKIE_USER);
        let bob = log_in(&server, "bob@test.tld").await.cookie(COOKIE_USER);

        let form = MultipartForm::new()
            .add_text("type", "Hôtel et logement")
            .add_text("name", "Hôtel de la gare")
            .add_text("date", "2004-04-04")
            .add_text("amount", "120")
            .add_part(
                "file",
                Part::bytes(b"jpeg".to_vec())
                    .file_name("facture.jpg")
                    .mime_type("image/jpeg"),
            );
        server
            .post(endpoints::BILLS_API)
            .add_cookie(alice)
            .multipart(form)
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let response = server.get(endpoints::BILLS_VIEW).add_cookie(bob).await;

        response.assert_status_ok();
        assert!(!response.text().contains("Hôtel de la gare"));
    }
}
