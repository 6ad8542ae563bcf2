use axum::{body::Body, http::header::CONTENT_TYPE, response::Response};
use axum_htmx::HX_REDIRECT;

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let got = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    assert_eq!(got, Some(content_type));
}

/// Assert that an HTMX request for `response` is sent on to `endpoint`.
#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let got = response
        .headers()
        .get(HX_REDIRECT)
        .and_then(|value| value.to_str().ok());

    assert_eq!(got, Some(endpoint), "want HX-Redirect to {endpoint}");
}
