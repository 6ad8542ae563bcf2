use axum::{body::Body, response::Response};
use scraper::{ElementRef, Html, Selector};

async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8_lossy(&body).to_string()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// Get the first element with `data-testid` set to `test_id`.
#[track_caller]
pub(crate) fn must_get_test_id<'a>(html: &'a Html, test_id: &str) -> ElementRef<'a> {
    html.select(&Selector::parse(&format!("[data-testid={test_id}]")).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No element with data-testid={test_id}"))
}

/// Get the headline of the alert in `html`.
#[track_caller]
pub(crate) fn must_get_alert_message(html: &Html) -> String {
    html.select(&Selector::parse("#alert-container [role=alert] p.font-semibold").unwrap())
        .next()
        .expect("No alert message found")
        .text()
        .collect::<String>()
        .trim()
        .to_owned()
}
