#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod logs;

pub(crate) use form::{assert_form_posts_to, assert_required_input, assert_submit_button, must_get_form};
pub(crate) use html::{
    assert_valid_html, must_get_alert_message, must_get_test_id, parse_html_document,
    parse_html_fragment,
};
pub(crate) use http::{assert_content_type, assert_hx_redirect};
pub(crate) use logs::capture_logs;
