use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    let status_code = StatusCode::NOT_FOUND;
    let page = error_view(
        "Page introuvable",
        status_code.as_u16(),
        "Cette page n'existe pas.",
        "Vérifiez l'adresse ou revenez à vos notes de frais.",
    );

    (status_code, page).into_response()
}
