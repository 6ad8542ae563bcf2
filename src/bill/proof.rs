//! The dialog showing the proof of a bill.

use axum::{
    extract::Query,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::html::BUTTON_SECONDARY_STYLE;

/// The query parameters for the proof dialog.
#[derive(Debug, Deserialize)]
pub struct ProofQuery {
    /// Where the proof file can be downloaded from.
    #[serde(default)]
    pub url: String,
}

/// Render the proof dialog for the proof at `url`.
///
/// The dialog replaces the `#modaleFile` placeholder of the bills page and
/// is shown open. A bill without a proof still gets the dialog, with a
/// placeholder text instead of the image.
pub async fn get_proof_modal(Query(query): Query<ProofQuery>) -> Response {
    proof_modal_view(query.url.trim()).into_response()
}

fn proof_modal_view(url: &str) -> Markup {
    html! {
        dialog
            id="modaleFile"
            open
            aria-labelledby="proof-modal-title"
            class="fixed inset-0 z-50 m-auto max-w-3xl w-full p-6 rounded-lg shadow-lg \
                bg-white dark:bg-gray-800 text-gray-900 dark:text-white"
        {
            div class="flex items-center justify-between mb-4"
            {
                h2 id="proof-modal-title" class="text-xl font-bold" { "Justificatif" }

                form method="dialog"
                {
                    button type="submit" aria-label="Fermer" class=(BUTTON_SECONDARY_STYLE) { "×" }
                }
            }

            div data-testid="bill-proof-container" class="flex justify-center"
            {
                @if url.is_empty() {
                    p class="text-gray-500 dark:text-gray-400" { "Aucun justificatif" }
                } @else {
                    img src=(url) alt="Justificatif" class="max-h-[70vh] object-contain";
                }
            }
        }
    }
}
