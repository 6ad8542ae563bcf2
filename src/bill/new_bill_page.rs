//! The page for sending a new bill.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        loading_spinner,
    },
    navigation::vertical_layout,
    timezone::get_local_offset,
};

use super::{
    core::ExpenseType,
    new_bill::{ACCEPTED_PROOF_EXTENSIONS, DEFAULT_VAT_PCT, NewBillState},
};

/// The proof file input.
///
/// Selecting a file posts it to [endpoints::CHECK_PROOF_API] for an early
/// format check. Set `swap_oob` to replace the input already on the page,
/// which clears the selected file.
pub(super) fn file_input(swap_oob: bool) -> Markup {
    let accept = ACCEPTED_PROOF_EXTENSIONS
        .iter()
        .map(|extension| format!(".{extension}"))
        .collect::<Vec<_>>()
        .join(",");

    html! {
        input
            type="file"
            name="file"
            id="file"
            data-testid="file"
            accept=(accept)
            required
            hx-post=(endpoints::CHECK_PROOF_API)
            hx-trigger="change"
            hx-encoding="multipart/form-data"
            hx-target="#proof-feedback"
            hx-swap="outerHTML"
            hx-swap-oob=[swap_oob.then_some("true")]
            class=(FORM_TEXT_INPUT_STYLE);
    }
}

fn new_bill_view(max_date: Date) -> Markup {
    let spinner = loading_spinner();

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                data-testid="form-new-bill"
                hx-post=(endpoints::BILLS_API)
                hx-encoding="multipart/form-data"
                enctype="multipart/form-data"
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                class="w-full space-y-4 md:space-y-6"
            {
                h1 class="text-2xl font-bold" { "Envoyer une note de frais" }

                div
                {
                    label for="expense-type" class=(FORM_LABEL_STYLE) { "Type de dépense" }

                    select
                        name="type"
                        id="expense-type"
                        data-testid="expense-type"
                        required
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for expense_type in ExpenseType::ALL {
                            option value=(expense_type) { (expense_type) }
                        }
                    }
                }

                div
                {
                    label for="expense-name" class=(FORM_LABEL_STYLE) { "Nom de la dépense" }

                    input
                        type="text"
                        name="name"
                        id="expense-name"
                        data-testid="expense-name"
                        placeholder="Vol Paris Londres"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="datepicker" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        type="date"
                        name="date"
                        id="datepicker"
                        data-testid="datepicker"
                        max=(max_date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Montant TTC" }

                    input
                        type="number"
                        name="amount"
                        id="amount"
                        data-testid="amount"
                        step="0.01"
                        placeholder="348"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex gap-4"
                {
                    div class="flex-1"
                    {
                        label for="vat" class=(FORM_LABEL_STYLE) { "TVA" }

                        input
                            type="number"
                            name="vat"
                            id="vat"
                            data-testid="vat"
                            step="0.01"
                            placeholder="70"
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div class="w-24"
                    {
                        label for="pct" class=(FORM_LABEL_STYLE) { "%" }

                        input
                            type="number"
                            name="pct"
                            id="pct"
                            data-testid="pct"
                            placeholder=(DEFAULT_VAT_PCT)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="commentary" class=(FORM_LABEL_STYLE) { "Commentaire" }

                    textarea
                        name="commentary"
                        id="commentary"
                        data-testid="commentary"
                        rows="3"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {}
                }

                div
                {
                    label for="file" class=(FORM_LABEL_STYLE) { "Justificatif" }

                    (file_input(false))

                    p id="proof-feedback" class="mt-1 text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Formats acceptés : png, jpg, jpeg."
                    }
                }

                button
                    type="submit"
                    id="btn-send-bill"
                    data-testid="btn-send-bill"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Envoyer"
                }
            }
        }
    };

    base(
        "Envoyer une note de frais",
        &vertical_layout(endpoints::NEW_BILL_VIEW, &content),
    )
}

/// Render the page for sending a new bill.
pub async fn get_new_bill_page(State(state): State<NewBillState>) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone)
    })?;

    let max_date = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    Ok(new_bill_view(max_date).into_response())
}
