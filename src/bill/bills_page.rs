//! The page listing the bills of the signed-in user.

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState,
    database_id::BillId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::vertical_layout,
    session::{Session, UserType},
};

use super::{
    core::BillRecord,
    format::{format_amount, format_date, format_status, parse_bill_date, sort_latest_first},
    store::{SharedBillStore, StoreError},
};

/// The state needed for the bills page.
#[derive(Debug, Clone)]
pub struct BillsState {
    /// The store holding the bills.
    pub bill_store: SharedBillStore,
}

impl FromRef<AppState> for BillsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            bill_store: state.bill_store.clone(),
        }
    }
}

/// A bill formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    /// The ID of the bill.
    pub id: BillId,
    /// The expense category label.
    pub bill_type: String,
    /// The name of the expense.
    pub name: String,
    /// The display date, or the raw stored value if it is not a valid date.
    pub date: String,
    /// The ISO 8601 date, if the stored date is valid.
    pub iso_date: Option<String>,
    /// The amount in euros, e.g. "€348.00".
    pub amount: String,
    /// The French status label, or the raw stored value if it is not a known status.
    pub status: String,
    /// Where the proof can be downloaded from, empty if the bill has no proof.
    pub file_url: String,
}

impl From<BillRecord> for BillRow {
    fn from(bill: BillRecord) -> Self {
        Self {
            id: bill.id,
            iso_date: parse_bill_date(&bill.date).map(|date| date.to_string()),
            date: format_date(&bill.date),
            amount: format_amount(bill.amount),
            status: format_status(&bill.status),
            file_url: bill.file_url.unwrap_or_default(),
            bill_type: bill.bill_type,
            name: bill.name,
        }
    }
}

/// Fetches and formats the bills of the session user.
pub struct Bills {
    store: Option<SharedBillStore>,
    session: Session,
}

impl Bills {
    pub fn new(store: Option<SharedBillStore>, session: Session) -> Self {
        Self { store, session }
    }

    /// Get the session user's bills, latest first and formatted for display.
    ///
    /// Employees only get their own bills, administrators get every bill.
    /// Returns `Ok(None)` if there is no store to fetch bills from.
    ///
    /// # Errors
    /// Returns the store's error if listing the bills fails.
    pub async fn get_bills(&self) -> Result<Option<Vec<BillRow>>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        let mut bills: Vec<BillRecord> = store
            .list()
            .await?
            .into_iter()
            .filter(|bill| self.can_see(bill))
            .collect();

        sort_latest_first(&mut bills);

        Ok(Some(bills.into_iter().map(BillRow::from).collect()))
    }

    fn can_see(&self, bill: &BillRecord) -> bool {
        match self.session.user_type {
            UserType::Admin => true,
            UserType::Employee => bill.email == self.session.email,
        }
    }
}

/// Render the bills page, or an error message if the bills could not be listed.
pub async fn get_bills_page(
    State(state): State<BillsState>,
    Extension(session): Extension<Session>,
) -> Response {
    let bills = Bills::new(Some(state.bill_store), session);

    match bills.get_bills().await {
        Ok(rows) => bills_view(&rows.unwrap_or_default()).into_response(),
        Err(error) => {
            tracing::error!("could not list bills: {error}");

            let status_code = StatusCode::from_u16(error.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            (status_code, bills_error_view(&error)).into_response()
        }
    }
}

fn bills_page(content: &Markup) -> Markup {
    base(
        "Mes notes de frais",
        &vertical_layout(endpoints::BILLS_VIEW, content),
    )
}

fn bills_view(rows: &[BillRow]) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex items-center justify-between mb-6"
            {
                h1 class="text-2xl font-bold" { "Mes notes de frais" }

                a
                    href=(endpoints::NEW_BILL_VIEW)
                    data-testid="btn-new-bill"
                    class={ (BUTTON_PRIMARY_STYLE) " max-w-xs text-center" }
                {
                    "Nouvelle note de frais"
                }
            }

            div class="relative overflow-x-auto shadow-md rounded-lg"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Nom" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Montant" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Statut" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody data-testid="tbody"
                    {
                        @for row in rows {
                            (bill_row_view(row))
                        }

                        @if rows.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="6" class={ (TABLE_CELL_STYLE) " text-center" }
                                {
                                    "Aucune note de frais pour le moment."
                                }
                            }
                        }
                    }
                }
            }

            div id="modaleFile" {}
        }
    };

    bills_page(&content)
}

fn bill_row_view(row: &BillRow) -> Markup {
    let proof_query = serde_json::json!({ "url": row.file_url }).to_string();

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (row.bill_type) }
            td class=(TABLE_CELL_STYLE) { (row.name) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(iso_date) = &row.iso_date {
                    time datetime=(iso_date) { (row.date) }
                } @else {
                    (row.date)
                }
            }
            td class=(TABLE_CELL_STYLE) { (row.amount) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(STATUS_BADGE_STYLE) { (row.status) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    title="Voir le justificatif"
                    data-testid="icon-eye"
                    data-bill-url=(row.file_url)
                    hx-get=(endpoints::PROOF_MODAL)
                    hx-vals=(proof_query)
                    hx-target="#modaleFile"
                    hx-swap="outerHTML"
                    class="text-blue-600 hover:text-blue-500 dark:text-blue-500"
                {
                    (eye_icon())
                }
            }
        }
    }
}

fn bills_error_view(error: &StoreError) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Mes notes de frais" }

            div
                data-testid="error-message"
                class="p-4 text-sm text-red-800 rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400"
            {
                "Erreur " (error.status_code())
            }
        }
    };

    bills_page(&content)
}

fn eye_icon() -> Markup {
    html!(
        svg
            aria-hidden="true"
            class="w-6 h-6"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            viewBox="0 0 24 24"
            xmlns="http://www.w3.org/2000/svg"
        {
            path d="M2 12s3.5-7 10-7 10 7 10 7-3.5 7-10 7S2 12 2 12z" {}
            circle cx="12" cy="12" r="3" {}
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Extension, extract::State, http::StatusCode, response::Response};
    use scraper::{Html, Selector};

    use crate::{
        bill::{
            StoreError,
            test_utils::{MockBillStore, TEST_EMAIL, bill_with_date},
        },
        session::{Session, UserType},
        test_utils::{assert_content_type, assert_valid_html, parse_html_document},
    };

    use super::{Bills, BillsState, get_bills_page};

    async fn render(store: MockBillStore, session: Session) -> Response {
        let state = BillsState {
            bill_store: Arc::new(store),
        };

        get_bills_page(State(state), Extension(session)).await
    }

    fn select_all(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn renders_bills_latest_first() {
        let store = MockBillStore::with_bills(vec![
            bill_with_date(1, "2001-01-01"),
            bill_with_date(2, "2004-04-04"),
            bill_with_date(3, "2003-03-03"),
            bill_with_date(4, "2002-02-02"),
        ]);

        let response = render(store, Session::employee(TEST_EMAIL)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let dates: Vec<_> = html
            .select(&Selector::parse("tbody time").unwrap())
            .filter_map(|time| time.value().attr("datetime"))
            .collect();
        assert_eq!(dates, ["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]);

        let mut sorted = dates.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[tokio::test]
    async fn shows_unparseable_values_unformatted() {
        let mut bill = bill_with_date(1, "pas de date");
        bill.status = "archived".to_owned();
        let store = MockBillStore::with_bills(vec![bill_with_date(2, "2004-04-04"), bill]);

        let response = render(store, Session::employee(TEST_EMAIL)).await;

        let html = parse_html_document(response).await;
        let cells = select_all(&html, "tbody td");
        assert!(cells.contains(&"4 Avr. 04".to_owned()), "got {cells:?}");
        assert!(cells.contains(&"pas de date".to_owned()), "got {cells:?}");
        assert!(cells.contains(&"archived".to_owned()), "got {cells:?}");
        assert!(cells.contains(&"En attente".to_owned()), "got {cells:?}");
        assert!(cells.contains(&"€400.00".to_owned()), "got {cells:?}");
    }

    #[tokio::test]
    async fn highlights_bills_icon() {
        let response = render(MockBillStore::new(), Session::employee(TEST_EMAIL)).await;

        let html = parse_html_document(response).await;
        let window_icon = html
            .select(&Selector::parse("[data-testid=icon-window]").unwrap())
            .next()
            .expect("No window icon found");
        assert!(
            window_icon
                .value()
                .classes()
                .any(|class| class == "active-icon")
        );
    }

    #[tokio::test]
    async fn each_row_has_eye_icon_with_proof_url() {
        let store = MockBillStore::with_bills(vec![
            bill_with_date(1, "2001-01-01"),
            bill_with_date(2, "2002-02-02"),
        ]);

        let response = render(store, Session::employee(TEST_EMAIL)).await;

        let html = parse_html_document(response).await;
        let urls: Vec<_> = html
            .select(&Selector::parse("[data-testid=icon-eye]").unwrap())
            .filter_map(|icon| icon.value().attr("data-bill-url"))
            .collect();
        assert_eq!(urls, ["/proofs/2-preview.jpg", "/proofs/1-preview.jpg"]);
        assert!(
            html.select(&Selector::parse("#modaleFile").unwrap())
                .next()
                .is_some(),
            "want placeholder for the proof dialog"
        );
    }

    #[tokio::test]
    async fn list_not_found_renders_erreur_404() {
        let store = MockBillStore::new().fail_list(StoreError::NotFound);

        let response = render(store, Session::employee(TEST_EMAIL)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_all(&html, "[data-testid=error-message]"),
            ["Erreur 404"]
        );
    }

    #[tokio::test]
    async fn list_failure_renders_erreur_500() {
        let store = MockBillStore::new().fail_list(StoreError::Internal("boom".to_owned()));

        let response = render(store, Session::employee(TEST_EMAIL)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        assert_eq!(
            select_all(&html, "[data-testid=error-message]"),
            ["Erreur 500"]
        );
    }

    #[tokio::test]
    async fn employee_only_gets_own_bills() {
        let mut other = bill_with_date(2, "2002-02-02");
        other.email = "someone@else.tld".to_owned();
        let store = Arc::new(MockBillStore::with_bills(vec![
            bill_with_date(1, "2001-01-01"),
            other,
        ]));

        let employee = Bills::new(Some(store.clone()), Session::employee(TEST_EMAIL));
        let admin = Bills::new(
            Some(store),
            Session {
                user_type: UserType::Admin,
                email: "admin@test.tld".to_owned(),
            },
        );

        let employee_ids: Vec<_> = employee
            .get_bills()
            .await
            .unwrap()
            .unwrap()
            .iter()
            .map(|row| row.id)
            .collect();
        let admin_ids: Vec<_> = admin
            .get_bills()
            .await
            .unwrap()
            .unwrap()
            .iter()
            .map(|row| row.id)
            .collect();

        assert_eq!(employee_ids, [1]);
        assert_eq!(admin_ids, [2, 1]);
    }

    #[tokio::test]
    async fn no_store_gives_no_bills() {
        let bills = Bills::new(None, Session::employee(TEST_EMAIL));

        assert_eq!(bills.get_bills().await, Ok(None));
    }
}
