//! Sending a new bill: proof file validation and form submission.

use std::path::Path;

use axum::{
    Extension,
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, alert::Alert, endpoints, session::Session, timezone::get_local_offset,
};

use super::{
    core::{BillRecord, BillStatus, BillUpdate, ExpenseType, NewProof, ProofFile},
    format::{parse_bill_date, round_to_cents},
    new_bill_page::file_input,
    store::SharedBillStore,
};

/// The file extensions accepted for proof files, compared case-insensitively.
pub const ACCEPTED_PROOF_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// The VAT rate used when the form leaves it empty.
pub const DEFAULT_VAT_PCT: i64 = 20;

/// Whether `file_name` has one of the [ACCEPTED_PROOF_EXTENSIONS].
pub fn is_accepted_proof(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            ACCEPTED_PROOF_EXTENSIONS
                .iter()
                .any(|accepted| extension.eq_ignore_ascii_case(accepted))
        })
}

/// The state needed for sending a new bill.
#[derive(Debug, Clone)]
pub struct NewBillState {
    /// The store holding the bills.
    pub bill_store: SharedBillStore,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewBillState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            bill_store: state.bill_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The fields of the new bill form, other than the proof file.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillForm {
    pub bill_type: ExpenseType,
    pub name: String,
    pub date: Date,
    pub amount: f64,
    pub vat: Option<f64>,
    /// The VAT rate in percent, [DEFAULT_VAT_PCT] if not given.
    pub pct: Option<i64>,
    pub commentary: String,
}

/// Tracks the proof file selected for a new bill and submits the bill to the store.
///
/// A bill can only be submitted once a proof with an accepted image format
/// has been selected.
pub struct NewBill {
    store: SharedBillStore,
    session: Session,
    file: Option<ProofFile>,
    file_name: Option<String>,
    is_img_format_valid: bool,
}

impl NewBill {
    pub fn new(store: SharedBillStore, session: Session) -> Self {
        Self {
            store,
            session,
            file: None,
            file_name: None,
            is_img_format_valid: false,
        }
    }

    /// The name of the last accepted proof file.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Whether the selected proof file has an accepted image format.
    pub fn is_img_format_valid(&self) -> bool {
        self.is_img_format_valid
    }

    /// Select `file` as the proof for the bill.
    ///
    /// A file that is not a png, jpg or jpeg image is rejected and clears the
    /// previously selected file, but the tracked file name is left as is.
    ///
    /// # Errors
    /// Returns [Error::InvalidProofFormat] if the file is rejected.
    pub fn handle_change_file(&mut self, file: ProofFile) -> Result<(), Error> {
        if !is_accepted_proof(&file.file_name) {
            tracing::debug!("Rejected proof file '{}'", file.file_name);

            self.file = None;
            self.is_img_format_valid = false;

            return Err(Error::InvalidProofFormat(file.file_name));
        }

        self.file_name = Some(file.file_name.clone());
        self.file = Some(file);
        self.is_img_format_valid = true;

        Ok(())
    }

    /// Send the bill described by `form` with the selected proof.
    ///
    /// The proof is uploaded first, which creates a pending bill, and the
    /// bill is then filled in with the form fields.
    ///
    /// # Errors
    /// Returns [Error::MissingProof] without calling the store if no valid
    /// proof is selected, or [Error::Store] if the store rejects either call.
    pub async fn handle_submit(&self, form: NewBillForm) -> Result<BillRecord, Error> {
        let Some(file) = self.file.as_ref().filter(|_| self.is_img_format_valid) else {
            return Err(Error::MissingProof);
        };

        let bill = self
            .store
            .create(NewProof {
                email: self.session.email.clone(),
                file: file.clone(),
            })
            .await
            .inspect_err(|error| tracing::error!("could not upload proof: {error}"))?;

        let update = BillUpdate {
            bill_type: form.bill_type,
            name: form.name,
            date: form.date,
            amount: form.amount,
            vat: form.vat,
            pct: form.pct.unwrap_or(DEFAULT_VAT_PCT),
            commentary: form.commentary,
            status: BillStatus::Pending,
        };

        let bill = self
            .store
            .update(bill.id, update)
            .await
            .inspect_err(|error| tracing::error!("could not update bill {}: {error}", bill.id))?;

        Ok(bill)
    }
}

/// A route handler for sending a new bill, redirects to the bills page on success.
pub async fn create_bill_endpoint(
    State(state): State<NewBillState>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Response {
    let (form, file) = match parse_new_bill_form(multipart).await {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::debug!("Rejected new bill form: {error}");
            return error.into_alert_response();
        }
    };

    let Some(local_timezone) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let now_local_time = OffsetDateTime::now_utc().to_offset(local_timezone);

    if form.date > now_local_time.date() {
        tracing::debug!("Rejected bill with future date {}", form.date);
        return Error::FutureDate(form.date).into_alert_response();
    }

    let mut new_bill = NewBill::new(state.bill_store, session);

    let Some(file) = file else {
        return Error::MissingProof.into_alert_response();
    };

    if let Err(error) = new_bill.handle_change_file(file) {
        return error.into_alert_response();
    }

    match new_bill.handle_submit(form).await {
        Ok(bill) => {
            tracing::info!("Created bill {} for {}", bill.id, bill.email);

            (
                HxRedirect(endpoints::BILLS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

/// A route handler that checks the format of a proof file when it is selected.
///
/// Responds with feedback for the `#proof-feedback` element. A rejected file
/// also gets an alert and a fresh file input that replaces the one holding
/// the rejected file.
pub async fn check_proof_endpoint(mut multipart: Multipart) -> Response {
    let mut file_name = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                file_name = field.file_name().map(str::to_owned);
                break;
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(error) => {
                tracing::debug!("Could not read proof check form: {error}");
                return Error::MultipartError(error.to_string()).into_alert_response();
            }
        }
    }

    let file_name = file_name.unwrap_or_default();

    if file_name.is_empty() {
        return proof_feedback("Aucun fichier sélectionné.", false).into_response();
    }

    if is_accepted_proof(&file_name) {
        return proof_feedback(&format!("Fichier sélectionné : {file_name}"), false)
            .into_response();
    }

    let alert = Alert::Error {
        message: "Format de fichier non accepté".to_owned(),
        details: format!("Le justificatif \"{file_name}\" doit être une image png, jpg ou jpeg."),
    };

    html! {
        (proof_feedback("Formats acceptés : png, jpg, jpeg.", true))
        (file_input(true))
        (alert.into_html())
    }
    .into_response()
}

fn proof_feedback(message: &str, is_error: bool) -> Markup {
    let style = if is_error {
        "mt-1 text-sm text-red-600 dark:text-red-500"
    } else {
        "mt-1 text-sm text-gray-500 dark:text-gray-400"
    };

    html! {
        p id="proof-feedback" data-testid="proof-feedback" class=(style) { (message) }
    }
}

/// Read the new bill form fields and the proof file from `multipart`.
///
/// The proof is `None` if the form has no file or an empty one.
async fn parse_new_bill_form(
    mut multipart: Multipart,
) -> Result<(NewBillForm, Option<ProofFile>), Error> {
    let mut bill_type = None;
    let mut name = String::new();
    let mut date = None;
    let mut amount = None;
    let mut vat = None;
    let mut pct = None;
    let mut commentary = String::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let Some(field_name) = field.name().map(str::to_owned) else {
            continue;
        };

        match field_name.as_str() {
            "file" => file = read_proof_file(field).await?,
            "type" => {
                let value = read_text(field).await?;
                bill_type = Some(ExpenseType::parse(value.trim()).ok_or_else(|| {
                    Error::InvalidForm(format!("\"{value}\" n'est pas un type de dépense."))
                })?);
            }
            "name" => name = read_text(field).await?.trim().to_owned(),
            "date" => {
                let value = read_text(field).await?;
                date = Some(parse_bill_date(&value).ok_or_else(|| {
                    Error::InvalidForm(format!("\"{value}\" n'est pas une date valide."))
                })?);
            }
            "amount" => amount = parse_number(&read_text(field).await?, "montant")?,
            "vat" => vat = parse_number(&read_text(field).await?, "TVA")?,
            "pct" => {
                let value = read_text(field).await?;
                let value = value.trim();
                pct = if value.is_empty() {
                    None
                } else {
                    Some(value.parse::<i64>().map_err(|_| {
                        Error::InvalidForm(format!("\"{value}\" n'est pas un pourcentage."))
                    })?)
                };
            }
            "commentary" => commentary = read_text(field).await?,
            other => tracing::debug!("Ignoring unknown form field '{other}'"),
        }
    }

    let form = NewBillForm {
        bill_type: bill_type
            .ok_or_else(|| Error::InvalidForm("Le type de dépense est requis.".to_owned()))?,
        name,
        date: date.ok_or_else(|| Error::InvalidForm("La date est requise.".to_owned()))?,
        amount: amount.ok_or_else(|| Error::InvalidForm("Le montant est requis.".to_owned()))?,
        vat,
        pct,
        commentary,
    };

    Ok((form, file))
}

async fn read_text(field: Field<'_>) -> Result<String, Error> {
    field.text().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError(error.to_string())
    })
}

async fn read_proof_file(field: Field<'_>) -> Result<Option<ProofFile>, Error> {
    let file_name = field.file_name().unwrap_or_default().to_owned();

    let bytes = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read proof file from multipart form field: {error}");
        Error::MultipartError(error.to_string())
    })?;

    if file_name.is_empty() {
        return Ok(None);
    }

    tracing::debug!("Received file '{}' that is {} bytes", file_name, bytes.len());

    Ok(Some(ProofFile {
        file_name,
        bytes: bytes.to_vec(),
    }))
}

/// Parse an optional amount field rounded to the cent, empty values are `None`.
fn parse_number(value: &str, label: &str) -> Result<Option<f64>, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .map(|number| Some(round_to_cents(number)))
        .ok_or_else(|| Error::InvalidForm(format!("\"{value}\" n'est pas un {label} valide.")))
}
