//! Defines the core data models for bills.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::database_id::BillId;

// ============================================================================
// MODELS
// ============================================================================

/// An expense an employee submitted for reimbursement, as held by the bill store.
///
/// `date` and `status` are kept exactly as the store returned them, so that
/// a record with a malformed value can still be displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRecord {
    /// The ID of the bill.
    pub id: BillId,
    /// The email of the employee who submitted the bill.
    pub email: String,
    /// The expense category, e.g. "Transports".
    pub bill_type: String,
    /// The name of the expense, usually the vendor or a short description.
    pub name: String,
    /// When the expense happened, normally an ISO 8601 date, e.g. "2004-04-04".
    pub date: String,
    /// The amount spent, VAT included.
    pub amount: f64,
    /// The VAT paid, if known.
    pub vat: Option<f64>,
    /// The VAT rate in percent.
    pub pct: i64,
    /// Free text from the employee.
    pub commentary: String,
    /// Where the proof file can be downloaded from.
    pub file_url: Option<String>,
    /// The name of the uploaded proof file.
    pub file_name: Option<String>,
    /// The review status, normally one of "pending", "accepted" or "refused".
    pub status: String,
}

/// Where a bill is in the review process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Waiting for an administrator to review it.
    Pending,
    /// Accepted for reimbursement.
    Accepted,
    /// Refused for reimbursement.
    Refused,
}

impl BillStatus {
    /// The value stored for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }

    /// Parse a stored status value.
    ///
    /// Returns `None` if `value` is not a known status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(BillStatus::Pending),
            "accepted" => Some(BillStatus::Accepted),
            "refused" => Some(BillStatus::Refused),
            _ => None,
        }
    }

    /// The French label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refusé",
        }
    }
}

/// The categories an expense can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseType {
    /// Flights, trains, taxis, etc.
    Transports,
    /// Meals and drinks.
    Restaurants,
    /// Hotels and other accommodation.
    Hotel,
    /// Subscriptions and other online services.
    OnlineServices,
    /// Computers and electronics.
    It,
    /// Equipment and hardware.
    Equipment,
    /// Office supplies.
    OfficeSupplies,
}

impl ExpenseType {
    /// Every expense type, in the order they are offered in the form.
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Transports,
        ExpenseType::Restaurants,
        ExpenseType::Hotel,
        ExpenseType::OnlineServices,
        ExpenseType::It,
        ExpenseType::Equipment,
        ExpenseType::OfficeSupplies,
    ];

    /// The label shown to users and stored with the bill.
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::Restaurants => "Restaurants et bars",
            ExpenseType::Hotel => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::It => "IT et électronique",
            ExpenseType::Equipment => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
        }
    }

    /// Parse the label of an expense type.
    ///
    /// Returns `None` if `value` is not a known label.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|expense_type| expense_type.as_str() == value)
    }
}

impl Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A proof file uploaded by an employee.
#[derive(Debug, Clone, PartialEq)]
pub struct ProofFile {
    /// The file name as given by the browser, e.g. "receipt.jpg".
    pub file_name: String,
    /// The contents of the file.
    pub bytes: Vec<u8>,
}

/// The data needed to upload the proof for a new bill.
///
/// Creating a bill from a proof yields a pending bill that only has the
/// submitter's email and the proof set. The rest is filled in with a [BillUpdate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewProof {
    /// The email of the employee submitting the bill.
    pub email: String,
    /// The proof file.
    pub file: ProofFile,
}

/// The fields of a bill that are written when an employee submits it.
#[derive(Debug, Clone, PartialEq)]
pub struct BillUpdate {
    /// The expense category.
    pub bill_type: ExpenseType,
    /// The name of the expense.
    pub name: String,
    /// When the expense happened.
    pub date: Date,
    /// The amount spent, VAT included.
    pub amount: f64,
    /// The VAT paid, if known.
    pub vat: Option<f64>,
    /// The VAT rate in percent.
    pub pct: i64,
    /// Free text from the employee.
    pub commentary: String,
    /// The review status.
    pub status: BillStatus,
}
