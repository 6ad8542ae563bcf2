//! Bills: expenses submitted by employees along with the proof of the expense.
//!
//! This module contains everything related to bills:
//! - The `BillRecord` model and the types used to create and update bills
//! - The `BillStore` interface to the bills collection and its SQLite implementation
//! - View handlers for listing bills, viewing a proof and sending a new bill

mod bills_page;
mod core;
mod format;
mod new_bill;
mod new_bill_page;
mod proof;
mod sqlite_store;
mod store;

#[cfg(test)]
mod test_utils;

pub use bills_page::get_bills_page;
pub use self::core::{BillRecord, BillStatus, BillUpdate, ExpenseType, NewProof, ProofFile};
pub use new_bill::{check_proof_endpoint, create_bill_endpoint};
pub use new_bill_page::get_new_bill_page;
pub use proof::get_proof_modal;
pub use sqlite_store::{SqliteBillStore, create_bill_table};
pub use store::{BillStore, SharedBillStore, StoreError};
