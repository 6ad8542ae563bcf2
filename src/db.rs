/*! Sets up the application's database. */

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, bill::create_bill_table};

/// Create the tables for the domain models if they do not exist yet.
///
/// The tables are created in a single transaction, so either every table is
/// created or none are.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_bill_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
