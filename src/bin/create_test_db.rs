use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use billed::{
    BillStatus, BillStore, BillUpdate, ExpenseType, NewProof, ProofFile, SqliteBillStore,
    initialize_db,
};

/// The smallest valid PNG: a single transparent pixel.
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

/// A utility for creating a test database for billed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The directory to save the sample proof files to.
    #[arg(long, default_value = "proofs")]
    proof_dir: String,

    /// The email the sample bills are filed under.
    #[arg(long, default_value = "employee@test.tld")]
    email: String,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let store = SqliteBillStore::new(Arc::new(Mutex::new(conn)), &args.proof_dir);

    let sample_bills = [
        (
            ExpenseType::Transports,
            "Vol Paris Londres",
            date!(2004 - 04 - 04),
            348.0,
            BillStatus::Pending,
        ),
        (
            ExpenseType::Restaurants,
            "Déjeuner client",
            date!(2003 - 03 - 03),
            42.5,
            BillStatus::Accepted,
        ),
        (
            ExpenseType::Hotel,
            "Hôtel de la gare",
            date!(2002 - 02 - 02),
            120.0,
            BillStatus::Refused,
        ),
    ];

    println!("Creating {} sample bills for {}...", sample_bills.len(), args.email);

    for (index, (bill_type, name, date, amount, status)) in sample_bills.into_iter().enumerate() {
        let bill = store
            .create(NewProof {
                email: args.email.clone(),
                file: ProofFile {
                    file_name: format!("preview-{index}.png"),
                    bytes: PLACEHOLDER_PNG.to_vec(),
                },
            })
            .await?;

        store
            .update(
                bill.id,
                BillUpdate {
                    bill_type,
                    name: name.to_owned(),
                    date,
                    amount,
                    vat: Some(amount / 6.0),
                    pct: 20,
                    commentary: String::new(),
                    status,
                },
            )
            .await?;
    }

    println!("Success!");

    Ok(())
}
