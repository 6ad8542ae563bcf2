use std::sync::{
    RwLock,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::database_id::BillId;

use super::{
    core::{BillRecord, BillUpdate, NewProof},
    store::{BillStore, StoreError},
};

pub const TEST_EMAIL: &str = "employee@test.tld";

/// An in-memory bill store that counts calls and can be told to fail.
#[derive(Debug, Default)]
pub struct MockBillStore {
    bills: RwLock<Vec<BillRecord>>,
    list_error: Option<StoreError>,
    create_error: Option<StoreError>,
    update_error: Option<StoreError>,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl MockBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bills(bills: Vec<BillRecord>) -> Self {
        Self {
            bills: RwLock::new(bills),
            ..Self::default()
        }
    }

    pub fn fail_list(mut self, error: StoreError) -> Self {
        self.list_error = Some(error);
        self
    }

    pub fn fail_create(mut self, error: StoreError) -> Self {
        self.create_error = Some(error);
        self
    }

    pub fn fail_update(mut self, error: StoreError) -> Self {
        self.update_error = Some(error);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn bills(&self) -> Vec<BillRecord> {
        self.bills.read().unwrap().clone()
    }
}

#[async_trait]
impl BillStore for MockBillStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        if let Some(error) = &self.list_error {
            return Err(error.clone());
        }

        Ok(self.bills())
    }

    async fn create(&self, proof: NewProof) -> Result<BillRecord, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.create_error {
            return Err(error.clone());
        }

        let mut bills = self.bills.write().unwrap();
        let id = bills.len() as BillId + 1;
        let bill = BillRecord {
            id,
            email: proof.email,
            bill_type: String::new(),
            name: String::new(),
            date: String::new(),
            amount: 0.0,
            vat: None,
            pct: 20,
            commentary: String::new(),
            file_url: Some(format!("/proofs/{id}-{}", proof.file.file_name)),
            file_name: Some(proof.file.file_name),
            status: "pending".to_owned(),
        };
        bills.push(bill.clone());

        Ok(bill)
    }

    async fn update(&self, id: BillId, update: BillUpdate) -> Result<BillRecord, StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = &self.update_error {
            return Err(error.clone());
        }

        let mut bills = self.bills.write().unwrap();
        let bill = bills
            .iter_mut()
            .find(|bill| bill.id == id)
            .ok_or(StoreError::NotFound)?;

        bill.bill_type = update.bill_type.as_str().to_owned();
        bill.name = update.name;
        bill.date = update.date.to_string();
        bill.amount = update.amount;
        bill.vat = update.vat;
        bill.pct = update.pct;
        bill.commentary = update.commentary;
        bill.status = update.status.as_str().to_owned();

        Ok(bill.clone())
    }
}

/// A bill owned by [TEST_EMAIL] with the given raw `date`.
pub fn bill_with_date(id: BillId, date: &str) -> BillRecord {
    BillRecord {
        id,
        email: TEST_EMAIL.to_owned(),
        bill_type: "Hôtel et logement".to_owned(),
        name: format!("encore {id}"),
        date: date.to_owned(),
        amount: 400.0,
        vat: Some(80.0),
        pct: 20,
        commentary: "séminaire billed".to_owned(),
        file_url: Some(format!("/proofs/{id}-preview.jpg")),
        file_name: Some("preview.jpg".to_owned()),
        status: "pending".to_owned(),
    }
}
