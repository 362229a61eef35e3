//! Test doubles shared by the unit test modules.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use shared::{
    domain::{Bill, BillId, BillStatus},
    protocol::{BillPatch, NewBill},
};

use crate::{
    document::ModalContainer, error::StoreError, navigator::NavigateHandle, ModalPresenter,
    RemoteBillsService,
};

pub fn bill(id: &str, date: &str, file_url: Option<&str>) -> Bill {
    Bill {
        id: BillId(id.into()),
        date: date.into(),
        amount: 100.0,
        status: BillStatus::Pending,
        kind: "Transports".into(),
        name: format!("bill {id}"),
        commentary: String::new(),
        file_url: file_url.map(str::to_string),
        file_name: None,
        email: Some("a@a".into()),
        vat: None,
        pct: None,
        comment_admin: None,
    }
}

/// Four bills in fetch order, not sorted by date.
pub fn fixture_bills() -> Vec<Bill> {
    vec![
        bill("b1", "2004-04-04", Some("https://example.test/1.jpg")),
        bill("b2", "2001-01-01", Some("https://example.test/2.jpg")),
        bill("b3", "2003-03-03", Some("https://example.test/3.jpg")),
        bill("b4", "2002-02-02", Some("https://example.test/4.jpg")),
    ]
}

pub struct StubBills {
    result: Result<Vec<Bill>, StoreError>,
    calls: AtomicUsize,
}

impl StubBills {
    pub fn ok(bills: Vec<Bill>) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(bills),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Err(StoreError::Rejected(message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteBillsService for StubBills {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }

    async fn create(&self, _bill: NewBill) -> Result<Bill, StoreError> {
        Err(StoreError::Rejected("read-only stub".into()))
    }

    async fn update(&self, _id: &BillId, _patch: BillPatch) -> Result<Bill, StoreError> {
        Err(StoreError::Rejected("read-only stub".into()))
    }
}

#[derive(Default)]
pub struct CountingModal {
    shows: AtomicUsize,
}

impl CountingModal {
    pub fn shows(&self) -> usize {
        self.shows.load(Ordering::SeqCst)
    }
}

impl ModalPresenter for CountingModal {
    fn show_modal(&self, modal: &mut ModalContainer) {
        self.shows.fetch_add(1, Ordering::SeqCst);
        modal.shown = true;
    }
}

/// Navigate callback that only records the requested paths.
pub fn recording_navigate() -> (NavigateHandle, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handle = NavigateHandle::from_fn(move |path| {
        sink.lock().expect("navigate log").push(path.to_string());
    });
    (handle, seen)
}
