//! Employee bill list: fetch, normalize, sort, render, and receipt preview.

use std::sync::Arc;

use shared::domain::{Bill, BillId, Role};
use tracing::{debug, info, warn};

use crate::{
    document::{PreviewIcon, RenderTarget},
    error::StoreError,
    navigator::NavigateHandle,
    presentation::{
        compare_by_date_descending, format_display_date, format_status_label, parse_bill_date,
    },
    routes::RoutePath,
    session::current_user,
    views::{escape, ViewProps, ViewRegistry},
    ModalPresenter, RemoteBillsService, SessionStore,
};

pub const PREVIEW_PLACEHOLDER: &str = "Aucun justificatif";

/// One bill as displayed: date and status already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRow {
    pub id: BillId,
    pub kind: String,
    pub name: String,
    pub date: String,
    pub raw_date: String,
    pub amount: f64,
    pub status: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

impl BillRow {
    pub fn preview_icon(&self) -> PreviewIcon {
        PreviewIcon {
            bill_id: self.id.clone(),
            file_url: self.file_url.clone(),
        }
    }
}

/// Sorts most recent first (stable) and formats every record. A bad date
/// keeps its raw value instead of dropping the record.
pub fn prepare_rows(mut bills: Vec<Bill>) -> Vec<BillRow> {
    bills.sort_by(|a, b| compare_by_date_descending(&a.date, &b.date));
    bills
        .into_iter()
        .map(|bill| {
            if parse_bill_date(&bill.date).is_none() {
                warn!(bill_id = %bill.id, date = %bill.date, "bill date unparseable; displaying raw value");
            }
            BillRow {
                date: format_display_date(&bill.date),
                status: format_status_label(bill.status).to_string(),
                raw_date: bill.date,
                id: bill.id,
                kind: bill.kind,
                name: bill.name,
                amount: bill.amount,
                file_url: bill.file_url,
                file_name: bill.file_name,
            }
        })
        .collect()
}

/// Receipt preview sized to half the modal width.
pub fn preview_markup(file_url: Option<&str>, modal_width: u32) -> String {
    let width = modal_width / 2;
    match file_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => format!(
            r#"<div style="text-align: center;" class="bill-proof-container"><img width="{width}" src="{}" alt="Bill" /></div>"#,
            escape(url)
        ),
        None => format!(
            r#"<div style="text-align: center;" class="bill-proof-container"><p>{PREVIEW_PLACEHOLDER}</p></div>"#
        ),
    }
}

/// Result of one `activate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// No store attached; the empty list was rendered without network access.
    Detached,
    Listed(usize),
    Failed(String),
    /// The view was replaced before the fetch resolved; nothing was written.
    Stale,
}

pub struct BillsContext {
    pub target: RenderTarget,
    pub navigate: NavigateHandle,
    pub store: Option<Arc<dyn RemoteBillsService>>,
    pub session: Arc<dyn SessionStore>,
    pub views: Arc<dyn ViewRegistry>,
    pub modal: Arc<dyn ModalPresenter>,
}

pub struct BillsController {
    target: RenderTarget,
    navigate: NavigateHandle,
    store: Option<Arc<dyn RemoteBillsService>>,
    session: Arc<dyn SessionStore>,
    views: Arc<dyn ViewRegistry>,
    modal: Arc<dyn ModalPresenter>,
}

impl BillsController {
    pub fn new(ctx: BillsContext) -> Self {
        Self {
            target: ctx.target,
            navigate: ctx.navigate,
            store: ctx.store,
            session: ctx.session,
            views: ctx.views,
            modal: ctx.modal,
        }
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    /// Fetches the formatted bills, or `None` when no store is attached.
    pub async fn bills(&self) -> Option<Result<Vec<BillRow>, StoreError>> {
        let store = self.store.as_ref()?;
        Some(store.list().await.map(prepare_rows))
    }

    pub async fn activate(&self) -> Activation {
        let email = current_user(self.session.as_ref()).map(|user| user.email);
        let generation = self.target.generation();

        let (markup, icons, outcome) = match self.bills().await {
            None => {
                debug!(generation, "no bills store attached; rendering empty list");
                let markup = self.render_rows(Vec::new());
                (markup, Vec::new(), Activation::Detached)
            }
            Some(Ok(rows)) => {
                let count = rows.len();
                info!(generation, count, email = ?email, "bills loaded");
                let icons = rows.iter().map(BillRow::preview_icon).collect();
                (self.render_rows(rows), icons, Activation::Listed(count))
            }
            Some(Err(err)) => {
                let message = err.to_string();
                warn!(generation, error = %message, "failed to load bills");
                (
                    self.views.error_view(&message),
                    Vec::new(),
                    Activation::Failed(message),
                )
            }
        };

        match self.target.render(markup, icons) {
            Ok(()) => outcome,
            Err(stale) => {
                debug!(
                    stale_generation = stale.target,
                    current = stale.current,
                    "discarding bills result for replaced view"
                );
                Activation::Stale
            }
        }
    }

    pub fn handle_click_icon_eye(&self, icon: &PreviewIcon) {
        let presenter = self.modal.as_ref();
        let result = self.target.with_modal(|modal| {
            modal.content = preview_markup(icon.file_url.as_deref(), modal.width);
            presenter.show_modal(modal);
        });
        match result {
            Ok(()) => debug!(bill_id = %icon.bill_id, "showing receipt preview"),
            Err(stale) => debug!(
                bill_id = %icon.bill_id,
                stale_generation = stale.target,
                "ignoring preview click on replaced view"
            ),
        }
    }

    pub fn handle_click_new_bill(&self) {
        self.navigate.navigate(RoutePath::NewBill);
    }

    fn render_rows(&self, rows: Vec<BillRow>) -> String {
        self.views.render(
            RoutePath::Bills,
            Some(Role::Employee),
            &ViewProps::with_rows(rows),
        )
    }
}

#[cfg(test)]
#[path = "tests/bills_tests.rs"]
mod tests;
