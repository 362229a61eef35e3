//! Client core of the expense-report app: navigation, the employee bill list,
//! and the collaborator seams they are wired through.

use async_trait::async_trait;
use shared::{
    domain::{Bill, BillId},
    protocol::{BillPatch, NewBill},
};

pub mod bills;
pub mod document;
pub mod error;
pub mod http_store;
pub mod navigator;
pub mod presentation;
pub mod routes;
pub mod session;
pub mod views;

pub use bills::{Activation, BillRow, BillsContext, BillsController};
pub use document::{DocumentRoot, ModalContainer, NavIcon, PreviewIcon, RenderTarget};
pub use error::{NavigationError, StoreError};
pub use http_store::HttpBillsService;
pub use navigator::{NavigateHandle, NavigationPhase, Navigator, NavigatorDeps};
pub use routes::{RoutePath, RouteTable};
pub use session::{current_user, MemorySessionStore};
pub use views::{MarkupViews, ViewProps, ViewRegistry};

/// Synchronous key-value surface holding the session (`user`, `jwt`).
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
    fn remove_item(&self, key: &str);
}

/// Remote document store holding the bills.
#[async_trait]
pub trait RemoteBillsService: Send + Sync {
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;
    async fn create(&self, bill: NewBill) -> Result<Bill, StoreError>;
    async fn update(&self, id: &BillId, patch: BillPatch) -> Result<Bill, StoreError>;
}

/// Overlay mechanism that displays a modal container once its content is set.
pub trait ModalPresenter: Send + Sync {
    fn show_modal(&self, modal: &mut ModalContainer);
}

/// Shows the modal in place by flagging the container as shown.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineModal;

impl ModalPresenter for InlineModal {
    fn show_modal(&self, modal: &mut ModalContainer) {
        modal.shown = true;
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
