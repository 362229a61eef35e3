//! The single document root, its chrome, and generation-guarded render targets.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::domain::BillId;

use crate::{error::StaleView, routes::RoutePath};

pub const MODAL_CONTAINER_ID: &str = "modaleFile";
pub const DEFAULT_MODAL_WIDTH: u32 = 800;

/// Icons of the employee vertical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavIcon {
    Window,
    Mail,
}

impl NavIcon {
    pub const ALL: [NavIcon; 2] = [NavIcon::Window, NavIcon::Mail];

    pub fn test_id(self) -> &'static str {
        match self {
            NavIcon::Window => "icon-window",
            NavIcon::Mail => "icon-mail",
        }
    }

    pub fn path(self) -> RoutePath {
        match self {
            NavIcon::Window => RoutePath::Bills,
            NavIcon::Mail => RoutePath::NewBill,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavIconState {
    pub icon: NavIcon,
    pub active: bool,
}

/// A rendered "eye" affordance; carries the receipt url of its bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewIcon {
    pub bill_id: BillId,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContainer {
    pub id: String,
    pub width: u32,
    pub content: String,
    pub shown: bool,
}

impl ModalContainer {
    fn new(width: u32) -> Self {
        Self {
            id: MODAL_CONTAINER_ID.to_string(),
            width,
            content: String::new(),
            shown: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    generation: u64,
    content: String,
    layout: Vec<NavIconState>,
    preview_icons: Vec<PreviewIcon>,
    modal: ModalContainer,
}

impl Document {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.content.contains(needle)
    }

    pub fn layout(&self) -> &[NavIconState] {
        &self.layout
    }

    pub fn active_icons(&self) -> Vec<NavIcon> {
        self.layout
            .iter()
            .filter(|state| state.active)
            .map(|state| state.icon)
            .collect()
    }

    pub fn preview_icons(&self) -> &[PreviewIcon] {
        &self.preview_icons
    }

    pub fn modal(&self) -> &ModalContainer {
        &self.modal
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Shared handle on the live document. Cloning shares the same document.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    inner: Arc<Mutex<Document>>,
}

impl Default for DocumentRoot {
    fn default() -> Self {
        Self::new(DEFAULT_MODAL_WIDTH)
    }
}

impl DocumentRoot {
    pub fn new(modal_width: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Document {
                generation: 0,
                content: String::new(),
                layout: Vec::new(),
                preview_icons: Vec::new(),
                modal: ModalContainer::new(modal_width),
            })),
        }
    }

    pub fn snapshot(&self) -> Document {
        self.lock().clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Replaces the whole document with a new view shell and hands out the only
    /// target allowed to write into it. Older targets become stale.
    pub fn mount(&self, content: String, layout: Vec<NavIconState>) -> RenderTarget {
        let mut doc = self.lock();
        doc.generation += 1;
        doc.content = content;
        doc.layout = layout;
        doc.preview_icons.clear();
        doc.modal.content.clear();
        doc.modal.shown = false;

        RenderTarget {
            root: self.clone(),
            generation: doc.generation,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Write access to one mounted view, valid until the next `mount`.
#[derive(Debug)]
pub struct RenderTarget {
    root: DocumentRoot,
    generation: u64,
}

impl RenderTarget {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.root.generation() == self.generation
    }

    pub fn snapshot(&self) -> Document {
        self.root.snapshot()
    }

    /// Swaps the view content, keeping the layout chrome.
    pub fn render(&self, content: String, preview_icons: Vec<PreviewIcon>) -> Result<(), StaleView> {
        let mut doc = self.guard()?;
        doc.content = content;
        doc.preview_icons = preview_icons;
        Ok(())
    }

    pub fn with_modal<R>(&self, f: impl FnOnce(&mut ModalContainer) -> R) -> Result<R, StaleView> {
        let mut doc = self.guard()?;
        Ok(f(&mut doc.modal))
    }

    fn guard(&self) -> Result<MutexGuard<'_, Document>, StaleView> {
        let doc = self.root.lock();
        if doc.generation != self.generation {
            return Err(StaleView {
                target: self.generation,
                current: doc.generation,
            });
        }
        Ok(doc)
    }
}

/// Employee pages carry the vertical layout; the icon matching `path` is active.
pub fn employee_layout(path: RoutePath) -> Vec<NavIconState> {
    NavIcon::ALL
        .into_iter()
        .map(|icon| NavIconState {
            icon,
            active: icon.path() == path,
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
