//! Path-to-view navigation gated by the session user.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak},
};

use shared::domain::Role;
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info};

use crate::{
    bills::{BillsContext, BillsController},
    document::{employee_layout, DocumentRoot, NavIconState},
    error::NavigationError,
    routes::{RoutePath, RouteTable, ViewCapability},
    session::current_user,
    views::{ViewProps, ViewRegistry},
    ModalPresenter, RemoteBillsService, SessionStore,
};

/// The navigate callback handed to rendered views and controllers.
#[derive(Clone)]
pub struct NavigateHandle {
    target: Arc<dyn Fn(&str) + Send + Sync>,
}

impl NavigateHandle {
    pub fn from_fn(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            target: Arc::new(f),
        }
    }

    pub fn on_navigate(&self, path: &str) {
        (self.target)(path);
    }

    pub fn navigate(&self, path: RoutePath) {
        self.on_navigate(path.as_str());
    }
}

impl fmt::Debug for NavigateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigateHandle").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    Unauthenticated,
    AuthenticatedAt { path: RoutePath, role: Role },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub phase: NavigationPhase,
    pub current_path: RoutePath,
    pub generation: u64,
}

struct NavigationState {
    phase: NavigationPhase,
    current_path: RoutePath,
    active_bills: Option<Arc<BillsController>>,
    pending: Option<JoinHandle<()>>,
}

pub struct NavigatorDeps {
    pub root: DocumentRoot,
    pub session: Arc<dyn SessionStore>,
    pub store: Option<Arc<dyn RemoteBillsService>>,
    pub views: Arc<dyn ViewRegistry>,
    pub modal: Arc<dyn ModalPresenter>,
    pub routes: RouteTable,
    pub runtime: Handle,
}

pub struct Navigator {
    root: DocumentRoot,
    session: Arc<dyn SessionStore>,
    store: Option<Arc<dyn RemoteBillsService>>,
    views: Arc<dyn ViewRegistry>,
    modal: Arc<dyn ModalPresenter>,
    routes: RouteTable,
    runtime: Handle,
    state: Mutex<NavigationState>,
    entry: OnceLock<NavigateHandle>,
    weak_self: Weak<Navigator>,
}

impl Navigator {
    pub fn new(deps: NavigatorDeps) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            root: deps.root,
            session: deps.session,
            store: deps.store,
            views: deps.views,
            modal: deps.modal,
            routes: deps.routes,
            runtime: deps.runtime,
            state: Mutex::new(NavigationState {
                phase: NavigationPhase::Unauthenticated,
                current_path: RoutePath::Login,
                active_bills: None,
                pending: None,
            }),
            entry: OnceLock::new(),
            weak_self: weak_self.clone(),
        })
    }

    /// Registers the application-wide navigate entry point. Renders nothing.
    pub fn initialize(&self) -> Result<NavigateHandle, NavigationError> {
        let handle = self.make_handle();
        self.entry
            .set(handle.clone())
            .map_err(|_| NavigationError::AlreadyInitialized)?;
        debug!("navigation entry point registered");
        Ok(handle)
    }

    pub fn navigate_handle(&self) -> Result<NavigateHandle, NavigationError> {
        self.entry.get().cloned().ok_or(NavigationError::NotInitialized)
    }

    pub fn root(&self) -> &DocumentRoot {
        &self.root
    }

    pub fn navigate(&self, path: RoutePath) {
        self.navigate_to(path.as_str());
    }

    /// Replaces the document with the view for `requested`. A fetch started by
    /// the new view resolves later against its own render target.
    pub fn navigate_to(&self, requested: &str) {
        let user = current_user(self.session.as_ref());
        let mut state = self.lock_state();
        // Detach, never abort: a late result is discarded by the render target.
        state.active_bills = None;
        state.pending = None;

        let Some(user) = user else {
            debug!(requested, "no session user; redirecting to login");
            let markup = self
                .views
                .render(RoutePath::Login, None, &ViewProps::default());
            self.root.mount(markup, Vec::new());
            state.phase = NavigationPhase::Unauthenticated;
            state.current_path = RoutePath::Login;
            return;
        };

        let resolution = self.routes.resolve(RoutePath::parse(requested), user.role);
        if resolution.fell_back {
            debug!(
                requested,
                landing = %resolution.path,
                role = ?user.role,
                "path not served for role; using landing page"
            );
        }

        let props = match resolution.capability {
            ViewCapability::BillsList => ViewProps::loading(),
            ViewCapability::Static => ViewProps::default(),
        };
        let markup = self.views.render(resolution.path, Some(user.role), &props);
        let target = self
            .root
            .mount(markup, layout_for(resolution.path, user.role));
        info!(
            path = %resolution.path,
            role = ?user.role,
            generation = target.generation(),
            "navigated"
        );

        state.phase = NavigationPhase::AuthenticatedAt {
            path: resolution.path,
            role: user.role,
        };
        state.current_path = resolution.path;

        if resolution.capability == ViewCapability::BillsList {
            let controller = Arc::new(BillsController::new(BillsContext {
                target,
                navigate: self.controller_handle(),
                store: self.store.clone(),
                session: self.session.clone(),
                views: self.views.clone(),
                modal: self.modal.clone(),
            }));
            let task_controller = controller.clone();
            state.pending = Some(self.runtime.spawn(async move {
                task_controller.activate().await;
            }));
            state.active_bills = Some(controller);
        }
    }

    pub fn state(&self) -> NavigationSnapshot {
        let state = self.lock_state();
        NavigationSnapshot {
            phase: state.phase,
            current_path: state.current_path,
            generation: self.root.generation(),
        }
    }

    pub fn active_bills(&self) -> Option<Arc<BillsController>> {
        self.lock_state().active_bills.clone()
    }

    /// Waits for the fetch started by the last navigation, if any.
    pub async fn settled(&self) {
        let pending = self.lock_state().pending.take();
        if let Some(task) = pending {
            if let Err(err) = task.await {
                debug!(error = %err, "bills activation task ended abnormally");
            }
        }
    }

    fn controller_handle(&self) -> NavigateHandle {
        self.entry
            .get()
            .cloned()
            .unwrap_or_else(|| self.make_handle())
    }

    fn make_handle(&self) -> NavigateHandle {
        let navigator = self.weak_self.clone();
        NavigateHandle::from_fn(move |path| match navigator.upgrade() {
            Some(navigator) => navigator.navigate_to(path),
            None => debug!(path, "navigator dropped; ignoring navigation"),
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, NavigationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn layout_for(path: RoutePath, role: Role) -> Vec<NavIconState> {
    match (role, path) {
        (Role::Employee, RoutePath::Bills | RoutePath::NewBill) => employee_layout(path),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "tests/navigator_tests.rs"]
mod tests;
