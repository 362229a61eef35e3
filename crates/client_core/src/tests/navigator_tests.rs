use super::*;
use crate::{
    bills::Activation,
    document::NavIcon,
    test_support::{fixture_bills, StubBills},
    views::{BILLS_PAGE_TITLE, LOADING_TEXT},
    InlineModal, MarkupViews, MemorySessionStore,
};
use shared::domain::User;

fn navigator_with(
    session: Arc<MemorySessionStore>,
    store: Option<Arc<dyn RemoteBillsService>>,
) -> Arc<Navigator> {
    Navigator::new(NavigatorDeps {
        root: DocumentRoot::default(),
        session,
        store,
        views: Arc::new(MarkupViews),
        modal: Arc::new(InlineModal),
        routes: RouteTable::default(),
        runtime: Handle::current(),
    })
}

fn employee_session() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_user(&User::employee("a@a")))
}

#[tokio::test]
async fn initialize_registers_entry_point_once_without_rendering() {
    let navigator = navigator_with(employee_session(), None);
    assert_eq!(
        navigator.navigate_handle().err(),
        Some(NavigationError::NotInitialized)
    );

    navigator.initialize().expect("first initialize");
    assert_eq!(
        navigator.initialize().err(),
        Some(NavigationError::AlreadyInitialized)
    );
    assert!(navigator.root().snapshot().is_blank());
    assert_eq!(navigator.state().phase, NavigationPhase::Unauthenticated);
}

#[tokio::test]
async fn unauthenticated_navigation_renders_login() {
    let store = StubBills::ok(fixture_bills());
    let navigator = navigator_with(Arc::new(MemorySessionStore::new()), Some(store.clone()));

    navigator.navigate(RoutePath::Bills);
    navigator.settled().await;

    let state = navigator.state();
    assert_eq!(state.phase, NavigationPhase::Unauthenticated);
    assert_eq!(state.current_path, RoutePath::Login);
    let doc = navigator.root().snapshot();
    assert!(doc.contains_text("login-page"));
    assert!(!doc.contains_text(BILLS_PAGE_TITLE));
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn bills_shell_is_in_place_before_fetch_resolves() {
    let navigator = navigator_with(employee_session(), Some(StubBills::ok(fixture_bills())));

    navigator.navigate(RoutePath::Bills);
    let shell = navigator.root().snapshot();
    assert!(shell.contains_text(LOADING_TEXT));
    assert_eq!(shell.active_icons(), vec![NavIcon::Window]);

    navigator.settled().await;
    let doc = navigator.root().snapshot();
    assert!(doc.contains_text(BILLS_PAGE_TITLE));
    assert_eq!(doc.preview_icons().len(), 4);
    assert_eq!(doc.active_icons(), vec![NavIcon::Window]);
    assert_eq!(
        navigator.state().phase,
        NavigationPhase::AuthenticatedAt {
            path: RoutePath::Bills,
            role: Role::Employee
        }
    );
}

#[tokio::test]
async fn unknown_path_lands_on_role_home() {
    let navigator = navigator_with(employee_session(), Some(StubBills::ok(Vec::new())));
    navigator.navigate_to("#employee/nowhere");
    navigator.settled().await;
    assert_eq!(navigator.state().current_path, RoutePath::Bills);

    let admin = navigator_with(
        Arc::new(MemorySessionStore::with_user(&User::administrator("admin@test"))),
        None,
    );
    admin.navigate_to("#nowhere");
    assert_eq!(admin.state().current_path, RoutePath::Dashboard);
    assert!(admin.root().snapshot().contains_text("dashboard"));
}

#[tokio::test]
async fn administrator_cannot_open_employee_bills() {
    let store = StubBills::ok(fixture_bills());
    let navigator = navigator_with(
        Arc::new(MemorySessionStore::with_user(&User::administrator("admin@test"))),
        Some(store.clone()),
    );

    navigator.navigate(RoutePath::Bills);
    navigator.settled().await;

    assert_eq!(navigator.state().current_path, RoutePath::Dashboard);
    assert!(navigator.active_bills().is_none());
    assert_eq!(store.calls(), 0);
    assert!(navigator.root().snapshot().active_icons().is_empty());
}

#[tokio::test]
async fn fetch_failure_leaves_error_banner() {
    let navigator = navigator_with(employee_session(), Some(StubBills::failing("Erreur 404")));

    navigator.navigate(RoutePath::Bills);
    navigator.settled().await;

    let doc = navigator.root().snapshot();
    assert!(doc.contains_text("Erreur 404"));
    assert!(!doc.is_blank());
    assert_eq!(navigator.state().current_path, RoutePath::Bills);
}

#[tokio::test]
async fn result_for_abandoned_view_is_discarded() {
    let navigator = navigator_with(employee_session(), Some(StubBills::ok(fixture_bills())));
    navigator.navigate(RoutePath::Bills);
    let abandoned = navigator.active_bills().expect("bills controller");

    navigator.navigate(RoutePath::NewBill);
    assert!(navigator.active_bills().is_none());
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }

    assert_eq!(abandoned.activate().await, Activation::Stale);
    let doc = navigator.root().snapshot();
    assert!(doc.contains_text("new-bill-page"));
    assert!(doc.preview_icons().is_empty());
    assert_eq!(doc.active_icons(), vec![NavIcon::Mail]);
}

#[tokio::test]
async fn new_bill_button_goes_through_navigator() {
    let navigator = navigator_with(employee_session(), Some(StubBills::ok(fixture_bills())));
    navigator.initialize().expect("initialize");
    navigator.navigate(RoutePath::Bills);
    navigator.settled().await;

    navigator
        .active_bills()
        .expect("bills controller")
        .handle_click_new_bill();

    assert_eq!(navigator.state().current_path, RoutePath::NewBill);
    assert_eq!(
        navigator.root().snapshot().active_icons(),
        vec![NavIcon::Mail]
    );
}

#[tokio::test]
async fn entry_point_handle_navigates() {
    let navigator = navigator_with(employee_session(), None);
    let handle = navigator.initialize().expect("initialize");

    handle.on_navigate(RoutePath::NewBill.as_str());

    assert_eq!(navigator.state().current_path, RoutePath::NewBill);
    assert!(navigator.navigate_handle().is_ok());
}
