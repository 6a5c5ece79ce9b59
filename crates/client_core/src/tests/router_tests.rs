use super::*;

use crate::{
    memory_gateway::InMemoryBillGateway,
    ports::ChannelNavigator,
    session::{KeyValueStore, LocalSessionStore, MemoryStorage, SESSION_KEY},
};

struct NoPreview;

impl PreviewPort for NoPreview {
    fn show(&self, _asset_url: &str) {}
}

fn router_with_session(raw_session: Option<&str>) -> Router {
    let storage = MemoryStorage::new();
    if let Some(raw) = raw_session {
        storage.set_item(SESSION_KEY, raw).expect("seed session");
    }
    let (navigator, _rx) = ChannelNavigator::channel();
    Router::new(Services {
        gateway: Arc::new(InMemoryBillGateway::seeded()),
        sessions: Arc::new(LocalSessionStore::new(storage)),
        navigation: Arc::new(navigator),
        preview: Arc::new(NoPreview),
    })
}

const EMPLOYEE: &str = r#"{"type":"Employee","email":"a@a"}"#;

#[test]
fn tokens_round_trip_through_the_table() {
    for route in [Route::Login, Route::Bills, Route::NewBill] {
        assert_eq!(Route::from_token(route.token()), Some(route));
    }
    assert_eq!(Route::from_token("#employee/bills"), Some(Route::Bills));
    assert_eq!(Route::from_token("/employee/bill/new"), Some(Route::NewBill));
    assert_eq!(Route::from_token("admin/dashboard"), None);
}

#[test]
fn icon_highlight_follows_the_current_token() {
    assert_eq!(active_icon("employee/bills"), Some(NavIcon::Window));
    assert!(is_icon_active("employee/bills", NavIcon::Window));
    assert!(!is_icon_active("employee/bills", NavIcon::Mail));

    assert!(is_icon_active("employee/bill/new", NavIcon::Mail));
    assert!(!is_icon_active("employee/bill/new", NavIcon::Window));

    assert_eq!(active_icon(""), None);
    assert_eq!(active_icon("nowhere"), None);
}

#[test]
fn employee_reaches_the_bill_list_with_window_icon_active() {
    let router = router_with_session(Some(r#"{"type":"Employee"}"#));

    let navigation = router.navigate("employee/bills");

    assert_eq!(navigation.route, Route::Bills);
    assert!(navigation.redirected.is_none());
    assert!(matches!(navigation.view, MountedView::Bills(_)));
    assert_eq!(navigation.active_icon(), Some(NavIcon::Window));
    assert!(!is_icon_active(navigation.route.token(), NavIcon::Mail));
}

#[test]
fn employee_reaches_the_creation_form() {
    let router = router_with_session(Some(EMPLOYEE));

    let navigation = router.navigate("employee/bill/new");

    assert_eq!(navigation.route, Route::NewBill);
    assert!(matches!(navigation.view, MountedView::NewBill(_)));
    assert_eq!(navigation.active_icon(), Some(NavIcon::Mail));
}

#[test]
fn missing_session_redirects_to_login() {
    let router = router_with_session(None);

    for token in ["employee/bills", "employee/bill/new"] {
        let navigation = router.navigate(token);
        assert_eq!(navigation.route, Route::Login);
        assert!(matches!(navigation.view, MountedView::Login));
        assert_eq!(
            navigation.redirected,
            Some(Redirect {
                requested: token.to_string(),
                reason: RedirectReason::NoSession,
            })
        );
    }
}

#[test]
fn unreadable_session_counts_as_missing() {
    let router = router_with_session(Some("not-json"));
    assert_eq!(router.navigate("employee/bills").route, Route::Login);
}

#[test]
fn wrong_role_falls_back_to_login_when_landing_is_refused_too() {
    let router = router_with_session(Some(r#"{"type":"Admin","email":"admin@test"}"#));

    let navigation = router.navigate("employee/bill/new");

    assert_eq!(navigation.route, Route::Login);
    assert_eq!(
        navigation.redirected.map(|redirect| redirect.reason),
        Some(RedirectReason::WrongRole)
    );
}

#[test]
fn wrong_role_goes_to_a_public_landing() {
    let router = router_with_session(Some(r#"{"type":"Admin"}"#)).with_landing(Route::Login);
    let navigation = router.navigate("employee/bills");
    assert_eq!(navigation.route, Route::Login);
    assert_eq!(
        navigation.redirected.map(|redirect| redirect.reason),
        Some(RedirectReason::WrongRole)
    );
}

#[test]
fn unknown_token_lands_authenticated_users_on_the_bill_list() {
    let router = router_with_session(Some(EMPLOYEE));

    let navigation = router.navigate("admin/dashboard");

    assert_eq!(navigation.route, Route::Bills);
    assert_eq!(
        navigation.redirected.map(|redirect| redirect.reason),
        Some(RedirectReason::UnknownToken)
    );
}

#[test]
fn login_is_public() {
    let router = router_with_session(None);
    let navigation = router.navigate("");
    assert_eq!(navigation.route, Route::Login);
    assert!(navigation.redirected.is_none());
}

#[tokio::test]
async fn mounted_bill_list_loads_from_the_injected_gateway() {
    let router = router_with_session(Some(EMPLOYEE));

    let MountedView::Bills(controller) = router.navigate("employee/bills").view else {
        panic!("bill list should mount");
    };
    controller.load().await;

    assert_eq!(controller.view().await.rows.len(), 4);
}
