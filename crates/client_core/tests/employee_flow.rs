use std::sync::{Arc, Mutex};

use client_core::{
    view::render_bills_view, ChannelNavigator, InMemoryBillGateway, LocalSessionStore,
    MemoryStorage, MountedView, NavIcon, NewBillForm, NewBillState, PreviewPort, ReceiptFile,
    Route, Router, Services, SessionStore,
};
use shared::domain::{ExpenseType, Session};

#[derive(Default)]
struct RecordingPreview {
    shown: Mutex<Vec<String>>,
}

impl PreviewPort for RecordingPreview {
    fn show(&self, asset_url: &str) {
        self.shown.lock().expect("shown").push(asset_url.to_string());
    }
}

#[tokio::test]
async fn employee_lists_creates_and_returns_to_sorted_list() {
    let sessions = Arc::new(LocalSessionStore::new(MemoryStorage::new()));
    let gateway = Arc::new(InMemoryBillGateway::seeded());
    let preview = Arc::new(RecordingPreview::default());
    let (navigator, mut navigation_rx) = ChannelNavigator::channel();
    let router = Router::new(Services {
        gateway: gateway.clone(),
        sessions: sessions.clone(),
        navigation: Arc::new(navigator),
        preview: preview.clone(),
    });

    // Not signed in yet.
    assert_eq!(router.navigate("employee/bills").route, Route::Login);

    sessions
        .set(&Session::employee("johndoe@email.com"))
        .expect("login");

    let navigation = router.navigate("employee/bills");
    assert_eq!(navigation.active_icon(), Some(NavIcon::Window));
    let MountedView::Bills(list) = navigation.view else {
        panic!("bill list should mount");
    };
    list.load().await;
    let view = list.view().await;
    assert_eq!(view.rows.len(), 4);
    assert!(render_bills_view(&view).starts_with("2004-04-04"));

    list.handle_click_preview(&view.rows[0]);
    assert_eq!(preview.shown.lock().expect("shown").len(), 1);

    list.handle_click_new_bill();
    let requested = navigation_rx.recv().await.expect("navigation request");
    assert_eq!(requested, Route::NewBill);

    let navigation = router.navigate(requested.token());
    assert_eq!(navigation.active_icon(), Some(NavIcon::Mail));
    let MountedView::NewBill(form) = navigation.view else {
        panic!("creation form should mount");
    };
    form.handle_change_file(ReceiptFile::new("logo.png", Some("image/png"), b"png".to_vec()))
        .await;
    form.handle_submit(NewBillForm {
        expense_type: ExpenseType::Equipment,
        name: "Souris Logitech".into(),
        date: "2021-09-17".into(),
        amount: 1.0,
        vat: 70.0,
        pct: Some(20),
        commentary: Some("Remplacement".into()),
    })
    .await;
    assert_eq!(form.view().await.state, NewBillState::Created);

    let requested = navigation_rx.recv().await.expect("navigation request");
    assert_eq!(requested, Route::Bills);
    let MountedView::Bills(list) = router.navigate(requested.token()).view else {
        panic!("bill list should mount again");
    };
    list.load().await;
    let view = list.view().await;
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.rows[0].name, "Souris Logitech");
    assert_eq!(view.rows[0].email, "johndoe@email.com");
}
