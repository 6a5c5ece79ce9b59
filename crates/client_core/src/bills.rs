use std::sync::Arc;

use shared::domain::Bill;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    gateway::BillGateway,
    ports::{NavigationPort, PreviewPort},
    router::Route,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum BillsListState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<Bill>),
    Failed(String),
}

/// What the view layer renders. At most one of the three fields is set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillsView {
    pub loading: bool,
    pub error: Option<String>,
    pub rows: Vec<Bill>,
}

impl BillsListState {
    pub fn view(&self) -> BillsView {
        match self {
            BillsListState::Idle => BillsView::default(),
            BillsListState::Loading => BillsView {
                loading: true,
                ..BillsView::default()
            },
            BillsListState::Loaded(bills) => {
                let mut rows = bills.clone();
                sort_bills_by_date_desc(&mut rows);
                BillsView {
                    rows,
                    ..BillsView::default()
                }
            }
            BillsListState::Failed(message) => BillsView {
                error: Some(message.clone()),
                ..BillsView::default()
            },
        }
    }
}

/// Most recent first. ISO dates are fixed-width so string order is
/// chronological; the sort is stable for equal dates.
pub fn sort_bills_by_date_desc(bills: &mut [Bill]) {
    bills.sort_by(|a, b| b.date.cmp(&a.date));
}

struct ListInner {
    state: BillsListState,
    generation: u64,
}

pub struct BillsListController {
    gateway: Arc<dyn BillGateway>,
    navigation: Arc<dyn NavigationPort>,
    preview: Arc<dyn PreviewPort>,
    inner: Mutex<ListInner>,
}

impl BillsListController {
    pub fn new(
        gateway: Arc<dyn BillGateway>,
        navigation: Arc<dyn NavigationPort>,
        preview: Arc<dyn PreviewPort>,
    ) -> Self {
        Self {
            gateway,
            navigation,
            preview,
            inner: Mutex::new(ListInner {
                state: BillsListState::Idle,
                generation: 0,
            }),
        }
    }

    /// Fetches the bill list. When several loads overlap, only the most
    /// recently started one may settle the state.
    pub async fn load(&self) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.state = BillsListState::Loading;
            inner.generation
        };
        info!(generation = ticket, "bills: load started");

        let result = self.gateway.list().await;

        let mut inner = self.inner.lock().await;
        if inner.generation != ticket {
            debug!(
                generation = ticket,
                latest = inner.generation,
                "bills: dropping superseded result"
            );
            return;
        }
        inner.state = match result {
            Ok(response) => {
                info!(generation = ticket, bills = response.data.len(), "bills: loaded");
                BillsListState::Loaded(response.data)
            }
            Err(err) => {
                warn!(generation = ticket, error = %err, "bills: load failed");
                BillsListState::Failed(err.to_string())
            }
        };
    }

    pub fn handle_click_new_bill(&self) {
        self.navigation.navigate(Route::NewBill);
    }

    pub fn handle_click_preview(&self, bill: &Bill) {
        match bill.file_url.as_deref() {
            Some(url) => self.preview.show(url),
            None => warn!(bill_id = %bill.id, "bills: no receipt to preview"),
        }
    }

    pub async fn state(&self) -> BillsListState {
        self.inner.lock().await.state.clone()
    }

    pub async fn view(&self) -> BillsView {
        self.inner.lock().await.state.view()
    }
}

#[cfg(test)]
#[path = "tests/bills_tests.rs"]
mod tests;
