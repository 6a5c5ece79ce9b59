use async_trait::async_trait;
use shared::{
    domain::{Bill, BillDraft, BillId, BillStatus, ExpenseType},
    protocol::{BillsResponse, UploadedFile},
};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::gateway::{BillGateway, GatewayError, ReceiptFile};

/// Process-local bill store. Used for offline demos and as the scripted
/// backend in tests: each operation can be told to fail once.
#[derive(Default)]
pub struct InMemoryBillGateway {
    inner: Mutex<MemoryStore>,
}

#[derive(Default)]
struct MemoryStore {
    bills: Vec<Bill>,
    created: Vec<BillDraft>,
    uploaded: Vec<String>,
    list_calls: usize,
    fail_next_list: Option<GatewayError>,
    fail_next_create: Option<GatewayError>,
    fail_next_update: Option<GatewayError>,
    fail_next_upload: Option<GatewayError>,
}

impl InMemoryBillGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            inner: Mutex::new(MemoryStore {
                bills,
                ..MemoryStore::default()
            }),
        }
    }

    pub fn seeded() -> Self {
        Self::with_bills(fixture_bills())
    }

    pub async fn fail_next_list(&self, err: GatewayError) {
        self.inner.lock().await.fail_next_list = Some(err);
    }

    pub async fn fail_next_create(&self, err: GatewayError) {
        self.inner.lock().await.fail_next_create = Some(err);
    }

    pub async fn fail_next_update(&self, err: GatewayError) {
        self.inner.lock().await.fail_next_update = Some(err);
    }

    pub async fn fail_next_upload(&self, err: GatewayError) {
        self.inner.lock().await.fail_next_upload = Some(err);
    }

    pub async fn bills(&self) -> Vec<Bill> {
        self.inner.lock().await.bills.clone()
    }

    pub async fn created_drafts(&self) -> Vec<BillDraft> {
        self.inner.lock().await.created.clone()
    }

    pub async fn uploaded_files(&self) -> Vec<String> {
        self.inner.lock().await.uploaded.clone()
    }

    pub async fn list_calls(&self) -> usize {
        self.inner.lock().await.list_calls
    }
}

#[async_trait]
impl BillGateway for InMemoryBillGateway {
    async fn list(&self) -> Result<BillsResponse, GatewayError> {
        let mut store = self.inner.lock().await;
        store.list_calls += 1;
        if let Some(err) = store.fail_next_list.take() {
            return Err(err);
        }
        Ok(BillsResponse {
            data: store.bills.clone(),
        })
    }

    async fn create(&self, draft: &BillDraft) -> Result<BillsResponse, GatewayError> {
        let mut store = self.inner.lock().await;
        store.created.push(draft.clone());
        if let Some(err) = store.fail_next_create.take() {
            return Err(err);
        }
        let id = BillId(Uuid::new_v4().to_string());
        info!(bill_id = %id, "memory store: bill created");
        store.bills.push(Bill::from_draft(id, draft.clone()));
        Ok(BillsResponse {
            data: store.bills.clone(),
        })
    }

    async fn update(&self, id: &BillId, draft: &BillDraft) -> Result<Bill, GatewayError> {
        let mut store = self.inner.lock().await;
        if let Some(err) = store.fail_next_update.take() {
            return Err(err);
        }
        let slot = store
            .bills
            .iter_mut()
            .find(|bill| &bill.id == id)
            .ok_or_else(|| GatewayError::status(404))?;
        *slot = Bill::from_draft(id.clone(), draft.clone());
        Ok(slot.clone())
    }

    async fn upload_file(&self, file: &ReceiptFile) -> Result<UploadedFile, GatewayError> {
        let mut store = self.inner.lock().await;
        if let Some(err) = store.fail_next_upload.take() {
            return Err(err);
        }
        if file.bytes.is_empty() {
            return Err(GatewayError::upload(format!("receipt '{}' is empty", file.name)));
        }
        store.uploaded.push(file.name.clone());
        Ok(UploadedFile {
            file_url: format!("memory://receipts/{}", file.name),
            file_name: file.name.clone(),
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn fixture(
    id: &str,
    expense_type: ExpenseType,
    name: &str,
    date: &str,
    amount: f64,
    vat: f64,
    commentary: &str,
    file_name: &str,
    status: BillStatus,
) -> Bill {
    Bill {
        id: BillId(id.to_string()),
        expense_type,
        name: name.to_string(),
        date: date.to_string(),
        amount,
        vat,
        pct: 20,
        commentary: Some(commentary.to_string()),
        file_url: Some(format!("memory://receipts/{file_name}")),
        file_name: Some(file_name.to_string()),
        status,
        email: "a@a".to_string(),
    }
}

/// The four reference bills, deliberately not in date order.
pub fn fixture_bills() -> Vec<Bill> {
    vec![
        fixture(
            "47qAXb6fIm2zOKkLzMro",
            ExpenseType::Lodging,
            "encore",
            "2004-04-04",
            400.0,
            80.0,
            "séminaire billed",
            "preview-facture-free-201801-pdf-1.jpg",
            BillStatus::Pending,
        ),
        fixture(
            "BeKy5Mo4jkmdfPGYpTxZ",
            ExpenseType::Transport,
            "test1",
            "2001-01-01",
            100.0,
            0.0,
            "plop",
            "1592770761.jpeg",
            BillStatus::Refused,
        ),
        fixture(
            "UIUZtnPQvnbFnB0ozvJh",
            ExpenseType::OnlineServices,
            "test3",
            "2003-03-03",
            300.0,
            60.0,
            "",
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
            BillStatus::Accepted,
        ),
        fixture(
            "qcCK3SzECmaZAGRrHjaC",
            ExpenseType::Restaurant,
            "test2",
            "2002-02-02",
            200.0,
            40.0,
            "test2",
            "preview-facture-free-201801-pdf-1.jpg",
            BillStatus::Refused,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BillDraft {
        BillDraft {
            expense_type: ExpenseType::Equipment,
            name: "Souris Logitech".into(),
            date: "2021-09-17".into(),
            amount: 1.0,
            vat: 70.0,
            pct: 20,
            commentary: Some("Remplacement".into()),
            file_url: Some("memory://receipts/logo.png".into()),
            file_name: Some("logo.png".into()),
            status: BillStatus::Pending,
            email: "johndoe@email.com".into(),
        }
    }

    #[tokio::test]
    async fn create_on_seeded_store_returns_five_bills() {
        let gateway = InMemoryBillGateway::seeded();
        assert_eq!(gateway.list().await.expect("list").data.len(), 4);

        let response = gateway.create(&draft()).await.expect("create");
        assert_eq!(response.data.len(), 5);
        assert_eq!(gateway.created_drafts().await, vec![draft()]);
    }

    #[tokio::test]
    async fn scripted_failure_applies_once() {
        let gateway = InMemoryBillGateway::seeded();
        gateway.fail_next_list(GatewayError::status(500)).await;

        let err = gateway.list().await.expect_err("scripted failure");
        assert_eq!(err.to_string(), "Erreur 500");
        assert!(gateway.list().await.is_ok());
        assert_eq!(gateway.list_calls().await, 2);
    }

    #[tokio::test]
    async fn update_moves_bill_out_of_pending() {
        let gateway = InMemoryBillGateway::seeded();
        let id = BillId("47qAXb6fIm2zOKkLzMro".into());
        let mut accepted = draft();
        accepted.status = BillStatus::Accepted;

        let bill = gateway.update(&id, &accepted).await.expect("update");
        assert_eq!(bill.status, BillStatus::Accepted);
        assert_eq!(gateway.bills().await.len(), 4);

        let err = gateway
            .update(&BillId("missing".into()), &accepted)
            .await
            .expect_err("missing bill");
        assert_eq!(err.code(), Some(404));
    }

    #[tokio::test]
    async fn scripted_update_failure_leaves_the_bill_untouched() {
        let gateway = InMemoryBillGateway::seeded();
        let id = BillId("47qAXb6fIm2zOKkLzMro".into());
        let before = gateway.bills().await;
        gateway.fail_next_update(GatewayError::status(403)).await;
        let mut accepted = draft();
        accepted.status = BillStatus::Accepted;

        let err = gateway
            .update(&id, &accepted)
            .await
            .expect_err("scripted failure");
        assert_eq!(err.code(), Some(403));
        assert_eq!(gateway.bills().await, before);

        let bill = gateway.update(&id, &accepted).await.expect("update");
        assert_eq!(bill.status, BillStatus::Accepted);
    }

    #[tokio::test]
    async fn empty_receipt_is_rejected_by_the_store() {
        let gateway = InMemoryBillGateway::new();
        let err = gateway
            .upload_file(&ReceiptFile::new("empty.png", Some("image/png"), Vec::new()))
            .await
            .expect_err("empty upload");
        assert!(matches!(err, GatewayError::Upload { .. }));
        assert!(gateway.uploaded_files().await.is_empty());
    }
}
