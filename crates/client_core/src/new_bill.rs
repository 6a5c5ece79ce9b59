use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    domain::{BillDraft, BillStatus, ExpenseType},
    protocol::UploadedFile,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, ValidationError},
    gateway::{BillGateway, ReceiptFile},
    ports::NavigationPort,
    router::Route,
    session::SessionStore,
};

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const ACCEPTED_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];
pub const DEFAULT_PCT: u8 = 20;

pub fn validate_receipt(file: &ReceiptFile) -> Result<(), ValidationError> {
    let extension_ok = file
        .extension()
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
    let content_type = file.content_type().to_ascii_lowercase();
    if !extension_ok || !ACCEPTED_MIME_TYPES.contains(&content_type.as_str()) {
        return Err(ValidationError::new(
            "file",
            format!(
                "'{}' is not an accepted receipt (expected {})",
                file.name,
                ACCEPTED_EXTENSIONS.join(", ")
            ),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NewBillState {
    #[default]
    Draft,
    Uploading,
    Ready,
    Submitting,
    Created,
    Failed(ClientError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBillForm {
    pub expense_type: ExpenseType,
    pub name: String,
    pub date: String,
    pub amount: f64,
    pub vat: f64,
    pub pct: Option<u8>,
    pub commentary: Option<String>,
}

impl NewBillForm {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.date.len() != 10 || NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(ValidationError::new("date", "expected a YYYY-MM-DD date"));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ValidationError::new("amount", "must be a non-negative number"));
        }
        if !self.vat.is_finite() || self.vat < 0.0 {
            return Err(ValidationError::new("vat", "must be a non-negative number"));
        }
        if self.pct.is_some_and(|pct| pct > 100) {
            return Err(ValidationError::new("pct", "must be between 0 and 100"));
        }
        Ok(())
    }

    fn into_draft(self, file: UploadedFile, email: String) -> BillDraft {
        BillDraft {
            expense_type: self.expense_type,
            name: self.name,
            date: self.date,
            amount: self.amount,
            vat: self.vat,
            pct: self.pct.unwrap_or(DEFAULT_PCT),
            commentary: self.commentary,
            file_url: Some(file.file_url),
            file_name: Some(file.file_name),
            status: BillStatus::Pending,
            email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBillView {
    pub state: NewBillState,
    pub validation_error: Option<ValidationError>,
    pub accepted_file: Option<AcceptedFile>,
    pub uploaded: Option<UploadedFile>,
}

impl NewBillView {
    pub fn failure(&self) -> Option<&ClientError> {
        match &self.state {
            NewBillState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Default)]
struct NewBillInner {
    view: NewBillView,
    generation: u64,
}

pub struct NewBillController {
    gateway: Arc<dyn BillGateway>,
    sessions: Arc<dyn SessionStore>,
    navigation: Arc<dyn NavigationPort>,
    inner: Mutex<NewBillInner>,
}

impl NewBillController {
    pub fn new(
        gateway: Arc<dyn BillGateway>,
        sessions: Arc<dyn SessionStore>,
        navigation: Arc<dyn NavigationPort>,
    ) -> Self {
        Self {
            gateway,
            sessions,
            navigation,
            inner: Mutex::new(NewBillInner::default()),
        }
    }

    pub async fn handle_change_file(&self, file: ReceiptFile) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            if matches!(
                inner.view.state,
                NewBillState::Submitting | NewBillState::Created
            ) {
                inner.view.validation_error =
                    Some(ValidationError::new("file", "the bill has already been submitted"));
                return;
            }
            inner.generation += 1;
            inner.view.accepted_file = None;
            inner.view.uploaded = None;
            if let Err(err) = validate_receipt(&file) {
                warn!(file_name = %file.name, "new_bill: receipt rejected");
                inner.view.state = NewBillState::Draft;
                inner.view.validation_error = Some(err);
                return;
            }
            inner.view.validation_error = None;
            inner.view.state = NewBillState::Uploading;
            inner.generation
        };

        let result = self.gateway.upload_file(&file).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != ticket {
            debug!(file_name = %file.name, "new_bill: dropping superseded upload");
            return;
        }
        match result {
            Ok(uploaded) => {
                info!(
                    file_name = %uploaded.file_name,
                    file_url = %uploaded.file_url,
                    "new_bill: receipt uploaded"
                );
                inner.view.accepted_file = Some(AcceptedFile {
                    name: file.name.clone(),
                    mime_type: file.content_type(),
                    size_bytes: file.bytes.len(),
                });
                inner.view.uploaded = Some(uploaded);
                inner.view.state = NewBillState::Ready;
            }
            Err(err) => {
                warn!(file_name = %file.name, error = %err, "new_bill: receipt upload failed");
                inner.view.state = NewBillState::Failed(ClientError::Upload {
                    reason: err.to_string(),
                });
            }
        }
    }

    /// Requires a completed upload. Only one caller can move `Ready` to
    /// `Submitting`.
    pub async fn handle_submit(&self, form: NewBillForm) {
        let email = self.sessions.get().and_then(|session| session.email);

        let draft = {
            let mut inner = self.inner.lock().await;
            let ready = inner.view.state == NewBillState::Ready;
            let uploaded = match inner.view.uploaded.clone() {
                Some(uploaded) if ready => uploaded,
                _ => {
                    inner.view.validation_error = Some(ValidationError::new(
                        "file",
                        "a receipt must be uploaded before submitting",
                    ));
                    return;
                }
            };
            if let Err(err) = form.validate() {
                inner.view.validation_error = Some(err);
                return;
            }
            let Some(email) = email else {
                warn!("new_bill: no session email to own the bill");
                inner.view.state = NewBillState::Failed(ClientError::Authorization);
                return;
            };
            inner.view.validation_error = None;
            inner.view.state = NewBillState::Submitting;
            form.into_draft(uploaded, email)
        };

        self.submit_draft(draft).await;
    }

    pub async fn create_bill(&self, draft: BillDraft) {
        {
            let mut inner = self.inner.lock().await;
            inner.view.validation_error = None;
            inner.view.state = NewBillState::Submitting;
        }
        self.submit_draft(draft).await;
    }

    async fn submit_draft(&self, draft: BillDraft) {
        let result = self.gateway.create(&draft).await;

        let created = {
            let mut inner = self.inner.lock().await;
            match result {
                Ok(response) => {
                    info!(bills = response.data.len(), "new_bill: bill created");
                    inner.view.state = NewBillState::Created;
                    true
                }
                Err(err) => {
                    warn!(error = %err, "new_bill: submission failed");
                    inner.view.state = NewBillState::Failed(err.into());
                    false
                }
            }
        };
        if created {
            self.navigation.navigate(Route::Bills);
        }
    }

    pub async fn view(&self) -> NewBillView {
        self.inner.lock().await.view.clone()
    }
}

#[cfg(test)]
#[path = "tests/new_bill_tests.rs"]
mod tests;
