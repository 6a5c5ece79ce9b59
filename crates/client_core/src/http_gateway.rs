use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use shared::{
    domain::{Bill, BillDraft, BillId},
    error::{ApiError, ErrorCode},
    protocol::{BillsResponse, UploadQuery, UploadedFile},
};
use tracing::{info, warn};
use url::Url;

use crate::gateway::{BillGateway, GatewayError, ReceiptFile};

pub struct HttpBillGateway {
    http: Client,
    base_url: Url,
}

impl HttpBillGateway {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url.join(path).map_err(|err| {
            warn!(path, error = %err, "bills: invalid endpoint");
            GatewayError::transport()
        })
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    warn!(error = %err, "bills: store unreachable");
    GatewayError::transport()
}

fn status_error(status: u16) -> ApiError {
    ApiError::new(ErrorCode::from_status(status), format!("Erreur {status}"))
}

/// Logs the store's `ApiError` body, or one derived from the status when the
/// body is missing, then reduces the failure to its status code.
async fn rejected(response: Response) -> u16 {
    let status = response.status().as_u16();
    let body = response
        .json::<ApiError>()
        .await
        .unwrap_or_else(|_| status_error(status));
    warn!(
        status,
        code = ?body.code,
        message = %body.message,
        "bills: store rejected request"
    );
    status
}

#[async_trait]
impl BillGateway for HttpBillGateway {
    async fn list(&self) -> Result<BillsResponse, GatewayError> {
        let response = self
            .http
            .get(self.endpoint("bills")?)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(GatewayError::status(rejected(response).await));
        }
        response.json().await.map_err(transport_error)
    }

    async fn create(&self, draft: &BillDraft) -> Result<BillsResponse, GatewayError> {
        let response = self
            .http
            .post(self.endpoint("bills")?)
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(GatewayError::status(rejected(response).await));
        }
        let body: BillsResponse = response.json().await.map_err(transport_error)?;
        info!(bills = body.data.len(), "bills: bill created");
        Ok(body)
    }

    async fn update(&self, id: &BillId, draft: &BillDraft) -> Result<Bill, GatewayError> {
        let response = self
            .http
            .put(self.endpoint(&format!("bills/{}", id.0))?)
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(GatewayError::status(rejected(response).await));
        }
        response.json().await.map_err(transport_error)
    }

    async fn upload_file(&self, file: &ReceiptFile) -> Result<UploadedFile, GatewayError> {
        let response = self
            .http
            .post(self.endpoint("receipts")?)
            .query(&UploadQuery {
                file_name: file.name.clone(),
            })
            .header(CONTENT_TYPE, file.content_type())
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|err| {
                warn!(file_name = %file.name, error = %err, "bills: receipt upload failed");
                GatewayError::upload("Erreur réseau")
            })?;
        if !response.status().is_success() {
            let status = rejected(response).await;
            return Err(GatewayError::upload(format!("Erreur {status}")));
        }
        response.json().await.map_err(|err| {
            warn!(file_name = %file.name, error = %err, "bills: malformed upload response");
            GatewayError::upload("Erreur réseau")
        })
    }
}

#[cfg(test)]
#[path = "tests/http_gateway_tests.rs"]
mod tests;
