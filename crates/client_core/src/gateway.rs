use std::path::Path;

use async_trait::async_trait;
use shared::{
    domain::{Bill, BillDraft, BillId},
    protocol::{BillsResponse, UploadedFile},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Transport or server failure. `message` is what the error view shows.
    #[error("{message}")]
    Network { code: Option<u16>, message: String },
    #[error("{reason}")]
    Upload { reason: String },
}

impl GatewayError {
    pub fn status(code: u16) -> Self {
        GatewayError::Network {
            code: Some(code),
            message: format!("Erreur {code}"),
        }
    }

    pub fn transport() -> Self {
        GatewayError::Network {
            code: None,
            message: "Erreur réseau".to_string(),
        }
    }

    pub fn upload(reason: impl Into<String>) -> Self {
        GatewayError::Upload {
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            GatewayError::Network { code, .. } => *code,
            GatewayError::Upload { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    pub fn new(name: impl Into<String>, mime_type: Option<&str>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.map(str::to_string),
            bytes: bytes.into(),
        }
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }

    /// Declared MIME type, or the one guessed from the file name.
    pub fn content_type(&self) -> String {
        self.mime_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }
}

#[async_trait]
pub trait BillGateway: Send + Sync {
    async fn list(&self) -> Result<BillsResponse, GatewayError>;
    async fn create(&self, draft: &BillDraft) -> Result<BillsResponse, GatewayError>;
    async fn update(&self, id: &BillId, draft: &BillDraft) -> Result<Bill, GatewayError>;
    async fn upload_file(&self, file: &ReceiptFile) -> Result<UploadedFile, GatewayError>;
}
