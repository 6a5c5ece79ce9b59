use serde::{Deserialize, Serialize};

use crate::domain::Bill;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BillsResponse {
    pub data: Vec<Bill>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_url: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub file_name: String,
}
