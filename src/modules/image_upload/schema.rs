use serde::{Deserialize, Serialize};

/// Stored upload as reported back to the uploader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub filename: String,
    pub original_name: String,
    pub size: u64,
    pub url: String,
}

/// One entry of the image listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub filename: String,
    pub url: String,
    pub path: String,
}
