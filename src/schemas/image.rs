use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    pub(crate) success: bool,
    pub(crate) image_url: String,
    pub(crate) filename: String,
    pub(crate) size: u64,
    pub(crate) mimetype: String,
    pub(crate) gps_data: Option<Value>,
    pub(crate) message: String,
}
