use form_agent::DocumentFormat;
use serde::{Deserialize, Serialize};

/// Document listing entry; the extracted text itself stays server-side.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub name: String,
    pub format: DocumentFormat,
    pub text_length: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub processed: Vec<DocumentSummary>,
    pub errors: Vec<UploadError>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadError {
    pub filename: String,
    pub message: String,
}

/// QA request: `document` is an id or filename.
#[derive(Debug, Deserialize)]
pub struct QaPayload {
    pub document: String,
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryPayload {
    pub document: String,
}

#[derive(Debug, Deserialize)]
pub struct HolisticPayload {
    pub documents: Vec<String>,
    pub prompt: String,
}
