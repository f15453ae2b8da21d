use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// File formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Png,
    Jpg,
    Txt,
}

impl DocumentFormat {
    /// Detect the format from a filename extension. Returns `None` for
    /// anything we cannot extract text from.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = filename.rsplit('.').next()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Txt => "txt",
        };
        write!(f, "{}", name)
    }
}

/// An uploaded file with its extracted text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub format: DocumentFormat,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaResult {
    pub document: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryResult {
    pub document: String,
    pub summary: String,
}

/// One per-document answer produced during holistic analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnswer {
    pub document: String,
    pub answer: String,
}

/// Result of running the same question over several documents and
/// synthesizing the per-document answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolisticAnalysis {
    pub prompt: String,
    pub intermediary_results: Vec<DocumentAnswer>,
    pub final_synthesis: String,
}

/// Per-document entry in the downloadable report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormReportEntry {
    pub text_length: usize,
    pub status: String,
    pub file_type: DocumentFormat,
}

/// The full session report offered for download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub forms_data: BTreeMap<String, FormReportEntry>,
    pub single_form_qa_result: QaResult,
    pub form_summary_result: SummaryResult,
    pub holistic_analysis_result: Option<HolisticAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_detection_covers_supported_extensions() {
        assert_eq!(DocumentFormat::from_filename("scan.PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_filename("photo.jpeg"), Some(DocumentFormat::Jpg));
        assert_eq!(DocumentFormat::from_filename("photo.jpg"), Some(DocumentFormat::Jpg));
        assert_eq!(DocumentFormat::from_filename("page.png"), Some(DocumentFormat::Png));
        assert_eq!(DocumentFormat::from_filename("notes.txt"), Some(DocumentFormat::Txt));
    }

    #[test]
    fn format_detection_rejects_everything_else() {
        assert_eq!(DocumentFormat::from_filename("report.docx"), None);
        assert_eq!(DocumentFormat::from_filename("data.xlsx"), None);
        assert_eq!(DocumentFormat::from_filename("no_extension"), None);
    }
}
