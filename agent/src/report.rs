use std::collections::BTreeMap;

use crate::models::*;

/// Assemble the downloadable session report: one `forms_data` entry per
/// stored document plus the latest QA, summary and holistic results.
pub fn build_report(
    documents: &[Document],
    qa_result: Option<&QaResult>,
    summary_result: Option<&SummaryResult>,
    holistic_result: Option<&HolisticAnalysis>,
) -> SessionReport {
    let mut forms_data = BTreeMap::new();
    for document in documents {
        forms_data.insert(
            document.name.clone(),
            FormReportEntry {
                text_length: document.text.chars().count(),
                status: "Processed".to_string(),
                file_type: document.format,
            },
        );
    }

    SessionReport {
        forms_data,
        single_form_qa_result: qa_result.cloned().unwrap_or_default(),
        form_summary_result: summary_result.cloned().unwrap_or_default(),
        holistic_analysis_result: holistic_result.cloned(),
    }
}
