//! Output types returned by a successful analysis.

use serde::Serialize;

/// The success response contract: where the report artifacts live and what
/// the request contained.
///
/// Serialises directly as the HTTP response body, so field names are part
/// of the external interface.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    /// Shared base identifier of both artifacts
    /// (`case_report_YYYYmmdd_HHMMSS`).
    pub base_name: String,
    /// Filename of the plain-text artifact (`{base_name}.txt`).
    pub txt_file: String,
    /// Filename of the PDF artifact (`{base_name}.pdf`).
    pub pdf_file: String,
    /// Original filenames received, in upload order.
    pub files_received: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_serialises_with_contract_field_names() {
        let output = AnalysisOutput {
            base_name: "case_report_20260807_120000".into(),
            txt_file: "case_report_20260807_120000.txt".into(),
            pdf_file: "case_report_20260807_120000.pdf".into(),
            files_received: vec!["claim.pdf".into()],
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["base_name"], "case_report_20260807_120000");
        assert_eq!(json["txt_file"], "case_report_20260807_120000.txt");
        assert_eq!(json["pdf_file"], "case_report_20260807_120000.pdf");
        assert_eq!(json["files_received"][0], "claim.pdf");
    }
}
