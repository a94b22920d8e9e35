use serde::{Deserialize, Serialize};

/// One entry of the document-type picker. `value` is what goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTypeOption {
    pub value: String,
    pub label: String,
}

/// Wire value meaning "no document-type filter".
pub const ALL_TYPES: &str = "";
pub const ALL_TYPES_LABEL: &str = "All Document Types";

/// Static World Bank document-type catalog. Values equal their labels.
pub const DOC_TYPES: &[&str] = &[
    "Procurement Plan",
    "Project Appraisal Document",
    "Project Information Document",
    "Implementation Status and Results Report",
    "Environmental Assessment",
    "Project Paper",
    "Integrated Safeguards Data Sheet",
    "Board Report",
    "Loan Agreement",
    "Program Document",
    "Working Paper",
    "Policy Note",
    "Economic and Sector Work",
    "Staff Appraisal Report",
    "Country Economic Report",
    "Sector Report",
    "Publication",
    "Technical Report",
    "Brief",
    "Minutes",
    "Financial Statement",
    "Memorandum & Recommendation",
    "Agreement",
];

/// Resolve user input to its canonical catalog value (case-insensitive).
///
/// Blank input resolves to [`ALL_TYPES`]. Returns `None` for unknown types.
pub fn canonical_doc_type(input: &str) -> Option<&'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Some(ALL_TYPES);
    }
    DOC_TYPES
        .iter()
        .copied()
        .find(|t| t.eq_ignore_ascii_case(input))
}

/// The catalog as picker options, "all types" sentinel first.
pub fn static_catalog() -> Vec<DocTypeOption> {
    std::iter::once(DocTypeOption {
        value: ALL_TYPES.to_string(),
        label: ALL_TYPES_LABEL.to_string(),
    })
    .chain(DOC_TYPES.iter().map(|t| DocTypeOption {
        value: (*t).to_string(),
        label: (*t).to_string(),
    }))
    .collect()
}
