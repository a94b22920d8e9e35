use crate::archive::Document;
use crate::query::doc_types::DocTypeOption;
use crate::session::selection::Selection;

/// Render the result list with selection markers, one block per document.
pub fn format_documents(documents: &[Document], selection: &Selection) -> String {
    let mut out = format!("Documents ({})", documents.len());
    if !selection.is_empty() {
        out.push_str(&format!(", {} selected", selection.len()));
        if selection.all_selected() {
            out.push_str(" (select all)");
        }
    }
    out.push_str("\n\n");

    for doc in documents {
        let mark = if selection.is_selected(doc) { "x" } else { " " };
        out.push_str(&format!("[{mark}] {}  {}\n", doc.id, single_line(doc.display_title())));

        let meta: Vec<String> = [
            doc.project_id.as_deref().map(|p| format!("Project: {p}")),
            doc.short_date().map(|d| format!("Date: {d}")),
            doc.country.as_deref().map(|c| format!("Country: {c}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !meta.is_empty() {
            out.push_str(&format!("    {}\n", meta.join(" | ")));
        }

        if let Some(preview) = doc.abstract_preview() {
            out.push_str(&format!("    {}\n", single_line(&preview)));
        }
    }

    out
}

pub fn format_doc_types(options: &[DocTypeOption]) -> String {
    let mut out = String::new();
    for option in options {
        if option.value.is_empty() {
            out.push_str(&format!("\"\"  ({})\n", option.label));
        } else {
            out.push_str(&option.label);
            out.push('\n');
        }
    }
    out
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::doc_types::static_catalog;
    use serde_json::json;

    fn docs() -> Vec<Document> {
        serde_json::from_value(json!([
            {
                "id": "D1",
                "display_title": "Water\nSupply Project",
                "project_id": "P123456",
                "docdt": "2019-06-30T00:00:00Z",
                "count": "Kenya",
                "abstracts": {"cdata!": "Improves access to water."}
            },
            {"id": "D2"}
        ]))
        .unwrap()
    }

    #[test]
    fn lists_documents_with_metadata() {
        let docs = docs();
        let text = format_documents(&docs, &Selection::default());
        assert!(text.starts_with("Documents (2)\n"));
        assert!(text.contains("[ ] D1  Water Supply Project"));
        assert!(text.contains("Project: P123456 | Date: 2019-06-30 | Country: Kenya"));
        assert!(text.contains("Improves access to water...."));
        assert!(text.contains("[ ] D2  Untitled Document"));
    }

    #[test]
    fn marks_selected_documents() {
        let docs = docs();
        let mut selection = Selection::default();
        selection.toggle_one(&docs[1]);
        let text = format_documents(&docs, &selection);
        assert!(text.contains("Documents (2), 1 selected"));
        assert!(text.contains("[x] D2"));
        assert!(text.contains("[ ] D1"));
    }

    #[test]
    fn doc_types_show_sentinel() {
        let text = format_doc_types(&static_catalog());
        assert!(text.starts_with("\"\"  (All Document Types)\n"));
        assert!(text.contains("Project Appraisal Document\n"));
    }
}
