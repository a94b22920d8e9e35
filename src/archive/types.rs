use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNTITLED: &str = "Untitled Document";
const ABSTRACT_PREVIEW_CHARS: usize = 200;

/// Container for the abstract text. The service nests it under `cdata!`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Abstracts {
    #[serde(rename = "cdata!", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A search hit. Fields the client does not interpret (`pdfurl`, `guid`, ...)
/// are kept in `extra` and sent back untouched on download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "docdt", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "count", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstracts: Option<Abstracts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    /// `display_title`, else `title`, else [`UNTITLED`]. Blank strings count as absent.
    pub fn display_title(&self) -> &str {
        [&self.display_title, &self.title]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|t| !t.trim().is_empty())
            .unwrap_or(UNTITLED)
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.abstracts
            .as_ref()
            .and_then(|a| a.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    /// First 200 characters of the abstract followed by `...`.
    pub fn abstract_preview(&self) -> Option<String> {
        self.abstract_text().map(|text| {
            let mut preview: String = text.chars().take(ABSTRACT_PREVIEW_CHARS).collect();
            preview.push_str("...");
            preview
        })
    }

    /// Date portion of `docdt` (the service sends `YYYY-MM-DDThh:mm:ssZ`).
    pub fn short_date(&self) -> Option<&str> {
        self.date
            .as_deref()
            .map(|d| d.split_once('T').map_or(d, |(day, _)| day))
            .filter(|d| !d.is_empty())
    }
}

/// Success body of both search endpoints. Either field may be missing.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub documents: Option<Vec<Document>>,
    pub error: Option<String>,
}

/// Error body shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DownloadRequest<'a> {
    pub documents: &'a [Document],
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: Option<String>,
}
