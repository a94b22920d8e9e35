//! Query building: turns raw form values into a validated [`SearchQuery`].

pub mod doc_types;

use serde::Serialize;
use tracing::warn;

use crate::ids::parse_identifiers;
use doc_types::canonical_doc_type;

pub const DEFAULT_MAX_RESULTS: u32 = 100;
pub const DEFAULT_MAX_PER_PROJECT: u32 = 100;
const MAX_LIMIT: i64 = 1000;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be a date in YYYY-MM-DD format, got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("date range is reversed: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },
}

/// Keyword-mode request body for `/api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub doc_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub max_results: u32,
}

/// Project-mode request body for `/api/project-search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    pub project_ids: Vec<String>,
    pub doc_type: String,
    pub max_per_project: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchQuery {
    Keyword(KeywordQuery),
    ByProjectId(ProjectQuery),
}

impl SearchQuery {
    /// Service path handling this query's mode.
    pub fn endpoint(&self) -> &'static str {
        match self {
            SearchQuery::Keyword(_) => "/api/search",
            SearchQuery::ByProjectId(_) => "/api/project-search",
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            SearchQuery::Keyword(_) => "keyword",
            SearchQuery::ByProjectId(_) => "project",
        }
    }
}

/// Raw keyword-search form values, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct KeywordForm {
    pub query: String,
    pub country: String,
    pub topic: String,
    pub doc_type: String,
    pub from_date: String,
    pub to_date: String,
    pub language: String,
    pub max_results: String,
}

/// Raw project-search form values. `project_ids` is free text.
#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub project_ids: String,
    pub doc_type: String,
    pub max_per_project: String,
}

/// Build a keyword query. A fully empty form is valid; the service decides.
pub fn build_keyword(form: &KeywordForm) -> Result<SearchQuery, QueryError> {
    let from_date = checked_date("fromDate", &form.from_date)?;
    let to_date = checked_date("toDate", &form.to_date)?;
    if let (Some(from), Some(to)) = (&from_date, &to_date)
        && from > to
    {
        return Err(QueryError::InvalidDateRange {
            from: from.clone(),
            to: to.clone(),
        });
    }

    Ok(SearchQuery::Keyword(KeywordQuery {
        query: form.query.trim().to_string(),
        country: non_blank(&form.country),
        topic: non_blank(&form.topic),
        doc_type: normalize_doc_type(&form.doc_type),
        from_date,
        to_date,
        language: non_blank(&form.language),
        max_results: clamp_limit("maxResults", &form.max_results, DEFAULT_MAX_RESULTS)?,
    }))
}

/// Build a project query. An empty ID list is still submitted; the service
/// rejects it.
pub fn build_project(form: &ProjectForm) -> Result<SearchQuery, QueryError> {
    Ok(SearchQuery::ByProjectId(ProjectQuery {
        project_ids: parse_identifiers(&form.project_ids),
        doc_type: normalize_doc_type(&form.doc_type),
        max_per_project: clamp_limit(
            "maxPerProject",
            &form.max_per_project,
            DEFAULT_MAX_PER_PROJECT,
        )?,
    }))
}

/// Coerce a raw limit to an integer in `[1, 1000]`. Blank means `default`.
fn clamp_limit(field: &'static str, raw: &str, default: u32) -> Result<u32, QueryError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    let n: i64 = raw.parse().map_err(|_| QueryError::InvalidNumber {
        field,
        value: raw.to_string(),
    })?;
    // Lossless: the clamp bounds fit in u32.
    Ok(n.clamp(1, MAX_LIMIT) as u32)
}

/// Known labels take their catalog spelling; anything else is sent as typed.
fn normalize_doc_type(raw: &str) -> String {
    if let Some(label) = canonical_doc_type(raw) {
        return label.to_string();
    }
    let value = raw.trim().to_string();
    warn!(doc_type = %value, "document type not in the built-in catalog; sending as given");
    value
}

fn checked_date(field: &'static str, raw: &str) -> Result<Option<String>, QueryError> {
    let Some(value) = non_blank(raw) else {
        return Ok(None);
    };
    if is_iso_date(&value) {
        Ok(Some(value))
    } else {
        Err(QueryError::InvalidDate { field, value })
    }
}

fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return false;
    }
    let digits = |r: std::ops::Range<usize>| -> Option<u32> {
        let part = &s[r];
        part.bytes()
            .all(|c| c.is_ascii_digit())
            .then(|| part.parse().ok())
            .flatten()
    };
    matches!(
        (digits(0..4), digits(5..7), digits(8..10)),
        (Some(_), Some(1..=12), Some(1..=31))
    )
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(q: SearchQuery) -> KeywordQuery {
        match q {
            SearchQuery::Keyword(k) => k,
            other => panic!("expected keyword query, got: {other:?}"),
        }
    }

    fn project(q: SearchQuery) -> ProjectQuery {
        match q {
            SearchQuery::ByProjectId(p) => p,
            other => panic!("expected project query, got: {other:?}"),
        }
    }

    #[test]
    fn empty_keyword_form_uses_defaults() {
        let q = keyword(build_keyword(&KeywordForm::default()).unwrap());
        assert_eq!(q.query, "");
        assert_eq!(q.doc_type, "");
        assert_eq!(q.max_results, DEFAULT_MAX_RESULTS);
        assert!(q.country.is_none() && q.from_date.is_none());
    }

    #[test]
    fn max_results_is_clamped() {
        for (raw, want) in [("0", 1), ("-5", 1), ("1", 1), ("250", 250), ("5000", 1000)] {
            let form = KeywordForm {
                max_results: raw.into(),
                ..Default::default()
            };
            assert_eq!(keyword(build_keyword(&form).unwrap()).max_results, want, "raw={raw}");
        }
    }

    #[test]
    fn non_numeric_limit_is_rejected() {
        let form = ProjectForm {
            max_per_project: "ten".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_project(&form),
            Err(QueryError::InvalidNumber { field: "maxPerProject", .. })
        ));

        let decimal = KeywordForm {
            max_results: "10.5".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_keyword(&decimal),
            Err(QueryError::InvalidNumber { field: "maxResults", .. })
        ));
    }

    #[test]
    fn dates_are_validated() {
        let bad = KeywordForm {
            from_date: "2020/01/01".into(),
            ..Default::default()
        };
        assert!(matches!(build_keyword(&bad), Err(QueryError::InvalidDate { .. })));

        let reversed = KeywordForm {
            from_date: "2021-01-01".into(),
            to_date: "2020-12-31".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_keyword(&reversed),
            Err(QueryError::InvalidDateRange { .. })
        ));

        let ok = KeywordForm {
            from_date: "2020-01-01".into(),
            ..Default::default()
        };
        let q = keyword(build_keyword(&ok).unwrap());
        assert_eq!(q.from_date.as_deref(), Some("2020-01-01"));
        assert!(q.to_date.is_none());
    }

    #[test]
    fn doc_type_is_normalized() {
        let form = KeywordForm {
            doc_type: "board report".into(),
            ..Default::default()
        };
        assert_eq!(keyword(build_keyword(&form).unwrap()).doc_type, "Board Report");
    }

    #[test]
    fn doc_type_outside_builtin_catalog_passes_through() {
        let form = ProjectForm {
            doc_type: "  Implementation Completion and Results Report ".into(),
            ..Default::default()
        };
        assert_eq!(
            project(build_project(&form).unwrap()).doc_type,
            "Implementation Completion and Results Report"
        );
    }

    #[test]
    fn project_ids_are_parsed_and_empty_list_allowed() {
        let form = ProjectForm {
            project_ids: "P162789, P160628\nP121507".into(),
            ..Default::default()
        };
        let q = project(build_project(&form).unwrap());
        assert_eq!(q.project_ids, vec!["P162789", "P160628", "P121507"]);
        assert_eq!(q.max_per_project, DEFAULT_MAX_PER_PROJECT);

        let empty = project(build_project(&ProjectForm::default()).unwrap());
        assert!(empty.project_ids.is_empty());
    }

    #[test]
    fn serializes_to_service_field_names() {
        let q = build_project(&ProjectForm {
            project_ids: "P1".into(),
            doc_type: "".into(),
            max_per_project: "7".into(),
        })
        .unwrap();
        assert_eq!(q.endpoint(), "/api/project-search");
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            serde_json::json!({"projectIds": ["P1"], "docType": "", "maxPerProject": 7})
        );

        let q = build_keyword(&KeywordForm {
            query: " water ".into(),
            country: "Kenya".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(q.endpoint(), "/api/search");
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            serde_json::json!({
                "query": "water",
                "country": "Kenya",
                "docType": "",
                "maxResults": 100
            })
        );
    }
}
