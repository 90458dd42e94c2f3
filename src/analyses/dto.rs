use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Analysis, Document};

/// Body of `POST /analyses`. Any owner field the client sends is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateAnalysisRequest {
    pub name: String,
    #[serde(rename = "formData", alias = "form_data", default)]
    pub form_data: Document,
    #[serde(rename = "acceptedSuggestions", alias = "accepted_suggestions", default)]
    pub accepted_suggestions: Vec<Document>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl From<Analysis> for AnalysisSummary {
    fn from(a: Analysis) -> Self {
        Self {
            id: a.id,
            name: a.name,
            timestamp: a.created_at,
        }
    }
}
