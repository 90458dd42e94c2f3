use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

/// Open key/value document as submitted by the client.
pub type Document = Map<String, Value>;

#[derive(Debug, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub form_data: Json<Document>,
    pub accepted_suggestions: Json<Vec<Document>>,
    pub created_at: OffsetDateTime,
}

/// A stored analysis. `user_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "formData")]
    pub form_data: Document,
    #[serde(rename = "acceptedSuggestions")]
    pub accepted_suggestions: Vec<Document>,
    #[serde(rename = "timestamp", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<AnalysisRow> for Analysis {
    fn from(r: AnalysisRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            form_data: r.form_data.0,
            accepted_suggestions: r.accepted_suggestions.0,
            created_at: r.created_at,
        }
    }
}

/// Insert payload; the owner always comes from the authenticated caller.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub user_id: Uuid,
    pub name: String,
    pub form_data: Document,
    pub accepted_suggestions: Vec<Document>,
}
