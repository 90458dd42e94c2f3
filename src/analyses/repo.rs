use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::repo_types::{Analysis, AnalysisRow, NewAnalysis};
use crate::db::{PgStore, StoreError};

#[async_trait]
pub trait AnalysisRepo: Send + Sync {
    async fn insert_analysis(&self, new: NewAnalysis) -> Result<Analysis, StoreError>;

    /// Newest first, never more than `limit` rows, only rows owned by `owner`.
    async fn list_analyses_for(&self, owner: Uuid, limit: i64)
        -> Result<Vec<Analysis>, StoreError>;

    async fn find_analysis(&self, id: Uuid) -> Result<Option<Analysis>, StoreError>;

    /// Deletes `id` only if `owner` owns it. Returns whether a row went away.
    async fn delete_analysis(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
impl AnalysisRepo for PgStore {
    async fn insert_analysis(&self, new: NewAnalysis) -> Result<Analysis, StoreError> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO analyses (id, user_id, name, form_data, accepted_suggestions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, form_data, accepted_suggestions, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.name)
        .bind(Json(&new.form_data))
        .bind(Json(&new.accepted_suggestions))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn list_analyses_for(
        &self,
        owner: Uuid,
        limit: i64,
    ) -> Result<Vec<Analysis>, StoreError> {
        let rows = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT id, user_id, name, form_data, accepted_suggestions, created_at
            FROM analyses
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Analysis::from).collect())
    }

    async fn find_analysis(&self, id: Uuid) -> Result<Option<Analysis>, StoreError> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT id, user_id, name, form_data, accepted_suggestions, created_at
            FROM analyses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Analysis::from))
    }

    async fn delete_analysis(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let done = sqlx::query("DELETE FROM analyses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
