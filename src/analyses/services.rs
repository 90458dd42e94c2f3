use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::CreateAnalysisRequest,
    repo::AnalysisRepo,
    repo_types::{Analysis, NewAnalysis},
};
use crate::error::{ApiError, ApiResult};

/// Fixed upper bound on a listing; there is no paging.
pub const LIST_LIMIT: i64 = 100;

pub async fn create<R: AnalysisRepo + ?Sized>(
    repo: &R,
    owner: Uuid,
    req: CreateAnalysisRequest,
) -> ApiResult<Analysis> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Analysis name is required".into()));
    }

    let analysis = repo
        .insert_analysis(NewAnalysis {
            user_id: owner,
            name: name.to_string(),
            form_data: req.form_data,
            accepted_suggestions: req.accepted_suggestions,
        })
        .await?;
    info!(analysis_id = %analysis.id, user_id = %owner, "analysis created");
    Ok(analysis)
}

pub async fn list_for<R: AnalysisRepo + ?Sized>(
    repo: &R,
    owner: Uuid,
) -> ApiResult<Vec<Analysis>> {
    Ok(repo.list_analyses_for(owner, LIST_LIMIT).await?)
}

/// Absent is `NotFound`; owned by someone else is `Forbidden`.
pub async fn get_owned<R: AnalysisRepo + ?Sized>(
    repo: &R,
    id: Uuid,
    caller: Uuid,
) -> ApiResult<Analysis> {
    let analysis = repo.find_analysis(id).await?.ok_or(ApiError::NotFound)?;
    if analysis.user_id != caller {
        warn!(analysis_id = %id, user_id = %caller, "access to foreign analysis");
        return Err(ApiError::Forbidden);
    }
    Ok(analysis)
}

pub async fn delete<R: AnalysisRepo + ?Sized>(
    repo: &R,
    id: Uuid,
    caller: Uuid,
) -> ApiResult<()> {
    get_owned(repo, id, caller).await?;
    // gone in between: treat like it was never there
    if !repo.delete_analysis(id, caller).await? {
        return Err(ApiError::NotFound);
    }
    info!(analysis_id = %id, user_id = %caller, "analysis deleted");
    Ok(())
}
