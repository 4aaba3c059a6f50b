use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Comment, CommentRequest, CommentThread, FlagRequest, UserRole},
    queries::{comment_queries, products_queries},
    services::report_service,
    utils::{
        extractors::extract_user_id,
        jwt::Claims,
        request::{AppJson, AppPath},
    },
};

const MAX_BODY_CHARS: usize = 2000;
const MAX_REASON_CHARS: usize = 500;

fn validate_comment(payload: &CommentRequest) -> Result<()> {
    let body = payload.body.trim();

    if body.is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".to_string()));
    }

    if body.chars().count() > MAX_BODY_CHARS {
        return Err(AppError::BadRequest(format!(
            "Comment cannot be longer than {} characters",
            MAX_BODY_CHARS
        )));
    }

    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    Ok(())
}

pub async fn list_comments(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i32>,
) -> Result<Json<CommentThread>> {
    let comments = comment_queries::list_for_product(&state.db, product_id).await?;
    let ratings: Vec<i16> = comments.iter().map(|c| c.rating).collect();

    Ok(Json(CommentThread {
        rating: report_service::rating_summary(&ratings),
        comments,
    }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CommentRequest>,
) -> Result<Json<Comment>> {
    validate_comment(&payload)?;
    let user_id = extract_user_id(&claims)?;

    products_queries::find_by_id(&state.db, payload.product_id)
        .await?
        .filter(|p| p.enabled)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let comment =
        comment_queries::insert_comment(&state.db, user_id, &claims.name, &payload).await?;

    Ok(Json(comment))
}

pub async fn like_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Comment>> {
    let user_id = extract_user_id(&claims)?;

    if comment_queries::find_by_id(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }

    comment_queries::add_like(&state.db, id, user_id).await?;

    let comment = comment_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    Ok(Json(comment))
}

pub async fn flag_comment(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<FlagRequest>,
) -> Result<StatusCode> {
    let reason = payload
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    if reason.is_some_and(|r| r.chars().count() > MAX_REASON_CHARS) {
        return Err(AppError::BadRequest("Reason is too long".to_string()));
    }

    let affected = comment_queries::flag_comment(&state.db, id, reason).await?;
    if affected == 0 {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }

    tracing::info!("Comment {} flagged for moderation", id);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode> {
    let user_id = extract_user_id(&claims)?;

    let comment = comment_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.user_id != user_id && claims.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Only the author can delete this comment".to_string(),
        ));
    }

    comment_queries::delete_comment(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn flagged_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>> {
    let comments = comment_queries::list_flagged(&state.db).await?;

    Ok(Json(comments))
}
