use sqlx::PgPool;

use crate::{
    error::Result,
    models::{Comment, CommentRequest},
};

const COMMENT_SELECT: &str = "SELECT c.*,
    (SELECT COUNT(*) FROM comment_likes l WHERE l.comment_id = c.id) AS likes
    FROM comments c";

pub async fn list_for_product(pool: &PgPool, product_id: i32) -> Result<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>(&format!(
        "{} WHERE c.product_id = $1 ORDER BY c.created_at DESC",
        COMMENT_SELECT
    ))
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

pub async fn list_flagged(pool: &PgPool) -> Result<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>(&format!(
        "{} WHERE c.flagged = TRUE ORDER BY c.created_at DESC",
        COMMENT_SELECT
    ))
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Comment>> {
    let comment = sqlx::query_as::<_, Comment>(&format!("{} WHERE c.id = $1", COMMENT_SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(comment)
}

pub async fn insert_comment(
    pool: &PgPool,
    user_id: i32,
    author_name: &str,
    req: &CommentRequest,
) -> Result<Comment> {
    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (product_id, user_id, author_name, body, rating)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *, 0::BIGINT AS likes",
    )
    .bind(req.product_id)
    .bind(user_id)
    .bind(author_name)
    .bind(req.body.trim())
    .bind(req.rating)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Returns false when this user already liked the comment.
pub async fn add_like(pool: &PgPool, comment_id: i32, user_id: i32) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO comment_likes (comment_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(comment_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn flag_comment(pool: &PgPool, id: i32, reason: Option<&str>) -> Result<u64> {
    let result = sqlx::query("UPDATE comments SET flagged = TRUE, flag_reason = $1 WHERE id = $2")
        .bind(reason)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_comment(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
