use super::CommentRepository;
use crate::error::Result;
use crate::models::{Comment, NewComment, ReactionCounts, ReactionUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const APPLY_REACTION_SQL: &str = r#"
    UPDATE comments
    SET likes = CASE $2
            WHEN 'add' THEN
                CASE WHEN $1 = ANY(likes) THEN likes ELSE array_append(likes, $1) END
            WHEN 'remove' THEN array_remove(likes, $1)
            ELSE likes
        END,
        updated_at = NOW()
    WHERE id = $3
    RETURNING cardinality(likes)
"#;

#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    content: String,
    post_id: Uuid,
    author_id: Uuid,
    likes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            content: row.content,
            post_id: row.post_id,
            author_id: row.author_id,
            likes: row.likes.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (content, post_id, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, post_id, author_id, likes, created_at, updated_at
            "#,
        )
        .bind(&new_comment.content)
        .bind(new_comment.post_id)
        .bind(new_comment.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, content, post_id, author_id, likes, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Comment::from))
    }

    async fn list_comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, content, post_id, author_id, likes, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn apply_comment_reaction(
        &self,
        id: Uuid,
        update: ReactionUpdate,
    ) -> Result<Option<ReactionCounts>> {
        let likes = sqlx::query_scalar::<_, Option<i32>>(APPLY_REACTION_SQL)
            .bind(update.user_id)
            .bind(update.likes.as_sql())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(likes.map(|likes| ReactionCounts {
            likes: likes.unwrap_or(0) as usize,
            dislikes: None,
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
