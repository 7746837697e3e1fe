use super::PostRepository;
use crate::error::Result;
use crate::models::{NewPost, Post, ReactionCounts, ReactionUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Targeted membership update for both reaction arrays.
///
/// `$2`/`$3` carry the `SetOp` tag for likes/dislikes. Adds are guarded by
/// `= ANY` so an id never appears twice.
const APPLY_REACTION_SQL: &str = r#"
    UPDATE posts
    SET likes = CASE $2
            WHEN 'add' THEN
                CASE WHEN $1 = ANY(likes) THEN likes ELSE array_append(likes, $1) END
            WHEN 'remove' THEN array_remove(likes, $1)
            ELSE likes
        END,
        dislikes = CASE $3
            WHEN 'add' THEN
                CASE WHEN $1 = ANY(dislikes) THEN dislikes ELSE array_append(dislikes, $1) END
            WHEN 'remove' THEN array_remove(dislikes, $1)
            ELSE dislikes
        END,
        updated_at = NOW()
    WHERE id = $4
    RETURNING cardinality(likes), cardinality(dislikes)
"#;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    body: String,
    cover_image_url: String,
    author_id: Uuid,
    likes: Vec<Uuid>,
    dislikes: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            title: row.title,
            body: row.body,
            cover_image_url: row.cover_image_url,
            author_id: row.author_id,
            likes: row.likes.into(),
            dislikes: row.dislikes.into(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create_post(&self, new_post: NewPost) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, body, cover_image_url, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, body, cover_image_url, author_id, likes, dislikes, created_at, updated_at
            "#,
        )
        .bind(&new_post.title)
        .bind(&new_post.body)
        .bind(&new_post.cover_image_url)
        .bind(new_post.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, cover_image_url, author_id, likes, dislikes, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, cover_image_url, author_id, likes, dislikes, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn apply_post_reaction(
        &self,
        id: Uuid,
        update: ReactionUpdate,
    ) -> Result<Option<ReactionCounts>> {
        let counts = sqlx::query_as::<_, (Option<i32>, Option<i32>)>(APPLY_REACTION_SQL)
            .bind(update.user_id)
            .bind(update.likes.as_sql())
            .bind(update.dislikes.as_sql())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(counts.map(|(likes, dislikes)| ReactionCounts {
            likes: likes.unwrap_or(0) as usize,
            dislikes: Some(dislikes.unwrap_or(0) as usize),
        }))
    }

    async fn delete_post_cascade(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let comments = sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let posts = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if posts.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        tracing::debug!(
            post_id = %id,
            comments_deleted = comments.rows_affected(),
            "post deleted with comments"
        );
        Ok(true)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
