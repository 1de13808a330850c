use crate::domain::post::{Category, NewPost, Post, PostFilter, Window};
use crate::storage::records::{CategoryRecord, PostRecord};
use crate::storage::{DbPool, PostStore, StoreError};
use async_trait::async_trait;

const POST_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.title, p.slug, p.excerpt, p.content, p.created_at, p.updated_at,
           c.id AS category_id, c.name AS category_name, c.slug AS category_slug,
           u.name AS author_name, u.username AS author_username, u.avatar AS author_avatar
    FROM posts p
    JOIN categories c ON c.id = p.category_id
    JOIN users u ON u.id = p.user_id
"#;

// Absent filters bind NULL and match everything.
const POST_FILTER: &str = r#"
    ($1::text IS NULL OR c.slug = $1)
    AND ($2::text IS NULL OR p.title ILIKE '%' || $2 || '%')
    AND ($3::bigint IS NULL OR p.user_id = $3)
"#;

/// Escapes `LIKE` metacharacters so a search term matches literally.
fn like_literal(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone, Debug)]
pub struct PgPostStore {
    pool: DbPool,
}

impl PgPostStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_post_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let record = sqlx::query_as::<_, PostRecord>(&format!("{POST_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Into::into))
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let records = sqlx::query_as::<_, CategoryRecord>("SELECT id, name, slug FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError> {
        let record = sqlx::query_as::<_, CategoryRecord>("SELECT id, name, slug FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let record = sqlx::query_as::<_, CategoryRecord>("SELECT id, name, slug FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(skip(self, post), fields(slug = %post.slug), level = "debug")]
    async fn create_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts (user_id, title, slug, excerpt, content, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(post.user_id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.category_id)
        .fetch_one(&self.pool)
        .await?;

        self.find_post_by_id(id).await?.ok_or_else(|| anyhow::anyhow!("post {id} vanished after insert").into())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let record = sqlx::query_as::<_, PostRecord>(&format!("{POST_SELECT} WHERE p.slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record.map(Into::into))
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn list_posts(&self, filter: &PostFilter, window: Window) -> Result<Vec<Post>, StoreError> {
        let records = sqlx::query_as::<_, PostRecord>(&format!(
            "{POST_SELECT} WHERE {POST_FILTER} AND p.id >= $4 ORDER BY p.id OFFSET $5 LIMIT $6"
        ))
        .bind(filter.category.as_deref())
        .bind(filter.search.as_deref().map(like_literal))
        .bind(filter.user_id)
        .bind(window.from_id)
        .bind(i64::try_from(window.offset).unwrap_or(i64::MAX))
        .bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn count_posts(&self, filter: &PostFilter) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM posts p JOIN categories c ON c.id = p.category_id WHERE {POST_FILTER}"
        ))
        .bind(filter.category.as_deref())
        .bind(filter.search.as_deref().map(like_literal))
        .bind(filter.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    #[tracing::instrument(skip(self, post), fields(slug = %post.slug), level = "debug")]
    async fn update_post(&self, id: i64, post: &NewPost) -> Result<Option<Post>, StoreError> {
        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET title = $1, slug = $2, excerpt = $3, content = $4, category_id = $5, updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(post.category_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_post_by_id(id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM posts WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
