use crate::domain::post::{Category, Post, PostAuthor};
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Self { id: record.id, name: record.name, slug: record.slug }
    }
}

/// A post row joined with its category and author.
#[derive(sqlx::FromRow)]
pub(crate) struct PostRecord {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub category_id: i64,
    pub category_name: String,
    pub category_slug: String,
    pub author_name: Option<String>,
    pub author_username: String,
    pub author_avatar: Option<String>,
}

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            slug: record.slug,
            excerpt: record.excerpt,
            content: record.content,
            category: Category { id: record.category_id, name: record.category_name, slug: record.category_slug },
            author: PostAuthor {
                name: record.author_name,
                username: record.author_username,
                avatar: record.author_avatar,
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
