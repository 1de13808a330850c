use crate::domain::post::{
    Category, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageMeta, PageRequest, Post, PostDraft, PostFilter, PostPage, slugify,
};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use validator::{Validate, ValidationError};

const FORBIDDEN_TITLE_CHARS: &[char] = &['~', '%', '^', ';', '\'', '<', '>'];

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.contains(FORBIDDEN_TITLE_CHARS) {
        return Err(ValidationError::new("title").with_message("Must not contain any of ~ % ^ ; ' < >".into()));
    }
    if slugify(title).is_empty() {
        return Err(ValidationError::new("title").with_message("Must contain letters or digits".into()));
    }
    Ok(())
}

/// Body of both create and update. Title and content are trimmed before validation.
#[derive(Debug, Deserialize, Validate)]
pub struct PostInput {
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        length(min = 10, max = 255, message = "Must be between 10 and 255 characters"),
        custom(function = "validate_title")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Must be at most 255 characters"))]
    pub excerpt: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 50, message = "Must be at least 50 characters"))]
    pub content: String,
    #[validate(range(min = 1, message = "Must name a category"))]
    pub category_id: i64,
}

impl From<PostInput> for PostDraft {
    fn from(input: PostInput) -> Self {
        Self { title: input.title, excerpt: input.excerpt, content: input.content, category_id: input.category_id }
    }
}

/// `GET /api/posts` query. A `cursor` switches from numbered pages to cursor mode.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListPosts {
    #[validate(range(min = 1, message = "Must be a positive post id"))]
    pub cursor: Option<i64>,
    #[validate(range(min = 1, message = "Must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Must be between 1 and 100"))]
    pub limit: Option<u32>,
    /// Total from an earlier response; skips the count.
    pub total: Option<u64>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub user: Option<i64>,
}

impl ListPosts {
    #[must_use]
    pub fn into_parts(self) -> (PostFilter, PageRequest) {
        let non_empty = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let filter = PostFilter { category: non_empty(self.category), search: non_empty(self.search), user_id: self.user };
        let page = match self.cursor {
            Some(from) => PageRequest::Cursor { from, limit },
            None => PageRequest::Offset { page: self.page.unwrap_or(1), limit, known_total: self.total },
        };
        (filter, page)
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self { id: category.id, name: category.name, slug: category.slug }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: CategoryResponse,
    pub author: AuthorResponse,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            content: post.content,
            category: post.category.into(),
            author: AuthorResponse {
                name: post.author.name,
                username: post.author.username,
                avatar: post.author.avatar,
            },
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageMetaResponse {
    pub current_page: u32,
    pub total: u64,
    pub last_page: u64,
    pub limit: u32,
    pub offset: u64,
}

impl From<PageMeta> for PageMetaResponse {
    fn from(meta: PageMeta) -> Self {
        Self {
            current_page: meta.current_page,
            total: meta.total,
            last_page: meta.last_page,
            limit: meta.limit,
            offset: meta.offset,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_meta: Option<PageMetaResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<i64>,
}

impl From<PostPage> for PostListResponse {
    fn from(page: PostPage) -> Self {
        Self {
            posts: page.posts.into_iter().map(Into::into).collect(),
            pagination_meta: page.meta.map(Into::into),
            next_cursor: page.next_cursor,
        }
    }
}
