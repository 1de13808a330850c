//! Posts, categories and listing windows.

use time::OffsetDateTime;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// The public face of a post's author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAuthor {
    pub name: Option<String>,
    pub username: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: Category,
    pub author: PostAuthor,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Author-supplied fields of a post, as accepted on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: i64,
}

/// A row ready to be written: the draft plus its owner and derived slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category_id: i64,
}

impl NewPost {
    #[must_use]
    pub fn from_draft(user_id: i64, draft: PostDraft) -> Self {
        Self {
            user_id,
            slug: slugify(&draft.title),
            title: draft.title,
            excerpt: draft.excerpt,
            content: draft.content,
            category_id: draft.category_id,
        }
    }
}

/// Turns a title into a URL slug: lowercase ASCII letters and digits joined by single dashes.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    /// Category slug, already checked to exist.
    pub category: Option<String>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub user_id: Option<i64>,
}

/// Which slice of the ordered post list to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Posts with `id >= from`, in id order.
    Cursor { from: i64, limit: u32 },
    /// Numbered pages. A known total skips the count query.
    Offset { page: u32, limit: u32, known_total: Option<u64> },
}

/// Rows the store should return, in id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from_id: i64,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: u32,
    pub total: u64,
    pub last_page: u64,
    pub limit: u32,
    pub offset: u64,
}

impl PageMeta {
    #[must_use]
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        Self {
            current_page: page,
            total,
            last_page: total.div_ceil(u64::from(limit)),
            limit,
            offset: u64::from(page.saturating_sub(1)) * u64::from(limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Present for numbered pages only.
    pub meta: Option<PageMeta>,
    /// Id to pass as the next cursor, when more posts follow.
    pub next_cursor: Option<i64>,
}
