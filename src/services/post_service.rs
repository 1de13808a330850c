use crate::domain::post::{Category, NewPost, PageMeta, PageRequest, Post, PostDraft, PostFilter, PostPage, Window};
use crate::error::{AppError, Result};
use crate::storage::{PostStore, StoreError};
use opentelemetry::{global, metrics::Counter};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct Metrics {
    posts_created_total: Counter<u64>,
    posts_deleted_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("inkwell-server");
        Self {
            posts_created_total: meter
                .u64_counter("posts_created_total")
                .with_description("Total number of posts published")
                .build(),
            posts_deleted_total: meter
                .u64_counter("posts_deleted_total")
                .with_description("Total number of posts deleted by their authors")
                .build(),
        }
    }
}

fn write_error(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
    move |e| match e {
        StoreError::Duplicate => AppError::DuplicateTitle,
        StoreError::Unexpected(e) => AppError::internal(context, e),
    }
}

/// Post publishing and browsing. Only a post's author may change or remove it.
#[derive(Clone, Debug)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    metrics: Metrics,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts, metrics: Metrics::new() }
    }

    /// # Errors
    /// `AppError::NoCategory` for an unknown category, `AppError::DuplicateTitle` if the title's slug is taken.
    #[tracing::instrument(skip(self, draft), fields(user_id = auth_user_id))]
    pub async fn create(&self, auth_user_id: i64, draft: PostDraft) -> Result<Post> {
        self.require_category(draft.category_id).await?;

        let post = self
            .posts
            .create_post(&NewPost::from_draft(auth_user_id, draft))
            .await
            .map_err(write_error("creating post"))?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Post created");
        self.metrics.posts_created_total.add(1, &[]);
        Ok(post)
    }

    /// # Errors
    /// `AppError::NoPost` if no post has that slug.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, slug: &str) -> Result<Post> {
        self.posts
            .find_post_by_slug(slug)
            .await
            .map_err(|e| AppError::internal("getting post by slug", e))?
            .ok_or(AppError::NoPost)
    }

    /// Lists posts in id order, either from a cursor or by page number.
    ///
    /// # Errors
    /// `AppError::NoCategory` if the filter names an unknown category.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, mut filter: PostFilter, page: PageRequest) -> Result<PostPage> {
        if let Some(slug) = filter.category.as_deref() {
            let category = self
                .posts
                .find_category_by_slug(slug)
                .await
                .map_err(|e| AppError::internal("getting category by slug", e))?
                .ok_or(AppError::NoCategory)?;
            filter.category = Some(category.slug);
        }

        match page {
            PageRequest::Cursor { from, limit } => {
                // One extra row tells whether another page follows.
                let window = Window { from_id: from, offset: 0, limit: u64::from(limit) + 1 };
                let mut posts = self.fetch(&filter, window).await?;

                let has_more = posts.len() > usize::try_from(limit).unwrap_or(usize::MAX);
                let next_cursor = if has_more { posts.pop().map(|p| p.id) } else { None };
                Ok(PostPage { posts, meta: None, next_cursor })
            }
            PageRequest::Offset { page, limit, known_total } => {
                let total = match known_total {
                    Some(total) if total > 0 => total,
                    _ => self
                        .posts
                        .count_posts(&filter)
                        .await
                        .map_err(|e| AppError::internal("counting posts", e))?,
                };

                let meta = PageMeta::new(page, limit, total);
                let window = Window { from_id: 0, offset: meta.offset, limit: u64::from(meta.limit) };
                let posts = self.fetch(&filter, window).await?;

                Ok(PostPage { posts, meta: Some(meta), next_cursor: None })
            }
        }
    }

    async fn fetch(&self, filter: &PostFilter, window: Window) -> Result<Vec<Post>> {
        self.posts.list_posts(filter, window).await.map_err(|e| AppError::internal("getting posts", e))
    }

    /// Replaces title, excerpt, content and category. The slug follows the new title.
    ///
    /// # Errors
    /// `AppError::NoPost`, `AppError::Forbidden` for a non-author, `AppError::NoCategory`,
    /// `AppError::DuplicateTitle`.
    #[tracing::instrument(skip(self, draft), fields(user_id = auth_user_id))]
    pub async fn update(&self, auth_user_id: i64, slug: &str, draft: PostDraft) -> Result<Post> {
        let post = self.owned_post(auth_user_id, slug).await?;

        if draft.category_id != post.category.id {
            self.require_category(draft.category_id).await?;
        }

        let updated = self
            .posts
            .update_post(post.id, &NewPost::from_draft(auth_user_id, draft))
            .await
            .map_err(write_error("updating post"))?
            .ok_or(AppError::NoPost)?;

        tracing::info!(post_id = updated.id, slug = %updated.slug, "Post updated");
        Ok(updated)
    }

    /// # Errors
    /// `AppError::NoPost`, or `AppError::Forbidden` for a non-author.
    #[tracing::instrument(skip(self), fields(user_id = auth_user_id))]
    pub async fn delete(&self, auth_user_id: i64, slug: &str) -> Result<()> {
        let post = self.owned_post(auth_user_id, slug).await?;

        self.posts.delete_post(post.id).await.map_err(|e| AppError::internal("deleting post", e))?;

        tracing::info!(post_id = post.id, "Post deleted");
        self.metrics.posts_deleted_total.add(1, &[]);
        Ok(())
    }

    /// # Errors
    /// Internal errors only; no categories is an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.posts.list_categories().await.map_err(|e| AppError::internal("getting categories", e))
    }

    async fn owned_post(&self, auth_user_id: i64, slug: &str) -> Result<Post> {
        let post = self.get(slug).await?;
        if post.user_id != auth_user_id {
            tracing::debug!(owner_id = post.user_id, "Post change by non-author rejected");
            return Err(AppError::Forbidden);
        }
        Ok(post)
    }

    async fn require_category(&self, category_id: i64) -> Result<Category> {
        self.posts
            .find_category_by_id(category_id)
            .await
            .map_err(|e| AppError::internal("getting category by id", e))?
            .ok_or(AppError::NoCategory)
    }
}
