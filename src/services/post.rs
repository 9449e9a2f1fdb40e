//! Post service
//!
//! Posts follow the page rules, with one addition: when the title changes
//! and no slug is supplied, the slug is regenerated from the new title.

use std::sync::Arc;

use super::page::resolve_slug;
use super::validation;
use super::{ServiceError, ServiceResult};
use crate::db::repositories::PostRepository;
use crate::models::{CreatePostInput, Post, UpdatePostInput};

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_FEATURED_IMAGE_LEN: usize = 255;

pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreatePostInput) -> ServiceResult<Post> {
        let title = validation::required("title", &input.title, MAX_TITLE_LEN)?;
        let content = validation::required_unbounded("content", &input.content)?;
        let slug = resolve_slug(input.slug.as_deref(), &title)?;
        self.ensure_slug_free(&slug).await?;

        let mut post = Post::new(title, slug, content);
        post.excerpt = validation::optional("excerpt", input.excerpt, usize::MAX)?;
        post.featured_image =
            validation::optional("featured_image", input.featured_image, MAX_FEATURED_IMAGE_LEN)?;
        if let Some(status) = input.status {
            post.status = status;
        }

        self.repo
            .create(&post)
            .await
            .map_err(|e| ServiceError::from_write(e, || slug_taken(&post.slug)))
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.repo.list().await?)
    }

    pub async fn find_one(&self, id: i64) -> ServiceResult<Post> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", id))
    }

    pub async fn find_by_slug(&self, slug: &str) -> ServiceResult<Post> {
        self.repo
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Post with slug '{}' not found", slug)))
    }

    pub async fn update(&self, id: i64, input: UpdatePostInput) -> ServiceResult<Post> {
        let mut post = self.find_one(id).await?;
        let mut title_changed = false;

        if let Some(title) = input.title {
            let title = validation::required("title", &title, MAX_TITLE_LEN)?;
            title_changed = title != post.title;
            post.title = title;
        }

        let new_slug = match input.slug.as_deref() {
            Some(slug) => Some(resolve_slug(Some(slug), &post.title)?),
            None if title_changed => Some(resolve_slug(None, &post.title)?),
            None => None,
        };
        if let Some(slug) = new_slug {
            if slug != post.slug {
                self.ensure_slug_free(&slug).await?;
                post.slug = slug;
            }
        }

        if let Some(content) = input.content {
            post.content = validation::required_unbounded("content", &content)?;
        }
        if input.excerpt.is_some() {
            post.excerpt = validation::optional("excerpt", input.excerpt, usize::MAX)?;
        }
        if input.featured_image.is_some() {
            post.featured_image =
                validation::optional("featured_image", input.featured_image, MAX_FEATURED_IMAGE_LEN)?;
        }
        if let Some(status) = input.status {
            post.status = status;
        }

        self.repo
            .update(&post)
            .await
            .map_err(|e| ServiceError::from_write(e, || slug_taken(&post.slug)))
    }

    pub async fn remove(&self, id: i64) -> ServiceResult<Post> {
        let post = self.find_one(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Post", id));
        }
        Ok(post)
    }

    async fn ensure_slug_free(&self, slug: &str) -> ServiceResult<()> {
        if self.repo.exists_by_slug(slug).await? {
            return Err(ServiceError::Conflict(slug_taken(slug)));
        }
        Ok(())
    }
}

fn slug_taken(slug: &str) -> String {
    format!("Post with slug '{}' already exists", slug)
}
