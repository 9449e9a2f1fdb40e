//! Page service

use std::sync::Arc;

use super::slug::{generate_slug, truncate_slug};
use super::validation;
use super::{ServiceError, ServiceResult};
use crate::db::repositories::PageRepository;
use crate::models::{CreatePageInput, Page, UpdatePageInput};

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_SLUG_LEN: usize = 255;

pub struct PageService {
    repo: Arc<dyn PageRepository>,
}

impl PageService {
    pub fn new(repo: Arc<dyn PageRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreatePageInput) -> ServiceResult<Page> {
        let title = validation::required("title", &input.title, MAX_TITLE_LEN)?;
        let slug = resolve_slug(input.slug.as_deref(), &title)?;

        if self.repo.exists_by_slug(&slug).await? {
            return Err(ServiceError::Conflict(slug_taken(&slug)));
        }

        let content = validation::optional("content", input.content, usize::MAX)?;
        let mut page = Page::new(title, slug, content);
        if let Some(status) = input.status {
            page.status = status;
        }

        self.repo
            .create(&page)
            .await
            .map_err(|e| ServiceError::from_write(e, || slug_taken(&page.slug)))
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Page>> {
        Ok(self.repo.list().await?)
    }

    pub async fn find_one(&self, id: i64) -> ServiceResult<Page> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Page", id))
    }

    pub async fn find_by_slug(&self, slug: &str) -> ServiceResult<Page> {
        self.repo
            .get_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Page with slug '{}' not found", slug)))
    }

    pub async fn update(&self, id: i64, input: UpdatePageInput) -> ServiceResult<Page> {
        let mut page = self.find_one(id).await?;

        if let Some(title) = input.title {
            page.title = validation::required("title", &title, MAX_TITLE_LEN)?;
        }

        if let Some(slug) = input.slug {
            let slug = resolve_slug(Some(&slug), &page.title)?;
            if slug != page.slug && self.repo.exists_by_slug(&slug).await? {
                return Err(ServiceError::Conflict(slug_taken(&slug)));
            }
            page.slug = slug;
        }

        if input.content.is_some() {
            page.content = validation::optional("content", input.content, usize::MAX)?;
        }

        if let Some(status) = input.status {
            page.status = status;
        }

        self.repo
            .update(&page)
            .await
            .map_err(|e| ServiceError::from_write(e, || slug_taken(&page.slug)))
    }

    pub async fn remove(&self, id: i64) -> ServiceResult<Page> {
        let page = self.find_one(id).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Page", id));
        }
        Ok(page)
    }
}

fn slug_taken(slug: &str) -> String {
    format!("Page with slug '{}' already exists", slug)
}

/// Use the given slug, normalized, or derive one from the title.
///
/// A given slug that is too long is rejected; a derived one is cut to fit.
pub(crate) fn resolve_slug(slug: Option<&str>, title: &str) -> ServiceResult<String> {
    let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(given) => {
            let slug = generate_slug(given);
            validation::max_len("slug", &slug, MAX_SLUG_LEN)?;
            slug
        }
        None => truncate_slug(generate_slug(title), MAX_SLUG_LEN),
    };
    if slug.is_empty() {
        return Err(ServiceError::validation("slug cannot be empty"));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxPageRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::models::PublishStatus;

    async fn setup_service() -> PageService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        PageService::new(SqlxPageRepository::boxed(pool))
    }

    fn input(title: &str) -> CreatePageInput {
        CreatePageInput {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_generates_slug() {
        let service = setup_service().await;
        let page = service.create(input("About Us")).await.unwrap();

        assert_eq!(page.slug, "about-us");
        assert_eq!(page.status, PublishStatus::Draft);
        assert_eq!(service.find_by_slug("about-us").await.unwrap().id, page.id);
    }

    #[tokio::test]
    async fn test_create_normalizes_explicit_slug() {
        let service = setup_service().await;
        let page = service
            .create(CreatePageInput {
                title: "Privacy".to_string(),
                slug: Some("Privacy Policy".to_string()),
                status: Some(PublishStatus::Published),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.slug, "privacy-policy");
        assert_eq!(page.status, PublishStatus::Published);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let service = setup_service().await;
        service.create(input("About")).await.unwrap();

        let result = service.create(input("About")).await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_blank_title_is_validation_error() {
        let service = setup_service().await;
        assert!(matches!(service.create(input(" ")).await, Err(ServiceError::Validation(_))));
        assert!(matches!(service.create(input("???")).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creates_same_slug() {
        let service = setup_service().await;

        let (a, b) = tokio::join!(service.create(input("Same")), service.create(input("Same")));

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(ServiceError::Conflict(_)))));
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_long_unicode_title_gets_truncated_slug() {
        let service = setup_service().await;
        // Each 'İ' lowercases to two characters.
        let page = service.create(input(&"İ".repeat(200))).await.unwrap();

        assert!(page.slug.chars().count() <= MAX_SLUG_LEN);
        assert!(!page.slug.ends_with('-'));
    }

    #[tokio::test]
    async fn test_long_explicit_slug_rejected() {
        let service = setup_service().await;
        let result = service
            .create(CreatePageInput {
                title: "Short".to_string(),
                slug: Some("a".repeat(MAX_SLUG_LEN + 1)),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_blank_content_stored_as_none() {
        let service = setup_service().await;
        let page = service
            .create(CreatePageInput {
                title: "Blank".to_string(),
                content: Some("   ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.content, None);

        let updated = service
            .update(
                page.id,
                UpdatePageInput {
                    content: Some("  Text  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content.as_deref(), Some("Text"));
    }

    #[tokio::test]
    async fn test_update_keeps_slug_when_title_changes() {
        let service = setup_service().await;
        let page = service.create(input("About")).await.unwrap();

        let updated = service
            .update(
                page.id,
                UpdatePageInput {
                    title: Some("About the team".to_string()),
                    content: Some("We are...".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "about");
        assert_eq!(updated.title, "About the team");
        assert_eq!(updated.content.as_deref(), Some("We are..."));
    }

    #[tokio::test]
    async fn test_update_slug_conflict() {
        let service = setup_service().await;
        service.create(input("One")).await.unwrap();
        let two = service.create(input("Two")).await.unwrap();

        let result = service
            .update(
                two.id,
                UpdatePageInput {
                    slug: Some("one".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_remove_then_not_found() {
        let service = setup_service().await;
        let page = service.create(input("Temp")).await.unwrap();

        assert_eq!(service.remove(page.id).await.unwrap().id, page.id);
        assert!(matches!(service.find_one(page.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.find_by_slug("temp").await, Err(ServiceError::NotFound(_))));
    }
}
