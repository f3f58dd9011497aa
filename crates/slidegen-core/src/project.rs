use crate::slide::Slide;
use crate::{Result, SlideGenError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A persisted presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub user_id: String,
    /// Outline card titles in order
    pub outlines: Vec<String>,
    /// `None` until layouts have been generated
    pub slides: Option<Vec<Slide>>,
    pub theme_name: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(user_id: impl Into<String>, title: impl Into<String>, outlines: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            user_id: user_id.into(),
            outlines,
            slides: None,
            theme_name: "Default".to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Whether the user may run layout generation
    pub subscription: bool,
}

/// Resolves the user behind the current request.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user(&self) -> Result<Option<User>>;
}

/// Project persistence. Lookups are always scoped to an owner.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn insert(&self, project: Project) -> Result<Project>;

    async fn find(&self, id: &str, owner_id: &str) -> Result<Option<Project>>;

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Project>>;

    /// Replace a stored project. Fails with `NotFound` when it does not exist.
    async fn update(&self, project: Project) -> Result<Project>;
}

#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    user: RwLock<Option<User>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: User) {
        *self.user.write() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.user.read().clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    projects: RwLock<HashMap<String, Project>>,
}

impl InMemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.projects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.read().is_empty()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: Project) -> Result<Project> {
        let mut projects = self.projects.write();
        if projects.contains_key(&project.id) {
            return Err(SlideGenError::InvalidInput(format!(
                "project {} already exists",
                project.id
            )));
        }
        projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn find(&self, id: &str, owner_id: &str) -> Result<Option<Project>> {
        Ok(self
            .projects
            .read()
            .get(id)
            .filter(|p| p.user_id == owner_id)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Project>> {
        Ok(self
            .projects
            .read()
            .values()
            .filter(|p| p.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, project: Project) -> Result<Project> {
        let mut projects = self.projects.write();
        match projects.get_mut(&project.id) {
            Some(stored) => {
                *stored = project.clone();
                Ok(project)
            }
            None => Err(SlideGenError::NotFound(format!("project {}", project.id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: id.to_string(),
            subscription: true,
        }
    }

    #[tokio::test]
    async fn test_identity_sign_in_out() {
        let identity = InMemoryIdentity::new();
        assert!(identity.current_user().await.unwrap().is_none());
        identity.sign_in(user("ana"));
        assert_eq!(identity.current_user().await.unwrap().unwrap().id, "ana");
        identity.sign_out();
        assert!(identity.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_repository_scopes_by_owner() {
        let repo = InMemoryProjectRepository::new();
        let project = repo
            .insert(Project::new("ana", "Deck", vec!["a".into()]))
            .await
            .unwrap();

        assert!(repo.find(&project.id, "ana").await.unwrap().is_some());
        assert!(repo.find(&project.id, "bo").await.unwrap().is_none());
        assert_eq!(repo.list_by_owner("bo").await.unwrap().len(), 0);
        assert!(repo.insert(project.clone()).await.is_err());
    }

    #[tokio::test]
    async fn test_update_missing_project() {
        let repo = InMemoryProjectRepository::new();
        let err = repo
            .update(Project::new("ana", "Ghost", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, SlideGenError::NotFound(_)));
    }

    #[test]
    fn test_wire_form() {
        let value = serde_json::to_value(Project::new("ana", "Deck", vec![])).unwrap();
        assert_eq!(value["userId"], "ana");
        assert_eq!(value["isDeleted"], false);
        assert_eq!(value["themeName"], "Default");
        assert!(value["slides"].is_null());
    }
}
