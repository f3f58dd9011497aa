use crate::pipeline::GenerationPipeline;
use serde::Serialize;
use slidegen_core::{
    resequence, IdentityProvider, OutlineCard, Project, ProjectRepository, Result, Slide,
    SlideGenError, User,
};
use tracing::{info, instrument, warn};

pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineCardsOutcome {
    pub cards: Vec<OutlineCard>,
    pub model_used: String,
}

/// Project-level operations. Each one resolves the current user first and
/// fails with `Forbidden` when nobody is signed in.
pub struct ProjectActions<I, R> {
    identity: I,
    repository: R,
    pipeline: GenerationPipeline,
}

impl<I, R> ProjectActions<I, R>
where
    I: IdentityProvider,
    R: ProjectRepository,
{
    pub fn new(identity: I, repository: R, pipeline: GenerationPipeline) -> Self {
        Self {
            identity,
            repository,
            pipeline,
        }
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    async fn authenticate(&self) -> Result<User> {
        self.identity
            .current_user()
            .await?
            .ok_or_else(|| SlideGenError::Forbidden("user not authenticated".to_string()))
    }

    async fn owned_project(&self, user: &User, id: &str) -> Result<Project> {
        if id.trim().is_empty() {
            return Err(SlideGenError::InvalidInput("project id is required".to_string()));
        }
        self.repository
            .find(id, &user.id)
            .await?
            .ok_or_else(|| SlideGenError::NotFound(format!("project {}", id)))
    }

    async fn save(&self, mut project: Project) -> Result<Project> {
        project.touch();
        self.repository.update(project).await
    }

    /// Create a project from outline cards; only their titles are stored.
    pub async fn create_project(&self, title: &str, cards: &[OutlineCard]) -> Result<Project> {
        let user = self.authenticate().await?;
        if title.trim().is_empty() || cards.is_empty() {
            return Err(SlideGenError::InvalidInput(
                "title and at least one outline card are required".to_string(),
            ));
        }

        let mut ordered: Vec<&OutlineCard> = cards.iter().collect();
        ordered.sort_by_key(|c| c.order);
        let outlines = ordered.into_iter().map(|c| c.title.clone()).collect();

        let project = self
            .repository
            .insert(Project::new(&user.id, title, outlines))
            .await?;
        info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn get_project(&self, id: &str) -> Result<Project> {
        let user = self.authenticate().await?;
        self.owned_project(&user, id).await
    }

    /// Non-deleted projects of the current user, most recently updated first.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let user = self.authenticate().await?;
        let mut projects: Vec<Project> = self
            .repository
            .list_by_owner(&user.id)
            .await?
            .into_iter()
            .filter(|p| !p.is_deleted)
            .collect();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    /// The `limit` most recently updated projects. Fails with `NotFound` when there are none.
    pub async fn recent_projects(&self, limit: usize) -> Result<Vec<Project>> {
        let mut projects = self.list_projects().await?;
        if projects.is_empty() {
            return Err(SlideGenError::NotFound("no recent projects".to_string()));
        }
        projects.truncate(limit);
        Ok(projects)
    }

    pub async fn deleted_projects(&self) -> Result<Vec<Project>> {
        let user = self.authenticate().await?;
        let mut projects: Vec<Project> = self
            .repository
            .list_by_owner(&user.id)
            .await?
            .into_iter()
            .filter(|p| p.is_deleted)
            .collect();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    pub async fn delete_project(&self, id: &str) -> Result<Project> {
        self.set_deleted(id, true).await
    }

    pub async fn recover_project(&self, id: &str) -> Result<Project> {
        self.set_deleted(id, false).await
    }

    async fn set_deleted(&self, id: &str, deleted: bool) -> Result<Project> {
        let user = self.authenticate().await?;
        let mut project = self.owned_project(&user, id).await?;
        project.is_deleted = deleted;
        self.save(project).await
    }

    /// Persist editor changes to a project's slides.
    pub async fn update_slides(&self, id: &str, mut slides: Vec<Slide>) -> Result<Project> {
        let user = self.authenticate().await?;
        let mut project = self.owned_project(&user, id).await?;
        resequence(&mut slides);
        project.slides = Some(slides);
        self.save(project).await
    }

    pub async fn update_theme(&self, id: &str, theme_name: &str) -> Result<Project> {
        let user = self.authenticate().await?;
        if theme_name.trim().is_empty() {
            return Err(SlideGenError::InvalidInput("theme name is required".to_string()));
        }
        let mut project = self.owned_project(&user, id).await?;
        project.theme_name = theme_name.to_string();
        self.save(project).await
    }

    /// Generate slides for a stored project's outline and persist them with the theme.
    #[instrument(skip(self))]
    pub async fn generate_layouts_for_project(&self, id: &str, theme: &str) -> Result<Project> {
        let user = self.authenticate().await?;
        if !user.subscription {
            warn!(user_id = %user.id, "Layout generation requires a subscription");
            return Err(SlideGenError::Forbidden(
                "an active subscription is required".to_string(),
            ));
        }

        let mut project = self.owned_project(&user, id).await?;
        if project.is_deleted {
            return Err(SlideGenError::NotFound(format!("project {}", id)));
        }
        if project.outlines.is_empty() {
            return Err(SlideGenError::InvalidInput(
                "project has no outline to generate from".to_string(),
            ));
        }

        let layouts = self.pipeline.generate_slide_layouts(&project.outlines).await?;
        project.slides = Some(layouts.slides);
        project.theme_name = theme.to_string();

        let project = self.save(project).await?;
        info!(project_id = %project.id, model = %layouts.model_used, "Layouts saved");
        Ok(project)
    }

    /// Generate an outline and turn it into cards ordered 1..N.
    pub async fn generate_outline_cards(&self, prompt: &str) -> Result<OutlineCardsOutcome> {
        self.authenticate().await?;
        let outcome = self.pipeline.generate_outline(prompt).await?;
        Ok(OutlineCardsOutcome {
            cards: OutlineCard::from_titles(outcome.outline),
            model_used: outcome.model_used,
        })
    }
}
