use super::outline::OutlineCard;
use crate::id::new_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which creation page the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreatePage {
    #[default]
    Create,
    CreativeAi,
    CreateScratch,
}

/// A prompt the user ran, with the outline it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPrompt {
    pub id: String,
    pub title: String,
    pub outlines: Vec<OutlineCard>,
    pub created_at: DateTime<Utc>,
}

impl SavedPrompt {
    pub fn new(title: impl Into<String>, outlines: Vec<OutlineCard>) -> Self {
        Self {
            id: new_id("prompt"),
            title: title.into(),
            outlines,
            created_at: Utc::now(),
        }
    }
}

/// Recently used prompts, newest first. Serialisable as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptHistory {
    page: CreatePage,
    prompts: Vec<SavedPrompt>,
}

impl PromptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> &[SavedPrompt] {
        &self.prompts
    }

    pub fn add_prompt(&mut self, prompt: SavedPrompt) {
        self.prompts.insert(0, prompt);
    }

    pub fn remove_prompt(&mut self, id: &str) -> bool {
        let before = self.prompts.len();
        self.prompts.retain(|p| p.id != id);
        self.prompts.len() != before
    }

    pub fn page(&self) -> CreatePage {
        self.page
    }

    pub fn set_page(&mut self, page: CreatePage) {
        self.page = page;
    }
}
