use super::{EventBus, StoreEvent};
use crate::content::{ContentBody, ContentNode};
use crate::id::IdGenerator;
use crate::project::Project;
use crate::slide::{resequence, Slide, SlidePatch};
use crate::theme::Theme;
use crate::{Result, SlideGenError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Persistable part of a [`SlideStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideStoreSnapshot {
    pub slides: Vec<Slide>,
    pub project: Option<Project>,
    pub current_theme: Theme,
}

/// Ordered slides of the presentation being edited.
///
/// `slides` is always kept sorted with `slide_order` equal to 1..N, so the
/// stored vector is the ordered view.
#[derive(Debug)]
pub struct SlideStore {
    slides: Vec<Slide>,
    current_slide: usize,
    current_theme: Theme,
    project: Option<Project>,
    ids: Arc<IdGenerator>,
    events: EventBus,
}

impl Default for SlideStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideStore {
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(IdGenerator::new()))
    }

    pub fn with_id_generator(ids: Arc<IdGenerator>) -> Self {
        Self {
            slides: Vec::new(),
            current_slide: 0,
            current_theme: Theme::default(),
            project: None,
            ids,
            events: EventBus::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn revision(&self) -> u64 {
        self.events.revision()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slide(&self, id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    /// Slides ascending by order.
    pub fn get_ordered_slides(&self) -> Vec<Slide> {
        let mut ordered = self.slides.clone();
        ordered.sort_by_key(|s| s.slide_order);
        ordered
    }

    pub fn current_slide_index(&self) -> usize {
        self.current_slide
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current_slide)
    }

    pub fn current_theme(&self) -> &Theme {
        &self.current_theme
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Replace the collection. Given orders are honoured only when every slide has one.
    pub fn set_slides(&mut self, mut slides: Vec<Slide>) {
        debug!(count = slides.len(), "Setting slides");
        if slides.iter().all(|s| s.slide_order.is_some()) {
            slides.sort_by_key(|s| s.slide_order);
        }
        resequence(&mut slides);
        self.slides = slides;
        self.clamp_current();
        self.events.publish("set_slides");
    }

    /// Replace the collection from untyped JSON. Anything but an array of
    /// slides is rejected and the store is left as it was.
    pub fn set_slides_json(&mut self, value: Value) -> Result<()> {
        if !value.is_array() {
            warn!("Rejected slides payload: expected an array");
            return Err(SlideGenError::InvalidInput(
                "slides payload must be an array".to_string(),
            ));
        }
        let slides: Vec<Slide> = serde_json::from_value(value).map_err(|e| {
            warn!("Rejected slides payload: {}", e);
            SlideGenError::from(e)
        })?;
        self.set_slides(slides);
        Ok(())
    }

    /// Append a slide. Its order defaults to one past the current maximum.
    pub fn add_slide(&mut self, mut slide: Slide) {
        let next = self
            .slides
            .iter()
            .filter_map(|s| s.slide_order)
            .max()
            .unwrap_or(0)
            + 1;
        slide.slide_order.get_or_insert(next);
        debug!(slide_id = %slide.id, "Adding slide");

        self.slides.push(slide);
        self.slides.sort_by_key(|s| s.slide_order);
        resequence(&mut self.slides);
        self.events.publish("add_slide");
    }

    /// Insert a copy of `slide` at `index` of the ordered view and select it.
    ///
    /// The inserted slide and its whole content tree get fresh ids, so a
    /// layout template can be inserted any number of times. Returns the new
    /// slide id, or `None` when `index` is past the end.
    pub fn add_slide_at_index(&mut self, mut slide: Slide, index: usize) -> Option<String> {
        if index > self.slides.len() {
            warn!(index, len = self.slides.len(), "Slide insert index out of range");
            return None;
        }

        slide.reassign_ids(&self.ids);
        let id = slide.id.clone();
        debug!(slide_id = %id, index, "Inserting slide");

        self.slides.insert(index, slide);
        resequence(&mut self.slides);
        self.current_slide = index;
        self.events.publish("add_slide_at_index");
        Some(id)
    }

    pub fn remove_slide(&mut self, id: &str) -> bool {
        let Some(pos) = self.slides.iter().position(|s| s.id == id) else {
            return false;
        };
        debug!(slide_id = %id, "Removing slide");

        self.slides.remove(pos);
        resequence(&mut self.slides);
        self.clamp_current();
        self.events.publish("remove_slide");
        true
    }

    /// Move the slide at `from` to `to` in the ordered view.
    pub fn reorder_slides(&mut self, from: usize, to: usize) -> bool {
        let len = self.slides.len();
        if from >= len || to >= len {
            warn!(from, to, len, "Invalid reorder indices");
            return false;
        }

        let slide = self.slides.remove(from);
        self.slides.insert(to, slide);
        resequence(&mut self.slides);
        self.events.publish("reorder_slides");
        true
    }

    pub fn update_slide(&mut self, id: &str, patch: SlidePatch) -> bool {
        let Some(slide) = self.slides.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        patch.apply(slide);
        self.events.publish("update_slide");
        true
    }

    /// Replace the payload of a content node anywhere in a slide's tree.
    ///
    /// `Ok(false)` when the slide or node is absent. A payload of the wrong
    /// shape for the node's kind is an error and changes nothing.
    pub fn update_content_item(
        &mut self,
        slide_id: &str,
        content_id: &str,
        body: ContentBody,
    ) -> Result<bool> {
        let Some(slide) = self.slides.iter_mut().find(|s| s.id == slide_id) else {
            return Ok(false);
        };

        let updated = slide.content.replace_content(content_id, body).inspect_err(|e| {
            warn!(slide_id, content_id, "Rejected content update: {}", e);
        })?;
        if updated {
            self.events.publish("update_content_item");
        }
        Ok(updated)
    }

    /// Insert `node` into the container `parent_id` at `index`, searching the
    /// whole tree of the slide. Returns whether the insert happened.
    pub fn add_component_in_slide(
        &mut self,
        slide_id: &str,
        node: ContentNode,
        parent_id: &str,
        index: usize,
    ) -> bool {
        let Some(slide) = self.slides.iter_mut().find(|s| s.id == slide_id) else {
            return false;
        };

        let inserted = slide.content.insert_child(parent_id, node, index);
        if inserted {
            self.events.publish("add_component_in_slide");
        } else {
            debug!(slide_id, parent_id, "No container to insert into");
        }
        inserted
    }

    pub fn remove_content_item(&mut self, slide_id: &str, content_id: &str) -> Option<ContentNode> {
        let removed = self
            .slides
            .iter_mut()
            .find(|s| s.id == slide_id)?
            .content
            .remove_descendant(content_id)?;
        self.events.publish("remove_content_item");
        Some(removed)
    }

    pub fn clear_slides(&mut self) {
        self.slides.clear();
        self.current_slide = 0;
        self.events.publish("clear_slides");
    }

    pub fn set_current_slide(&mut self, index: usize) {
        self.current_slide = index;
        self.clamp_current();
        self.events.publish("set_current_slide");
    }

    pub fn set_current_theme(&mut self, theme: Theme) {
        self.current_theme = theme;
        self.events.publish("set_current_theme");
    }

    pub fn set_project(&mut self, project: Option<Project>) {
        debug!(project_id = ?project.as_ref().map(|p| &p.id), "Setting project");
        self.project = project;
        self.events.publish("set_project");
    }

    pub fn snapshot(&self) -> SlideStoreSnapshot {
        SlideStoreSnapshot {
            slides: self.slides.clone(),
            project: self.project.clone(),
            current_theme: self.current_theme.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: SlideStoreSnapshot) {
        let SlideStoreSnapshot {
            mut slides,
            project,
            current_theme,
        } = snapshot;

        slides.sort_by_key(|s| s.slide_order);
        resequence(&mut slides);
        self.slides = slides;
        self.project = project;
        self.current_theme = current_theme;
        self.clamp_current();
        self.events.publish("restore");
    }

    fn clamp_current(&mut self) {
        self.current_slide = self.current_slide.min(self.slides.len().saturating_sub(1));
    }
}
