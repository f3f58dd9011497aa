use crate::content::ContentNode;
use crate::id::IdGenerator;
use serde::{Deserialize, Serialize};

/// One slide: a named root content node plus its position in the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    #[serde(default = "fresh_slide_id")]
    pub id: String,

    #[serde(default)]
    pub slide_name: String,

    /// Layout type name, e.g. "accentLeft" or "twoColumns"
    #[serde(rename = "type", default)]
    pub kind: String,

    pub content: ContentNode,

    /// 1-based position; `None` until a store assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_order: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

fn fresh_slide_id() -> String {
    IdGenerator::global().slide_id()
}

impl Slide {
    pub fn new(slide_name: impl Into<String>, kind: impl Into<String>, content: ContentNode) -> Self {
        Self {
            id: fresh_slide_id(),
            slide_name: slide_name.into(),
            kind: kind.into(),
            content,
            slide_order: None,
            class_name: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.slide_order = Some(order);
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Give the slide and its whole content tree fresh ids.
    pub fn reassign_ids(&mut self, ids: &IdGenerator) {
        self.id = ids.slide_id();
        self.content.reassign_ids(ids);
    }
}

/// Shallow update of a slide's editable fields. The order is owned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlidePatch {
    pub slide_name: Option<String>,
    pub kind: Option<String>,
    pub content: Option<ContentNode>,
    pub class_name: Option<String>,
}

impl SlidePatch {
    pub fn name(slide_name: impl Into<String>) -> Self {
        Self {
            slide_name: Some(slide_name.into()),
            ..Default::default()
        }
    }

    pub fn content(content: ContentNode) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slide_name.is_none()
            && self.kind.is_none()
            && self.content.is_none()
            && self.class_name.is_none()
    }

    pub(crate) fn apply(self, slide: &mut Slide) {
        if let Some(name) = self.slide_name {
            slide.slide_name = name;
        }
        if let Some(kind) = self.kind {
            slide.kind = kind;
        }
        if let Some(content) = self.content {
            slide.content = content;
        }
        if let Some(class_name) = self.class_name {
            slide.class_name = Some(class_name);
        }
    }
}

/// Rewrite `slide_order` to 1..N following the slice order.
pub fn resequence(slides: &mut [Slide]) {
    for (i, slide) in slides.iter_mut().enumerate() {
        slide.slide_order = Some(i as u32 + 1);
    }
}
