use crate::id::IdGenerator;
use crate::{Result, SlideGenError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// The kind of a content node, as carried in the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentKind {
    Column,
    ResizableColumn,
    MultiColumn,
    ImageAndText,
    Text,
    Paragraph,
    Image,
    Table,
    Blank,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Title,
    Blockquote,
    Quote,
    NumberedList,
    BulletedList,
    TodoList,
    TableOfContents,
    Code,
    CodeBlock,
    Link,
    Divider,
    CalloutBox,
    CustomButton,
    Other(String),
}

/// Payload shape a kind requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentShape {
    Container,
    Text,
    List,
    Table,
}

impl fmt::Display for ContentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContentShape::Container => "child nodes",
            ContentShape::Text => "text",
            ContentShape::List => "a list of strings",
            ContentShape::Table => "rows of cells",
        };
        write!(f, "{}", s)
    }
}

impl ContentKind {
    pub fn as_str(&self) -> &str {
        match self {
            ContentKind::Column => "column",
            ContentKind::ResizableColumn => "resizable-column",
            ContentKind::MultiColumn => "multiColumn",
            ContentKind::ImageAndText => "imageAndText",
            ContentKind::Text => "text",
            ContentKind::Paragraph => "paragraph",
            ContentKind::Image => "image",
            ContentKind::Table => "table",
            ContentKind::Blank => "blank",
            ContentKind::Heading1 => "heading1",
            ContentKind::Heading2 => "heading2",
            ContentKind::Heading3 => "heading3",
            ContentKind::Heading4 => "heading4",
            ContentKind::Title => "title",
            ContentKind::Blockquote => "blockquote",
            ContentKind::Quote => "quote",
            ContentKind::NumberedList => "numberedList",
            ContentKind::BulletedList => "bulletedList",
            ContentKind::TodoList => "todoList",
            ContentKind::TableOfContents => "tableOfContents",
            ContentKind::Code => "code",
            ContentKind::CodeBlock => "codeBlock",
            ContentKind::Link => "link",
            ContentKind::Divider => "divider",
            ContentKind::CalloutBox => "calloutBox",
            ContentKind::CustomButton => "customButton",
            ContentKind::Other(s) => s.as_str(),
        }
    }

    /// Required payload shape, or `None` for kinds this crate does not know.
    pub fn shape(&self) -> Option<ContentShape> {
        match self {
            ContentKind::Column
            | ContentKind::ResizableColumn
            | ContentKind::MultiColumn
            | ContentKind::ImageAndText => Some(ContentShape::Container),
            ContentKind::BulletedList
            | ContentKind::NumberedList
            | ContentKind::TodoList
            | ContentKind::TableOfContents => Some(ContentShape::List),
            ContentKind::Table => Some(ContentShape::Table),
            ContentKind::Other(_) => None,
            _ => Some(ContentShape::Text),
        }
    }

    pub fn is_container(&self) -> bool {
        self.shape() == Some(ContentShape::Container)
    }

    pub fn accepts(&self, body: &ContentBody) -> bool {
        match self.shape() {
            Some(shape) => shape == body.shape(),
            None => true,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "column" => ContentKind::Column,
            "resizable-column" => ContentKind::ResizableColumn,
            "multiColumn" => ContentKind::MultiColumn,
            "imageAndText" => ContentKind::ImageAndText,
            "text" => ContentKind::Text,
            "paragraph" => ContentKind::Paragraph,
            "image" => ContentKind::Image,
            "table" => ContentKind::Table,
            "blank" => ContentKind::Blank,
            "heading1" => ContentKind::Heading1,
            "heading2" => ContentKind::Heading2,
            "heading3" => ContentKind::Heading3,
            "heading4" => ContentKind::Heading4,
            "title" => ContentKind::Title,
            "blockquote" => ContentKind::Blockquote,
            "quote" => ContentKind::Quote,
            "numberedList" => ContentKind::NumberedList,
            "bulletedList" => ContentKind::BulletedList,
            "todoList" => ContentKind::TodoList,
            "tableOfContents" => ContentKind::TableOfContents,
            "code" => ContentKind::Code,
            "codeBlock" => ContentKind::CodeBlock,
            "link" => ContentKind::Link,
            "divider" => ContentKind::Divider,
            "calloutBox" => ContentKind::CalloutBox,
            "customButton" => ContentKind::CustomButton,
            other => ContentKind::Other(other.to_string()),
        })
    }
}

impl From<String> for ContentKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<ContentKind> for String {
    fn from(kind: ContentKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Payload of a content node. Which variant is valid is decided by the kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentBody {
    Children(Vec<ContentNode>),
    Text(String),
    List(Vec<String>),
    Table(Vec<Vec<String>>),
}

impl ContentBody {
    pub fn text(s: impl Into<String>) -> Self {
        ContentBody::Text(s.into())
    }

    pub fn shape(&self) -> ContentShape {
        match self {
            ContentBody::Children(_) => ContentShape::Container,
            ContentBody::Text(_) => ContentShape::Text,
            ContentBody::List(_) => ContentShape::List,
            ContentBody::Table(_) => ContentShape::Table,
        }
    }

    /// Empty payload of the given shape.
    pub fn empty(shape: ContentShape) -> Self {
        match shape {
            ContentShape::Container => ContentBody::Children(Vec::new()),
            ContentShape::Text => ContentBody::Text(String::new()),
            ContentShape::List => ContentBody::List(Vec::new()),
            ContentShape::Table => ContentBody::Table(Vec::new()),
        }
    }

    /// Decode an untyped JSON payload without failing.
    ///
    /// A payload that fits the kind's shape is kept. Null or a blank string
    /// becomes the empty payload of that shape. Any other mismatch keeps the
    /// payload under its inferred shape and demotes the kind to `Other`, so
    /// the kind always accepts the body. Child nodes that cannot be decoded
    /// are dropped.
    pub fn coerce(kind: ContentKind, value: Value) -> (ContentKind, Self) {
        let shape = kind.shape().unwrap_or_else(|| infer_shape(&value));
        if fits(shape, &value) {
            return (kind, Self::decode_fitting(shape, value));
        }
        if is_blank(&value) {
            return (kind, Self::empty(shape));
        }

        let inferred = infer_shape(&value);
        if fits(inferred, &value) {
            warn!(
                kind = %kind,
                expected = %shape,
                found = %inferred,
                "Content does not fit its kind, keeping it as an unknown kind"
            );
            let demoted = ContentKind::Other(kind.as_str().to_string());
            return (demoted, Self::decode_fitting(inferred, value));
        }

        warn!(kind = %kind, "Unusable content payload replaced with an empty one");
        (kind, Self::empty(shape))
    }

    fn decode_fitting(shape: ContentShape, value: Value) -> Self {
        match (shape, value) {
            (ContentShape::Container, Value::Array(items)) => ContentBody::Children(
                items
                    .into_iter()
                    .filter_map(|item| match serde_json::from_value::<ContentNode>(item) {
                        Ok(node) => Some(node),
                        Err(e) => {
                            warn!("Dropping undecodable child node: {}", e);
                            None
                        }
                    })
                    .collect(),
            ),
            (ContentShape::Text, value) => ContentBody::Text(scalar_text(&value).unwrap_or_default()),
            (ContentShape::List, Value::Array(items)) => {
                ContentBody::List(items.iter().filter_map(scalar_text).collect())
            }
            (ContentShape::Table, Value::Array(rows)) => ContentBody::Table(
                rows.iter()
                    .filter_map(Value::as_array)
                    .map(|cells| cells.iter().filter_map(scalar_text).collect())
                    .collect(),
            ),
            (shape, _) => Self::empty(shape),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn fits(shape: ContentShape, value: &Value) -> bool {
    let is_scalar = |v: &Value| scalar_text(v).is_some();
    match (shape, value) {
        (ContentShape::Container, Value::Array(items)) => items.iter().all(Value::is_object),
        (ContentShape::Text, value) => is_scalar(value),
        (ContentShape::List, Value::Array(items)) => items.iter().all(is_scalar),
        (ContentShape::Table, Value::Array(rows)) => rows
            .iter()
            .all(|row| matches!(row, Value::Array(cells) if cells.iter().all(is_scalar))),
        _ => false,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn infer_shape(value: &Value) -> ContentShape {
    match value {
        Value::Array(items) => match items.first() {
            Some(Value::Array(_)) => ContentShape::Table,
            Some(Value::Object(_)) | None => ContentShape::Container,
            Some(_) => ContentShape::List,
        },
        _ => ContentShape::Text,
    }
}

/// Type-specific, presentation-only fields of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_to_drop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_out_type: Option<CalloutType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_transparent: Option<bool>,
    /// Fields this crate does not model, kept so they survive a round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutType {
    Success,
    Warning,
    Info,
    Question,
    Caution,
}

/// A node of a slide's content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawContentNode", into = "RawContentNode")]
pub struct ContentNode {
    pub id: String,
    pub kind: ContentKind,
    pub name: String,
    pub content: ContentBody,
    pub attrs: ContentAttrs,
}

#[derive(Serialize, Deserialize)]
struct RawContentNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: ContentKind,
    #[serde(default)]
    name: String,
    #[serde(default)]
    content: Value,
    #[serde(flatten)]
    attrs: ContentAttrs,
}

impl From<RawContentNode> for ContentNode {
    fn from(raw: RawContentNode) -> Self {
        let (kind, content) = ContentBody::coerce(raw.kind, raw.content);
        let id = raw
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| IdGenerator::global().content_id());

        Self {
            id,
            kind,
            name: raw.name,
            content,
            attrs: raw.attrs,
        }
    }
}

impl From<ContentNode> for RawContentNode {
    fn from(node: ContentNode) -> Self {
        Self {
            id: Some(node.id),
            kind: node.kind,
            name: node.name,
            content: serde_json::to_value(node.content).unwrap_or(Value::Null),
            attrs: node.attrs,
        }
    }
}

impl ContentNode {
    /// Create a node with a freshly allocated id and an empty payload.
    pub fn new(kind: ContentKind, name: impl Into<String>) -> Self {
        let shape = kind.shape().unwrap_or(ContentShape::Text);
        Self {
            id: IdGenerator::global().content_id(),
            kind,
            name: name.into(),
            content: ContentBody::empty(shape),
            attrs: ContentAttrs::default(),
        }
    }

    pub fn column(children: Vec<ContentNode>) -> Self {
        Self::new(ContentKind::Column, "Column").with_children(children)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        self.content = ContentBody::Children(children);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = ContentBody::Text(text.into());
        self
    }

    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.content = ContentBody::List(items);
        self
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.content = ContentBody::Table(rows);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.attrs.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.attrs.alt = Some(alt.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.attrs.class_name = Some(class_name.into());
        self
    }

    pub fn restrict_to_drop(mut self) -> Self {
        self.attrs.restrict_to_drop = Some(true);
        self
    }

    pub fn children(&self) -> Option<&[ContentNode]> {
        match &self.content {
            ContentBody::Children(children) => Some(children),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            ContentBody::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Depth-first search. Only container payloads are descended into.
    pub fn find(&self, id: &str) -> Option<&ContentNode> {
        if self.id == id {
            return Some(self);
        }
        self.children()?.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ContentNode> {
        if self.id == id {
            return Some(self);
        }
        match &mut self.content {
            ContentBody::Children(children) => {
                children.iter_mut().find_map(|child| child.find_mut(id))
            }
            _ => None,
        }
    }

    /// Replace the payload of the node with `id`.
    ///
    /// Returns `Ok(false)` when no such node exists. A payload whose shape the
    /// node's kind does not accept is rejected and the tree is left untouched.
    pub fn replace_content(&mut self, id: &str, body: ContentBody) -> Result<bool> {
        let Some(node) = self.find_mut(id) else {
            return Ok(false);
        };

        if !node.kind.accepts(&body) {
            return Err(SlideGenError::ShapeMismatch {
                kind: node.kind.to_string(),
                expected: node
                    .kind
                    .shape()
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                actual: body.shape().to_string(),
            });
        }

        node.content = body;
        Ok(true)
    }

    /// Insert `child` into the container with `parent_id` at `index`
    /// (clamped to the child count). Returns whether an insert happened.
    pub fn insert_child(&mut self, parent_id: &str, child: ContentNode, index: usize) -> bool {
        match self.find_mut(parent_id) {
            Some(ContentNode {
                content: ContentBody::Children(children),
                ..
            }) => {
                let at = index.min(children.len());
                children.insert(at, child);
                true
            }
            _ => false,
        }
    }

    /// Detach and return the descendant with `id`. The root itself cannot be removed.
    pub fn remove_descendant(&mut self, id: &str) -> Option<ContentNode> {
        let ContentBody::Children(children) = &mut self.content else {
            return None;
        };

        if let Some(pos) = children.iter().position(|c| c.id == id) {
            return Some(children.remove(pos));
        }
        children.iter_mut().find_map(|child| child.remove_descendant(id))
    }

    /// All nodes of `kind` in depth-first pre-order.
    pub fn collect_kind(&self, kind: &ContentKind) -> Vec<&ContentNode> {
        let mut out = Vec::new();
        self.collect_kind_into(kind, &mut out);
        out
    }

    fn collect_kind_into<'a>(&'a self, kind: &ContentKind, out: &mut Vec<&'a ContentNode>) {
        if &self.kind == kind {
            out.push(self);
        }
        if let Some(children) = self.children() {
            for child in children {
                child.collect_kind_into(kind, out);
            }
        }
    }

    /// Give this node and every descendant a new id.
    pub fn reassign_ids(&mut self, ids: &IdGenerator) {
        self.id = ids.content_id();
        if let ContentBody::Children(children) = &mut self.content {
            for child in children {
                child.reassign_ids(ids);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|children| children.iter().map(ContentNode::node_count).sum())
            .unwrap_or(0)
    }
}
