use super::{EventBus, StoreEvent};
use crate::id::IdGenerator;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

pub const DEFAULT_CARD_TITLE: &str = "New Card";

/// One outline point, later turned into one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineCard {
    pub id: String,
    pub title: String,
    pub order: u32,
}

impl OutlineCard {
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        Self {
            id: IdGenerator::global().card_id(),
            title: title.into(),
            order,
        }
    }

    /// Cards for `titles`, ordered 1..N.
    pub fn from_titles<I, S>(titles: I) -> Vec<OutlineCard>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| OutlineCard::new(title, i as u32 + 1))
            .collect()
    }
}

/// Which creation flow an outline store serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutlineScope {
    CreativeAi,
    Scratch,
}

impl OutlineScope {
    /// Only the AI flow keeps the prompt that produced the outline.
    pub fn keeps_prompt(self) -> bool {
        matches!(self, OutlineScope::CreativeAi)
    }
}

/// Insertion slot between cards during a drag. Slot `i` sits before card `i`;
/// slot `len` is after the last card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSlot(pub usize);

impl DropSlot {
    /// Slot for a cursor hovering over row `index`: the upper half targets the
    /// slot above the row, the lower half the slot below it.
    pub fn from_cursor(index: usize, cursor_offset_y: f32, row_height: f32) -> Self {
        if cursor_offset_y < row_height / 2.0 {
            DropSlot(index)
        } else {
            DropSlot(index + 1)
        }
    }
}

/// Ordered outline cards plus the draft prompt for one creation flow.
#[derive(Debug)]
pub struct OutlineStore {
    scope: OutlineScope,
    outlines: Vec<OutlineCard>,
    draft_prompt: String,
    events: EventBus,
}

impl OutlineStore {
    pub fn new(scope: OutlineScope) -> Self {
        Self {
            scope,
            outlines: Vec::new(),
            draft_prompt: String::new(),
            events: EventBus::new(),
        }
    }

    pub fn scope(&self) -> OutlineScope {
        self.scope
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn outlines(&self) -> &[OutlineCard] {
        &self.outlines
    }

    pub fn draft_prompt(&self) -> &str {
        &self.draft_prompt
    }

    pub fn ordered_titles(&self) -> Vec<String> {
        self.outlines.iter().map(|c| c.title.clone()).collect()
    }

    pub fn add_outline(&mut self, card: OutlineCard) {
        self.outlines.push(card);
        self.resequence();
        self.events.publish("add_outline");
    }

    pub fn add_multiple_outlines(&mut self, cards: Vec<OutlineCard>) {
        debug!(count = cards.len(), scope = ?self.scope, "Appending outline cards");
        self.outlines.extend(cards);
        self.resequence();
        self.events.publish("add_multiple_outlines");
    }

    pub fn replace_outlines(&mut self, cards: Vec<OutlineCard>) {
        self.outlines = cards;
        self.resequence();
        self.events.publish("replace_outlines");
    }

    pub fn reset_outlines(&mut self) {
        self.outlines.clear();
        self.draft_prompt.clear();
        self.events.publish("reset_outlines");
    }

    /// Returns `false` for scopes that do not keep a prompt.
    pub fn set_draft_prompt(&mut self, prompt: impl Into<String>) -> bool {
        if !self.scope.keeps_prompt() {
            warn!(scope = ?self.scope, "Draft prompt ignored for this outline scope");
            return false;
        }
        self.draft_prompt = prompt.into();
        self.events.publish("set_draft_prompt");
        true
    }

    /// Insert a new card after position `index` (append when `None` or past
    /// the end). An empty title becomes "New Card". Returns the new card id.
    pub fn insert_card_after(&mut self, index: Option<usize>, title: &str) -> String {
        let title = if title.trim().is_empty() {
            DEFAULT_CARD_TITLE
        } else {
            title
        };
        let card = OutlineCard::new(title, 0);
        let id = card.id.clone();

        let at = match index {
            Some(i) if i < self.outlines.len() => i + 1,
            _ => self.outlines.len(),
        };
        self.outlines.insert(at, card);
        self.resequence();
        self.events.publish("insert_card_after");
        id
    }

    pub fn update_card_title(&mut self, id: &str, title: impl Into<String>) -> bool {
        let Some(card) = self.outlines.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        card.title = title.into();
        self.events.publish("update_card_title");
        true
    }

    pub fn delete_card(&mut self, id: &str) -> bool {
        let before = self.outlines.len();
        self.outlines.retain(|c| c.id != id);
        if self.outlines.len() == before {
            return false;
        }
        self.resequence();
        self.events.publish("delete_card");
        true
    }

    pub fn move_card(&mut self, from: usize, to: usize) -> bool {
        let len = self.outlines.len();
        if from >= len || to >= len {
            warn!(from, to, len, "Invalid card move indices");
            return false;
        }
        let card = self.outlines.remove(from);
        self.outlines.insert(to, card);
        self.resequence();
        self.events.publish("move_card");
        true
    }

    /// Complete a drag of `dragged_id` onto `slot`.
    ///
    /// Dropping onto either slot adjacent to the card is a no-op.
    pub fn drop_card(&mut self, dragged_id: &str, slot: DropSlot) -> bool {
        let Some(source) = self.outlines.iter().position(|c| c.id == dragged_id) else {
            return false;
        };
        let DropSlot(target) = slot;
        if target == source || target == source + 1 {
            return false;
        }

        let card = self.outlines.remove(source);
        let at = if target > source { target - 1 } else { target };
        let at = at.min(self.outlines.len());
        self.outlines.insert(at, card);
        self.resequence();
        self.events.publish("drop_card");
        true
    }

    fn resequence(&mut self) {
        for (i, card) in self.outlines.iter_mut().enumerate() {
            card.order = i as u32 + 1;
        }
    }
}
