use once_cell::sync::Lazy;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_LEN: usize = 9;

/// Allocates string identifiers for slides, outline cards and content nodes.
///
/// An id is `{prefix}-{unix_millis}-{counter}-{random}-{uuid}`. The counter
/// makes ids unique within one allocator; the clock, random suffix and v4
/// UUID keep them collision-resistant across processes, so they are safe to
/// persist.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

static GLOBAL: Lazy<IdGenerator> = Lazy::new(IdGenerator::new);

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Process-wide allocator used when no allocator is injected.
    pub fn global() -> &'static IdGenerator {
        &GLOBAL
    }

    pub fn generate_id(&self, prefix: &str) -> String {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let timestamp = chrono::Utc::now().timestamp_millis();
        let random = random_base36(RANDOM_LEN);
        let uuid = Uuid::new_v4();

        if prefix.is_empty() {
            format!("{timestamp}-{count}-{random}-{uuid}")
        } else {
            format!("{prefix}-{timestamp}-{count}-{random}-{uuid}")
        }
    }

    pub fn card_id(&self) -> String {
        self.generate_id("card")
    }

    pub fn slide_id(&self) -> String {
        self.generate_id("slide")
    }

    pub fn content_id(&self) -> String {
        self.generate_id("content")
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// Shorthand for `IdGenerator::global().generate_id(prefix)`.
pub fn new_id(prefix: &str) -> String {
    IdGenerator::global().generate_id(prefix)
}

fn random_base36(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}
