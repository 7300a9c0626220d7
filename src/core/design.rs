use chrono::{DateTime, Utc};

use crate::core::image::ImageRef;

/// Stable handle for a history entry. Ids are never reused within a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DesignId(u64);

impl DesignId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One generated image and the prompt (or feedback) that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    id: DesignId,
    image: ImageRef,
    prompt: String,
    created_at: DateTime<Utc>,
}

impl Design {
    pub fn id(&self) -> DesignId {
        self.id
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Append-only version history, most recent first.
///
/// Entries are only ever prepended; nothing is removed or edited in place, so
/// a [`DesignId`] handed out by [`History::push`] stays resolvable for the
/// lifetime of the history.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Design>,
    next_id: u64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new design as the most recent version.
    pub fn push(&mut self, image: ImageRef, prompt: impl Into<String>) -> DesignId {
        self.next_id += 1;
        let id = DesignId(self.next_id);
        // Stored oldest first; the public view reverses it.
        self.entries.push(Design {
            id,
            image,
            prompt: prompt.into(),
            created_at: Utc::now(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: DesignId) -> Option<&Design> {
        self.entries.iter().rev().find(|design| design.id == id)
    }

    pub fn contains(&self, id: DesignId) -> bool {
        self.get(id).is_some()
    }

    pub fn latest(&self) -> Option<&Design> {
        self.entries.last()
    }

    /// Designs from newest to oldest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Design> + ExactSizeIterator {
        self.entries.iter().rev()
    }

    /// 1-based version number, counted from the oldest entry.
    pub fn version_of(&self, id: DesignId) -> Option<usize> {
        self.entries
            .iter()
            .position(|design| design.id == id)
            .map(|idx| idx + 1)
    }

    pub fn by_version(&self, version: usize) -> Option<&Design> {
        version
            .checked_sub(1)
            .and_then(|idx| self.entries.get(idx))
    }

    /// Prompts from oldest to newest.
    pub fn prompts(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|design| design.prompt.clone())
            .collect()
    }

    pub fn to_vec(&self) -> Vec<Design> {
        self.iter().cloned().collect()
    }
}
