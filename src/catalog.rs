//! Merging of extracted messages across files and releases.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    message::{Message, SourceRef},
    release::ReleaseId,
};

/// One template entry: a distinct `(context, text)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub context: Option<String>,
    pub text: String,
    /// Locations in `release`; never from older releases.
    pub sources: Vec<SourceRef>,
    /// Newest release the entry was seen in.
    pub release: ReleaseId,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub entries: Vec<Entry>,
    /// Newest release over all messages, `0.0` if there were none.
    pub newest: ReleaseId,
}

impl Catalog {
    /// Group messages by `(context, text)`.
    ///
    /// Messages are first stably sorted newest release first, so each entry
    /// records the newest release it appears in and collects source
    /// references from that release only. Entry order is first appearance
    /// in the sorted sequence.
    pub fn from_messages(mut messages: Vec<Message>) -> Self {
        messages.sort_by(|a, b| b.release.cmp(&a.release));

        let mut catalog = Catalog::default();
        let mut index: HashMap<(Option<String>, String), usize> = HashMap::new();

        for message in messages {
            catalog.newest = catalog.newest.max(message.release);

            let (context, text) = message.key();
            let key = (context.map(String::from), text.to_string());
            let position = *index.entry(key).or_insert_with(|| {
                catalog.entries.push(Entry {
                    context: message.context.clone(),
                    text: message.text.clone(),
                    sources: Vec::new(),
                    release: message.release,
                });
                catalog.entries.len() - 1
            });

            let entry = &mut catalog.entries[position];
            if entry.release == message.release {
                entry.sources.push(message.source);
            }
        }

        catalog
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that no longer appear in the newest release.
    pub fn stale_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.release != self.newest)
            .count()
    }
}
