//! Transcript entries and the transcript view they are appended to.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Default label shown before user messages.
pub const DEFAULT_USER_LABEL: &str = "You: ";

/// Default label shown before bot replies.
pub const DEFAULT_BOT_LABEL: &str = "Bot: ";

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

/// One line of the transcript. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub speaker: Speaker,
    pub text: String,
}

impl Entry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
        }
    }

    /// Renders the entry with the given labels, e.g. `You: hello`.
    pub fn render(&self, labels: &Labels) -> String {
        format!("{}{}", labels.for_speaker(self.speaker), self.text)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Labels::default()))
    }
}

/// Display labels prefixed to each entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub user: String,
    pub bot: String,
}

impl Labels {
    pub fn for_speaker(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::User => &self.user,
            Speaker::Bot => &self.bot,
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER_LABEL.to_string(),
            bot: DEFAULT_BOT_LABEL.to_string(),
        }
    }
}

/// An append-only view of the conversation.
///
/// Implementations are shared between the input handler and its pending
/// exchanges, so every method takes `&self`.
pub trait Transcript: Send + Sync {
    fn append(&self, entry: Entry);

    /// Brings the most recent entry into view.
    fn scroll_to_bottom(&self);
}

/// A transcript that only records what was appended.
#[derive(Debug, Default)]
pub struct MemoryTranscript {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: Vec<Entry>,
    scrolls: usize,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entries appended so far, in order.
    pub fn entries(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    /// Entries rendered with the default labels.
    pub fn lines(&self) -> Vec<String> {
        self.lock().entries.iter().map(ToString::to_string).collect()
    }

    pub fn scroll_count(&self) -> usize {
        self.lock().scrolls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transcript for MemoryTranscript {
    fn append(&self, entry: Entry) {
        self.lock().entries.push(entry);
    }

    fn scroll_to_bottom(&self) {
        self.lock().scrolls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_renders_with_default_labels() {
        assert_eq!(Entry::user("hello").to_string(), "You: hello");
        assert_eq!(Entry::bot("hi there").to_string(), "Bot: hi there");
    }

    #[test]
    fn test_entry_renders_with_custom_labels() {
        let labels = Labels {
            user: "me> ".to_string(),
            bot: "srv> ".to_string(),
        };
        assert_eq!(Entry::user("ping").render(&labels), "me> ping");
        assert_eq!(Entry::bot("pong").render(&labels), "srv> pong");
    }

    #[test]
    fn test_entry_keeps_surrounding_whitespace() {
        assert_eq!(Entry::user("  spaced  ").to_string(), "You:   spaced  ");
    }

    #[test]
    fn test_memory_transcript_records_in_order() {
        let transcript = MemoryTranscript::new();
        transcript.append(Entry::user("a"));
        transcript.append(Entry::bot("b"));
        transcript.scroll_to_bottom();

        assert_eq!(transcript.entries(), vec![Entry::user("a"), Entry::bot("b")]);
        assert_eq!(transcript.lines(), vec!["You: a", "Bot: b"]);
        assert_eq!(transcript.scroll_count(), 1);
    }
}
