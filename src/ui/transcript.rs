use super::Style;
use super::terminal::{OutputGate, Stream, terminal};
use crate::transcript::{Entry, Labels, Speaker, Transcript};

/// Prints transcript entries to stdout as they are appended.
///
/// Entries appended while the prompt is open are held by the gate and
/// printed when it closes.
pub struct TerminalTranscript {
    labels: Labels,
    gate: &'static OutputGate,
}

impl TerminalTranscript {
    pub fn new(labels: Labels) -> Self {
        Self::with_gate(labels, terminal())
    }

    pub const fn with_gate(labels: Labels, gate: &'static OutputGate) -> Self {
        Self { labels, gate }
    }

    /// The line printed for `entry`, styling only the label.
    pub fn format_entry(&self, entry: &Entry) -> String {
        let label = self.labels.for_speaker(entry.speaker);
        let label = match entry.speaker {
            Speaker::User => Style::user_label(label),
            Speaker::Bot => Style::bot_label(label),
        };
        format!("{label}{}", entry.text)
    }
}

impl Transcript for TerminalTranscript {
    fn append(&self, entry: Entry) {
        self.gate.line(Stream::Stdout, &self.format_entry(&entry));
    }

    // Each line is flushed as it is written.
    fn scroll_to_bottom(&self) {}
}
