/// Session logging system
///
/// Every trial-level event (stroke committed, sensation added, trial saved,
/// reset) is recorded with:
/// - Timestamp
/// - Event name
/// - Detail text
/// - Sequential order
///
/// The log can be inspected in-app and exported as human-readable text or
/// JSON alongside the trial data.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// A single log entry representing one session event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Sequential event number (1-based)
    pub sequence: usize,
    /// Timestamp when the event happened
    pub timestamp: DateTime<Local>,
    /// Short event name
    pub event: String,
    /// Detail text
    pub detail: String,
}

impl SessionEntry {
    /// Format as human-readable text line
    pub fn to_text(&self) -> String {
        format!(
            "[{:03}] {} | {} | {}",
            self.sequence,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.event,
            self.detail
        )
    }
}

/// The session log — records all annotation events in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    /// Session metadata
    pub session_id: String,
    pub session_start: DateTime<Local>,
    pub save_folder: String,
    pub software_version: String,
    /// Ordered list of events
    pub entries: Vec<SessionEntry>,
}

impl SessionLog {
    /// Create a new empty log
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session_start: Local::now(),
            save_folder: String::new(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            entries: Vec::new(),
        }
    }

    /// Set the active save folder for this session
    pub fn set_save_folder(&mut self, folder: &str) {
        self.save_folder = folder.to_string();
    }

    /// Add an event to the log
    pub fn add_entry(&mut self, event: &str, detail: &str) {
        let seq = self.entries.len() + 1;
        self.entries.push(SessionEntry {
            sequence: seq,
            timestamp: Local::now(),
            event: event.to_string(),
            detail: detail.to_string(),
        });
        log::info!("[LOG {:03}] {} — {}", seq, event, detail);
    }

    /// Get the number of events
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export as human-readable text
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out.push_str("  PerceptMap Session Log\n");
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out.push_str(&format!("  Session ID:  {}\n", self.session_id));
        out.push_str(&format!(
            "  Started:     {}\n",
            self.session_start.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("  Folder:      {}\n", self.save_folder));
        out.push_str(&format!("  Software:    PerceptMap v{}\n", self.software_version));
        out.push_str(&format!("  Events:      {}\n", self.entries.len()));
        out.push_str("───────────────────────────────────────────────────────────────\n\n");

        for entry in &self.entries {
            out.push_str(&entry.to_text());
            out.push('\n');
        }

        out.push_str("\n═══════════════════════════════════════════════════════════════\n");
        out.push_str(&format!(
            "  Log exported: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out
    }

    /// Export as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// Save log as text file
    pub fn save_text(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_text())
    }

    /// Save log as JSON file
    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.to_json())
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_creation_and_entries() {
        let mut log = SessionLog::new();
        assert!(log.is_empty());

        log.add_entry("Stroke", "Committed 12 points on Rpalmar");
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries[0].sequence, 1);
        assert_eq!(log.entries[0].event, "Stroke");

        log.add_entry("Add Sensation", "Sensation 1 started");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries[1].sequence, 2);
    }

    #[test]
    fn test_text_export() {
        let mut log = SessionLog::new();
        log.set_save_folder("subjA");
        log.add_entry("Save Trial", "Wrote imPixel + RadioCheckSlider for rep 3");
        let text = log.to_text();
        assert!(text.contains("subjA"));
        assert!(text.contains("Save Trial"));
        assert!(text.contains("rep 3"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut log = SessionLog::new();
        log.add_entry("Reset", "Trial reset to rep 4");
        let json = log.to_json();
        let parsed: SessionLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].event, "Reset");
    }
}
