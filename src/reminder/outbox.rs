use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::reminder::Reminder;

#[derive(Debug, Clone)]
pub struct Outbox {
    path: PathBuf,
}

impl Outbox {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, reminder: &Reminder) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(&reminder.payload())?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    pub fn submit(&self, reminder: &Reminder) {
        match self.append(reminder) {
            Ok(()) => info!(id = %reminder.id, "submitted reminder payload"),
            Err(err) => warn!(id = %reminder.id, "payload submission failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::reminder::sample;

    #[test]
    fn appends_one_line_per_submission() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = Outbox::new(dir.path().join("host").join("outbox.jsonl"));
        outbox.submit(&sample("1", "2025-06-03T09:00:00Z", "Work"));
        outbox.submit(&sample("2", "2025-06-04T09:00:00Z", ""));

        let content = std::fs::read_to_string(outbox.path()).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], "1");
        assert_eq!(lines[0]["category"], "Work");
        assert_eq!(lines[1]["datetime"], "2025-06-04T09:00:00Z");
    }

    #[test]
    fn unwritable_path_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let outbox = Outbox::new(dir.path());
        outbox.submit(&sample("1", "2025-06-03T09:00:00Z", ""));
    }
}
