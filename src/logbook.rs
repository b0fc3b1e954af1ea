use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::history::RoundRecord;

/// Append-only CSV record of every judged round.
#[derive(Debug, Clone)]
pub struct Logbook {
    path: PathBuf,
}

#[derive(Debug, Serialize)]
struct LogRow {
    timestamp: DateTime<Local>,
    level: u32,
    target: usize,
    outcome: String,
    reaction_ms: u64,
    points_earned: u64,
    points_total: u64,
    lives_left: u32,
}

impl LogRow {
    fn new(timestamp: DateTime<Local>, round: &RoundRecord) -> Self {
        Self {
            timestamp,
            level: round.level,
            target: round.target,
            outcome: round.outcome.to_string(),
            reaction_ms: round.reaction_ms,
            points_earned: round.points_earned,
            points_total: round.points_total,
            lives_left: round.lives_left,
        }
    }
}

impl Logbook {
    /// Logbook at the usual state path, if one can be resolved.
    pub fn default_location() -> Option<Self> {
        AppDirs::log_path().map(|path| Self { path })
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends the rounds, writing the header only when the file is new.
    /// All rounds in one batch share a timestamp.
    pub fn append(&self, rounds: &[RoundRecord]) -> Result<(), csv::Error> {
        if rounds.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .write(true)
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        let stamped = Local::now();
        for round in rounds {
            writer.serialize(LogRow::new(stamped, round))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Outcome;
    use tempfile::tempdir;

    fn round(outcome: Outcome) -> RoundRecord {
        RoundRecord {
            level: 2,
            target: 1,
            outcome,
            reaction_ms: 340,
            points_earned: 23,
            points_total: 34,
            lives_left: 3,
        }
    }

    #[test]
    fn append_writes_the_header_once() {
        let dir = tempdir().unwrap();
        let logbook = Logbook::with_path(dir.path().join("rounds.csv"));

        logbook.append(&[round(Outcome::Correct)]).unwrap();
        logbook.append(&[round(Outcome::Wrong)]).unwrap();

        let contents = fs::read_to_string(logbook.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,level,target,outcome"));
        assert_eq!(contents.matches("timestamp").count(), 1);
    }

    #[test]
    fn rows_carry_the_round_fields() {
        let dir = tempdir().unwrap();
        let logbook = Logbook::with_path(dir.path().join("rounds.csv"));

        logbook.append(&[round(Outcome::TimedOut)]).unwrap();

        let contents = fs::read_to_string(logbook.path()).unwrap();
        assert!(contents.contains("TimedOut"));
        assert!(contents.contains(",340,"));
        assert!(contents.contains(",23,34,3"));
    }

    #[test]
    fn empty_append_leaves_no_file_behind() {
        let dir = tempdir().unwrap();
        let logbook = Logbook::with_path(dir.path().join("rounds.csv"));
        logbook.append(&[]).unwrap();
        assert!(!logbook.path().exists());
    }

    #[test]
    fn append_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let logbook = Logbook::with_path(dir.path().join("deep").join("rounds.csv"));
        logbook.append(&[round(Outcome::Correct)]).unwrap();
        assert!(logbook.path().exists());
    }
}
