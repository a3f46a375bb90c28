//! Types for test run results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::outcome::Marker;

/// One recorded test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// Human-readable description the test was recorded under
    pub description: String,

    /// Latest marker recorded for this description
    pub marker: Marker,
}

impl ResultEntry {
    pub fn is_success(&self) -> bool {
        self.marker.is_success()
    }
}

/// Aggregate of a finished run, produced once per summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Title the summary was printed under
    pub title: String,

    /// When the summary was produced
    pub generated_at: DateTime<Utc>,

    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    /// Entries in first-recorded order
    pub entries: Vec<ResultEntry>,
}

impl RunSummary {
    pub fn new(title: impl Into<String>, entries: Vec<ResultEntry>) -> Self {
        let passed = entries.iter().filter(|e| e.is_success()).count();
        Self {
            title: title.into(),
            generated_at: Utc::now(),
            total: entries.len(),
            passed,
            failed: entries.len() - passed,
            entries,
        }
    }

    /// True when every recorded test passed
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
