//! JSON exporter for recorded runs.
//!
//! Exports every update of a scenario run so a failing seed can be
//! inspected offline.

use dine_env::Update;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// One table of a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableExport {
    /// Seed the table ran with
    pub seed: u64,

    /// Number of philosophers
    pub philosophers: usize,

    /// Starting hunger
    pub starting_hunger: u32,

    /// Wall time in milliseconds
    pub elapsed_ms: u64,

    /// Every update, in the order the observer received them
    pub events: Vec<Update>,

    /// Why the table failed, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Complete scenario export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// All tables
    pub tables: Vec<TableExport>,

    /// Final result
    pub passed: bool,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            tables: Vec::new(),
            passed: false,
        }
    }

    /// Adds a table.
    pub fn add_table(&mut self, table: TableExport) {
        self.tables.push(table);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, passed: bool) {
        self.passed = passed;
    }

    /// Returns the number of updates across all tables.
    pub fn event_count(&self) -> usize {
        self.tables.iter().map(|t| t.events.len()).sum()
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
