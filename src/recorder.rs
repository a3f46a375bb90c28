//! Result recorder and reporter.
//!
//! A [`Recorder`] renders every outcome it is given, keeps the latest marker
//! per description, pulls requested fields out of the content, and prints a
//! one-shot summary table. It owns its log, so independent runs use
//! independent recorders; `&mut self` on every mutating call keeps a single
//! recorder from being shared across threads without synchronization.

use serde_json::Value;
use std::io::{self, Stdout, Write};

use crate::extract;
use crate::outcome::{Marker, Outcome};
use crate::render::{self, Console};
use crate::summary::{ResultEntry, RunSummary};

/// Printed by [`Recorder::summarize`] when nothing was recorded
pub const NO_RESULTS_NOTICE: &str = "No test results to show.";

/// Values pulled out of an outcome by [`Recorder::evaluate`]
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// No paths were requested
    Nothing,
    /// Exactly one path was requested
    Single(Option<Value>),
    /// Several paths, in request order
    Multiple(Vec<Option<Value>>),
}

impl Extracted {
    /// The single extracted value (first one for `Multiple`)
    pub fn value(self) -> Option<Value> {
        match self {
            Extracted::Nothing => None,
            Extracted::Single(value) => value,
            Extracted::Multiple(values) => values.into_iter().next().flatten(),
        }
    }

    pub fn values(self) -> Vec<Option<Value>> {
        match self {
            Extracted::Nothing => Vec::new(),
            Extracted::Single(value) => vec![value],
            Extracted::Multiple(values) => values,
        }
    }

    /// Positional values as a fixed-size array, padded with `None`.
    ///
    /// ```
    /// use api_probe::recorder::Extracted;
    /// use serde_json::json;
    ///
    /// let [id, name] = Extracted::Multiple(vec![Some(json!(1)), None]).into_array();
    /// assert_eq!(id, Some(json!(1)));
    /// assert_eq!(name, None);
    /// ```
    pub fn into_array<const N: usize>(self) -> [Option<Value>; N] {
        let mut values = self.values().into_iter();
        std::array::from_fn(|_| values.next().flatten())
    }
}

/// Records outcomes under their descriptions and reports on them
#[derive(Debug)]
pub struct Recorder<W = Stdout> {
    console: Console<W>,
    log: Vec<ResultEntry>,
}

impl Recorder<Stdout> {
    /// Recorder printing to stdout
    pub fn stdout() -> Self {
        Self::new(Console::stdout())
    }
}

impl<W: Write> Recorder<W> {
    pub fn new(console: Console<W>) -> Self {
        Self {
            console,
            log: Vec::new(),
        }
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    pub fn into_console(self) -> Console<W> {
        self.console
    }

    /// Recorded entries in first-recorded order
    pub fn entries(&self) -> &[ResultEntry] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Render `outcome`, record it under `description` and extract `paths`.
    ///
    /// Recording the same description twice keeps one entry holding the
    /// latest marker. Paths that do not resolve yield `None` and a warning
    /// each; they never stop the remaining paths from being extracted.
    pub fn evaluate(&mut self, description: &str, outcome: &Outcome, paths: &[&str]) -> Extracted {
        emit(self.console.outcome(description, outcome));
        self.record(description, outcome.marker());

        match paths {
            [] => Extracted::Nothing,
            [path] => Extracted::Single(self.extract_one(description, outcome.content(), path)),
            _ => Extracted::Multiple(
                paths
                    .iter()
                    .map(|path| self.extract_one(description, outcome.content(), path))
                    .collect(),
            ),
        }
    }

    /// Print the results table and tally, then clear the log.
    ///
    /// Returns `None` (after printing a notice) when nothing was recorded.
    pub fn summarize(&mut self, title: &str) -> Option<RunSummary> {
        if self.log.is_empty() {
            emit(self.console.notice(NO_RESULTS_NOTICE));
            return None;
        }

        let summary = RunSummary::new(title, std::mem::take(&mut self.log));
        let rows: Vec<_> = summary
            .entries
            .iter()
            .map(|e| render::marker_row(&e.description, e.marker))
            .collect();

        emit(self.console.table(title, ("Description", "Result"), &rows));
        emit(self.console.tally(summary.total, summary.passed, summary.failed));
        emit(self.console.flush());

        tracing::debug!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "summary printed"
        );
        Some(summary)
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.log.clear();
    }

    /// Print arbitrary key/value pairs in a table.
    pub fn print_info<K, V>(&mut self, title: &str, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: ToString,
        V: ToString,
    {
        let rows = render::info_rows(pairs);
        emit(self.console.table(title, ("Key", "Value"), &rows));
    }

    fn record(&mut self, description: &str, marker: Marker) {
        match self.log.iter_mut().find(|e| e.description == description) {
            Some(entry) => entry.marker = marker,
            None => self.log.push(ResultEntry {
                description: description.to_string(),
                marker,
            }),
        }
    }

    fn extract_one(&mut self, description: &str, content: &Value, path: &str) -> Option<Value> {
        match extract::resolve(content, path) {
            Ok(value) => Some(value.clone()),
            Err(e) => {
                tracing::warn!(description, path, error = %e, "could not extract field");
                emit(
                    self.console
                        .warning(&format!("Could not extract '{}' from response.", path)),
                );
                None
            }
        }
    }
}

/// Console output is best-effort; a closed stdout must not break a run.
fn emit(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::debug!(error = %e, "console write failed");
    }
}
