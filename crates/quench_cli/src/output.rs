//! Result persistence.
//!
//! Output for run `<id>` lives in `<results_dir>/<id>/`:
//!
//! | File | Contents |
//! |------|----------|
//! | `results<id>p<part>.csv` | parton rows |
//! | `results<id>p<part>_hadrons.csv` | hadron rows |
//! | `results<id>p<part>_observables.jsonl` | one line per event: medium observables and draw summary |
//! | `results<id>p<part>_trajectories.jsonl` | trajectories, when kept |
//! | `run_<id>.json` | run metadata |
//! | `config_<id>.toml` | effective configuration |
//!
//! The current part is rewritten in full on every [`ResultWriter::flush`];
//! once it holds `part_size` parton rows the next flush starts a new part.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use quench_core::traits::EventObservables;
use quench_engine::orchestrator::{DrawSummary, EventOutput, HadronRow, PartonRow, TrajectoryRecord};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::RunConfig;
use crate::Result;

/// One line of the observables file.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    /// Event index within the run.
    pub event: usize,
    /// Medium observables.
    pub observables: EventObservables,
    /// Draw accounting.
    pub summary: DrawSummary,
}

/// Contents of `run_<id>.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Run identifier.
    pub identifier: String,
    /// Master seed.
    pub seed: u64,
    /// Binary version.
    pub version: &'static str,
    /// Start of the run.
    pub started_at: DateTime<Utc>,
    /// Time the metadata was written.
    pub finished_at: DateTime<Utc>,
    /// Events requested; zero for an open-ended run.
    pub num_events: usize,
    /// Whether the run generated events until interrupted.
    pub until_interrupted: bool,
    /// Events that produced output.
    pub events_completed: usize,
    /// Events whose medium could not be built.
    pub events_failed: usize,
    /// Whether the run stopped on an interrupt.
    pub interrupted: bool,
    /// Output parts written.
    pub parts: usize,
    /// Parton rows written.
    pub parton_rows: usize,
    /// Hadron rows written.
    pub hadron_rows: usize,
    /// Draw accounting over the whole run.
    pub summary: DrawSummary,
}

/// Buffers event output and writes it part by part.
#[derive(Debug)]
pub struct ResultWriter {
    dir: PathBuf,
    identifier: String,
    part_size: usize,
    keep_trajectories: bool,
    part: usize,
    partons: Vec<PartonRow>,
    hadrons: Vec<HadronRow>,
    events: Vec<EventRecord>,
    trajectories: Vec<TrajectoryRecord>,
    parton_rows_written: usize,
    hadron_rows_written: usize,
}

impl ResultWriter {
    /// Creates `dir` if needed and starts part 0.
    pub fn create(
        dir: impl Into<PathBuf>,
        identifier: impl Into<String>,
        part_size: usize,
        keep_trajectories: bool,
    ) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            identifier: identifier.into(),
            part_size: part_size.max(1),
            keep_trajectories,
            part: 0,
            partons: Vec::new(),
            hadrons: Vec::new(),
            events: Vec::new(),
            trajectories: Vec::new(),
            parton_rows_written: 0,
            hadron_rows_written: 0,
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Index of the part currently being filled.
    pub fn part(&self) -> usize {
        self.part
    }

    /// Parts written so far, counting the current one if it holds rows.
    pub fn parts(&self) -> usize {
        if self.partons.is_empty() && self.events.is_empty() {
            self.part
        } else {
            self.part + 1
        }
    }

    /// Parton rows written to completed parts plus those buffered.
    pub fn parton_rows(&self) -> usize {
        self.parton_rows_written + self.partons.len()
    }

    /// Hadron rows written to completed parts plus those buffered.
    pub fn hadron_rows(&self) -> usize {
        self.hadron_rows_written + self.hadrons.len()
    }

    /// Buffers one event.
    pub fn append(&mut self, event: usize, output: EventOutput) {
        self.partons.extend(output.partons);
        self.hadrons.extend(output.hadrons);
        if self.keep_trajectories {
            self.trajectories.extend(output.trajectories);
        }
        self.events.push(EventRecord {
            event,
            observables: output.observables,
            summary: output.summary,
        });
    }

    /// Path of a file of the current part.
    pub fn part_path(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("results{}p{}{}", self.identifier, self.part, suffix))
    }

    /// Rewrites every file of the current part.
    ///
    /// Each file is attempted even if an earlier one fails; the first error
    /// is returned after all attempts. A full part is closed only when every
    /// file was written.
    pub fn flush(&mut self) -> Result<()> {
        let mut first_error = None;

        let mut attempt = |name: &str, result: Result<()>| {
            if let Err(e) = result {
                error!(file = name, error = %e, "Failed to write results");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        };

        attempt("partons", write_csv(&self.part_path(".csv"), &self.partons));
        attempt("hadrons", write_csv(&self.part_path("_hadrons.csv"), &self.hadrons));
        attempt(
            "observables",
            write_jsonl(&self.part_path("_observables.jsonl"), &self.events),
        );
        if self.keep_trajectories {
            attempt(
                "trajectories",
                write_jsonl(&self.part_path("_trajectories.jsonl"), &self.trajectories),
            );
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        debug!(
            part = self.part,
            partons = self.partons.len(),
            hadrons = self.hadrons.len(),
            "Flushed results"
        );

        if self.partons.len() >= self.part_size {
            info!(part = self.part, rows = self.partons.len(), "Closing full output part");
            self.parton_rows_written += self.partons.len();
            self.hadron_rows_written += self.hadrons.len();
            self.partons.clear();
            self.hadrons.clear();
            self.events.clear();
            self.trajectories.clear();
            self.part += 1;
        }
        Ok(())
    }

    /// Writes `run_<id>.json`.
    pub fn write_metadata(&self, metadata: &RunMetadata) -> Result<()> {
        let path = self.dir.join(format!("run_{}.json", self.identifier));
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, metadata)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the effective configuration to `config_<id>.toml`.
    pub fn write_config(&self, config: &RunConfig) -> Result<()> {
        let path = self.dir.join(format!("config_{}.toml", self.identifier));
        std::fs::write(path, toml::to_string_pretty(config)?)?;
        Ok(())
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
