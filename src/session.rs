//! Explicit session state with generation-based supersession.
//!
//! The session owns everything tied to the "current" upload: the selected
//! file name, the normalized image, the latest analysis result, and a
//! status flag. It is a value type — every transition consumes the old
//! session and returns a new one, so there is no ambient mutable state to
//! corrupt from a stale async completion.
//!
//! ## Supersession, not cancellation
//!
//! Neither PDF rendering nor the analysis call can be preempted once
//! started. Instead, each `begin_*` transition bumps a monotonically
//! increasing [`Generation`]; the matching `finish_*` transition compares
//! generations and silently discards completions belonging to a superseded
//! operation. A new file selection therefore invalidates any in-flight
//! work for the previous one without coordinating with it.

use crate::error::MediScanError;
use crate::types::{AnalysisResult, NormalizedImage};

/// Monotonic counter identifying one ingest or analysis attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Coarse lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No file selected.
    #[default]
    Idle,
    /// An ingest is in flight.
    Ingesting,
    /// A normalized image is ready; analysis may start.
    Ready,
    /// An analysis call is in flight.
    Analyzing,
}

/// The single per-user session: current file, image, result, and status.
#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
    status: SessionStatus,
    file_name: Option<String>,
    image: Option<NormalizedImage>,
    result: Option<AnalysisResult>,
    last_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn image(&self) -> Option<&NormalizedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the "Analyze" action should be enabled: an image is present
    /// and no operation of either kind is outstanding.
    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && self.status == SessionStatus::Ready
    }

    /// Start ingesting a newly selected file.
    ///
    /// Supersedes any in-flight ingest or analysis: their completions will
    /// carry an older generation and be discarded. The previous result and
    /// error are cleared; the previous image stays visible until the new
    /// ingest resolves.
    pub fn begin_ingest(mut self, file_name: impl Into<String>) -> (Self, Generation) {
        self.generation += 1;
        self.status = SessionStatus::Ingesting;
        self.file_name = Some(file_name.into());
        self.result = None;
        self.last_error = None;
        let gen = Generation(self.generation);
        (self, gen)
    }

    /// Resolve an ingest attempt.
    ///
    /// A stale generation leaves the session untouched. Failure fully
    /// resets the session — no dangling preview or partial bytes survive —
    /// keeping only the error message for display.
    pub fn finish_ingest(
        mut self,
        gen: Generation,
        outcome: Result<NormalizedImage, MediScanError>,
    ) -> Self {
        if gen.0 != self.generation {
            return self;
        }
        match outcome {
            Ok(image) => {
                self.image = Some(image);
                self.status = SessionStatus::Ready;
                self
            }
            Err(e) => {
                let mut reset = Session::new();
                reset.generation = self.generation;
                reset.last_error = Some(e.to_string());
                reset
            }
        }
    }

    /// Start an analysis of the current image.
    ///
    /// Fails with [`MediScanError::MissingInput`] when no image is set.
    pub fn begin_analysis(mut self) -> Result<(Self, Generation), (Self, MediScanError)> {
        if self.image.is_none() {
            return Err((self, MediScanError::MissingInput));
        }
        self.generation += 1;
        self.status = SessionStatus::Analyzing;
        self.result = None;
        self.last_error = None;
        let gen = Generation(self.generation);
        Ok((self, gen))
    }

    /// Resolve an analysis attempt.
    ///
    /// A stale generation leaves the session untouched. Unlike ingestion,
    /// failure preserves the selected file and image so the user can retry
    /// without re-uploading.
    pub fn finish_analysis(
        mut self,
        gen: Generation,
        outcome: Result<AnalysisResult, MediScanError>,
    ) -> Self {
        if gen.0 != self.generation {
            return self;
        }
        match outcome {
            Ok(result) => {
                self.result = Some(result);
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
        self.status = SessionStatus::Ready;
        self
    }

    /// Explicit user reset: discard everything but keep the generation
    /// counter monotonic so in-flight completions remain stale.
    pub fn reset(self) -> Self {
        let mut fresh = Session::new();
        fresh.generation = self.generation + 1;
        fresh
    }
}
