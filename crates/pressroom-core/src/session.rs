//! Per-user compression session.
//!
//! A session holds at most one source image and one encoded result, and
//! moves through `Empty -> Loaded -> Compressed`. Compressing again stays in
//! `Compressed` and replaces the previous result; loading a new source
//! drops both.
//!
//! Compression is split into [`CompressionSession::begin_compress`] and
//! [`CompressionSession::complete`] so the encode can run elsewhere (a
//! worker, a blocking thread). Every begin issues a fresh token; only the
//! most recent token may complete; anything older is dropped as stale.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::decode::SourceImage;
use crate::display::download_file_name;
use crate::encode::EncodingRequest;
use crate::error::PipelineError;
use crate::pipeline::{CompressionPipeline, EncodedResult};
use crate::stats::Stats;

/// Identifies one compression attempt within a session.
pub type RequestToken = u64;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No source selected.
    Empty,
    /// Source measured, nothing compressed yet.
    Loaded,
    /// A result is available for display and download.
    Compressed,
}

#[derive(Debug)]
struct Loaded {
    file_name: String,
    source: Arc<SourceImage>,
}

#[derive(Debug)]
enum State {
    Empty,
    Loaded(Loaded),
    Compressed {
        loaded: Loaded,
        result: EncodedResult,
        stats: Stats,
    },
}

/// A compression that has been started but not yet completed.
#[derive(Debug, Clone)]
pub struct PendingCompression {
    token: RequestToken,
    source: Arc<SourceImage>,
    request: EncodingRequest,
}

impl PendingCompression {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn source(&self) -> &Arc<SourceImage> {
        &self.source
    }

    pub fn request(&self) -> &EncodingRequest {
        &self.request
    }

    /// Run the encode synchronously on the current thread.
    pub fn run(&self, pipeline: &CompressionPipeline) -> Result<EncodedResult, PipelineError> {
        pipeline.compress(&self.source, &self.request)
    }
}

/// Outcome of handing a finished compression back to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Completion {
    /// The result is now the session's current result.
    Applied(Stats),
    /// A newer request or a new source superseded this one; its outcome
    /// was discarded.
    Stale,
}

impl Completion {
    pub fn stats(self) -> Option<Stats> {
        match self {
            Completion::Applied(stats) => Some(stats),
            Completion::Stale => None,
        }
    }
}

/// The current result, ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct Download<'a> {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: &'a [u8],
}

/// Explicit session object holding the active source and result.
#[derive(Debug)]
pub struct CompressionSession {
    pipeline: CompressionPipeline,
    state: State,
    next_token: RequestToken,
    in_flight: Option<RequestToken>,
}

impl Default for CompressionSession {
    fn default() -> Self {
        Self::new(CompressionPipeline::default())
    }
}

impl CompressionSession {
    pub fn new(pipeline: CompressionPipeline) -> Self {
        Self {
            pipeline,
            state: State::Empty,
            next_token: 1,
            in_flight: None,
        }
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self::new(CompressionPipeline::new(config))
    }

    pub fn pipeline(&self) -> &CompressionPipeline {
        &self.pipeline
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Empty => SessionPhase::Empty,
            State::Loaded(_) => SessionPhase::Loaded,
            State::Compressed { .. } => SessionPhase::Compressed,
        }
    }

    /// Whether a compression is outstanding. The presentation layer keeps
    /// its compress trigger disabled while this is true.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.loaded().map(|loaded| loaded.source.as_ref())
    }

    pub fn file_name(&self) -> Option<&str> {
        self.loaded().map(|loaded| loaded.file_name.as_str())
    }

    pub fn result(&self) -> Option<&EncodedResult> {
        match &self.state {
            State::Compressed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn stats(&self) -> Option<Stats> {
        match &self.state {
            State::Compressed { stats, .. } => Some(*stats),
            _ => None,
        }
    }

    fn loaded(&self) -> Option<&Loaded> {
        match &self.state {
            State::Empty => None,
            State::Loaded(loaded) | State::Compressed { loaded, .. } => Some(loaded),
        }
    }

    /// Validate, measure and select a new source.
    ///
    /// On success any previous source and result are dropped and pending
    /// compressions become stale. On failure the session is unchanged.
    pub fn load(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
        media_type: &str,
    ) -> Result<Arc<SourceImage>, PipelineError> {
        let source = self.pipeline.decode_and_measure(bytes, media_type)?;
        Ok(self.install_source(file_name, source))
    }

    pub(crate) fn install_source(&mut self, file_name: &str, source: SourceImage) -> Arc<SourceImage> {
        debug!(file_name, "selected new source");
        let source = Arc::new(source);
        self.in_flight = None;
        self.state = State::Loaded(Loaded {
            file_name: file_name.to_string(),
            source: Arc::clone(&source),
        });
        source
    }

    /// Start a compression of the current source.
    ///
    /// Any compression already in flight is superseded: its completion
    /// will be reported as [`Completion::Stale`].
    pub fn begin_compress(
        &mut self,
        request: EncodingRequest,
    ) -> Result<PendingCompression, PipelineError> {
        let source = self
            .loaded()
            .map(|loaded| Arc::clone(&loaded.source))
            .ok_or_else(|| PipelineError::InvalidInput("no image selected".to_string()))?;

        let token = self.next_token;
        self.next_token += 1;
        if let Some(previous) = self.in_flight.replace(token) {
            debug!(previous, token, "superseding in-flight compression");
        }

        Ok(PendingCompression {
            token,
            source,
            request,
        })
    }

    /// Hand back the outcome of a compression started with
    /// [`begin_compress`](Self::begin_compress).
    ///
    /// Outcomes for anything but the latest token are dropped, successful
    /// or not. A failure of the latest request is returned as the error and
    /// leaves the previous result in place.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<EncodedResult, PipelineError>,
    ) -> Result<Completion, PipelineError> {
        if self.in_flight != Some(token) {
            warn!(token, latest = ?self.in_flight, "dropping stale compression result");
            return Ok(Completion::Stale);
        }
        self.in_flight = None;

        let result = outcome?;
        let state = std::mem::replace(&mut self.state, State::Empty);
        let loaded = match state {
            State::Loaded(loaded) | State::Compressed { loaded, .. } => loaded,
            State::Empty => {
                return Err(PipelineError::InvalidInput("no image selected".to_string()));
            }
        };

        let stats = self.pipeline.compute_statistics(&loaded.source, &result);
        self.state = State::Compressed {
            loaded,
            result,
            stats,
        };
        Ok(Completion::Applied(stats))
    }

    /// Compress the current source on this thread.
    pub fn compress(&mut self, request: EncodingRequest) -> Result<Completion, PipelineError> {
        let pending = self.begin_compress(request)?;
        let outcome = pending.run(&self.pipeline);
        self.complete(pending.token(), outcome)
    }

    /// The current result and the name to save it under. Does not change
    /// session state.
    pub fn download(&self) -> Result<Download<'_>, PipelineError> {
        match &self.state {
            State::Compressed { loaded, result, .. } => Ok(Download {
                file_name: download_file_name(&loaded.file_name, result.quality(), result.format()),
                mime_type: result.format().mime_type(),
                bytes: result.bytes(),
            }),
            _ => Err(PipelineError::InvalidInput(
                "no compressed image to download".to_string(),
            )),
        }
    }

    /// Drop the source and result and return to `Empty`.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.state = State::Empty;
    }
}
