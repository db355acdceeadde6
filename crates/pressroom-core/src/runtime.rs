//! Async decode and encode with deadlines.
//!
//! Decoding and encoding are CPU-bound, so they run on tokio's blocking
//! pool. Each run is bounded by the configured timeout; a run that misses
//! it yields [`PipelineError::Timeout`] and its eventual output is dropped.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::decode::SourceImage;
use crate::encode::EncodingRequest;
use crate::error::PipelineError;
use crate::pipeline::{CompressionPipeline, EncodedResult};
use crate::session::{Completion, CompressionSession, PendingCompression};

async fn run_blocking<T, F>(deadline: Duration, work: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(deadline, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) => Err(PipelineError::EncodingFailure(format!(
            "worker did not finish: {join_error}"
        ))),
        Err(_) => {
            let millis = deadline.as_millis() as u64;
            warn!(millis, "image operation timed out");
            Err(PipelineError::Timeout { millis })
        }
    }
}

/// [`CompressionPipeline::decode_and_measure`] on the blocking pool.
pub async fn decode_and_measure_async(
    pipeline: &CompressionPipeline,
    bytes: Vec<u8>,
    media_type: String,
) -> Result<SourceImage, PipelineError> {
    let worker = pipeline.clone();
    run_blocking(pipeline.config().timeout(), move || {
        worker.decode_and_measure(bytes, &media_type)
    })
    .await
}

/// [`CompressionPipeline::compress`] on the blocking pool.
pub async fn compress_async(
    pipeline: &CompressionPipeline,
    source: Arc<SourceImage>,
    request: EncodingRequest,
) -> Result<EncodedResult, PipelineError> {
    let worker = pipeline.clone();
    run_blocking(pipeline.config().timeout(), move || {
        worker.compress(&source, &request)
    })
    .await
}

impl PendingCompression {
    /// Run this compression on the blocking pool.
    pub async fn run_async(
        &self,
        pipeline: &CompressionPipeline,
    ) -> Result<EncodedResult, PipelineError> {
        compress_async(pipeline, Arc::clone(self.source()), *self.request()).await
    }
}

impl CompressionSession {
    /// Async counterpart of [`load`](Self::load).
    pub async fn load_async(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
        media_type: &str,
    ) -> Result<Arc<SourceImage>, PipelineError> {
        let source =
            decode_and_measure_async(self.pipeline(), bytes, media_type.to_string()).await?;
        Ok(self.install_source(file_name, source))
    }

    /// Async counterpart of [`compress`](Self::compress).
    ///
    /// A timeout completes the request as failed, so the session is not
    /// left busy.
    pub async fn compress_async(
        &mut self,
        request: EncodingRequest,
    ) -> Result<Completion, PipelineError> {
        let pending = self.begin_compress(request)?;
        let outcome = pending.run_async(self.pipeline()).await;
        self.complete(pending.token(), outcome)
    }
}
