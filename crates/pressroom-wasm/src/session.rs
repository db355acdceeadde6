//! Session WASM bindings.
//!
//! `JsCompressionSession` owns the selected image and its latest compressed
//! result for one page. It also owns the object URL used to preview and
//! download that result, and revokes it whenever the result is replaced, the
//! session is reset, or the session is freed.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsCompressionSession({ maxInputBytes: 20 * 1024 * 1024 });
//! const source = session.load(file.name, bytes, file.type);
//!
//! // Split form: let the spinner paint before the encode blocks the worker
//! const token = session.begin_compress('jpeg', 80);
//! await new Promise((r) => setTimeout(r));
//! const stats = session.complete(token); // undefined if superseded
//!
//! preview.src = session.result_object_url();
//! link.download = session.download_file_name();
//! ```

use pressroom_core::{
    Completion, CompressionSession, EncodingRequest, PendingCompression, PipelineConfig,
    SessionPhase,
};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::to_js_error;
use crate::types::{JsEncodedResult, JsSourceImage, JsStats};

/// A single-image compression session.
#[wasm_bindgen]
pub struct JsCompressionSession {
    session: CompressionSession,
    pending: Option<PendingCompression>,
    object_url: Option<String>,
}

#[wasm_bindgen]
impl JsCompressionSession {
    /// Create a session. `config` is an optional object with any of
    /// `maxInputBytes`, `timeoutMs`, `defaultFormat`, `defaultQualityPercent`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCompressionSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self::with_config(config))
    }

    /// "empty", "loaded" or "compressed"
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        match self.session.phase() {
            SessionPhase::Empty => "empty",
            SessionPhase::Loaded => "loaded",
            SessionPhase::Compressed => "compressed",
        }
        .to_string()
    }

    /// True while a compression is outstanding; keep the compress button
    /// disabled until it clears.
    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// Slider position to start from.
    #[wasm_bindgen(getter)]
    pub fn default_quality_percent(&self) -> u8 {
        self.session.pipeline().config().default_quality_percent
    }

    /// Select a new image. On failure the previous image stays selected.
    pub fn load(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
        media_type: &str,
    ) -> Result<JsSourceImage, JsValue> {
        let source = self
            .session
            .load(file_name, bytes, media_type)
            .map_err(to_js_error)?;
        self.pending = None;
        self.release_object_url();
        Ok(JsSourceImage::from(source.as_ref()))
    }

    /// Compress the selected image and make the output the current result.
    ///
    /// `format` of `undefined` uses the configured default.
    pub fn compress(
        &mut self,
        format: Option<String>,
        quality_percent: u8,
    ) -> Result<JsStats, JsValue> {
        let token = self.begin_compress(format, quality_percent)?;
        self.complete(token)?
            .ok_or_else(|| JsValue::from_str("compression was superseded"))
    }

    /// Start a compression and return its token. Supersedes any compression
    /// started earlier and not yet run.
    pub fn begin_compress(
        &mut self,
        format: Option<String>,
        quality_percent: u8,
    ) -> Result<f64, JsValue> {
        let request = self.request(format, quality_percent)?;
        let pending = self.session.begin_compress(request).map_err(to_js_error)?;
        let token = pending.token();
        self.pending = Some(pending);
        Ok(token as f64)
    }

    /// Run and apply the compression started with `token`.
    ///
    /// Returns `undefined` when the token has been superseded by a newer
    /// compression or a new image; nothing changes in that case.
    ///
    /// This runs synchronously with no deadline. The page's worker has to
    /// enforce its own timeout (terminate the worker and report a timeout);
    /// only the native `runtime` wrappers fail with `PipelineError::Timeout`.
    pub fn complete(&mut self, token: f64) -> Result<Option<JsStats>, JsValue> {
        let token = token as u64;
        let pending = match self.pending.take() {
            Some(pending) if pending.token() == token => pending,
            other => {
                self.pending = other;
                return Ok(None);
            }
        };

        let outcome = pending.run(self.session.pipeline());
        match self.session.complete(token, outcome).map_err(to_js_error)? {
            Completion::Applied(stats) => {
                self.release_object_url();
                Ok(Some(stats.into()))
            }
            Completion::Stale => Ok(None),
        }
    }

    /// The selected image, if any.
    pub fn source(&self) -> Option<JsSourceImage> {
        self.session.source().map(JsSourceImage::from)
    }

    /// The current compressed result, if any.
    pub fn result(&self) -> Option<JsEncodedResult> {
        self.session.result().cloned().map(JsEncodedResult::from)
    }

    /// Statistics for the current result, if any.
    pub fn stats(&self) -> Option<JsStats> {
        self.session.stats().map(JsStats::from)
    }

    /// Name to save the current result under.
    pub fn download_file_name(&self) -> Result<String, JsValue> {
        self.session
            .download()
            .map(|download| download.file_name)
            .map_err(to_js_error)
    }

    /// The current result's bytes (copied).
    pub fn result_bytes(&self) -> Result<Vec<u8>, JsValue> {
        self.session
            .download()
            .map(|download| download.bytes.to_vec())
            .map_err(to_js_error)
    }

    /// An object URL for the current result, created on first use.
    ///
    /// The URL stays valid until the result is replaced, `reset` or
    /// `release_object_url` is called, or the session is freed.
    pub fn result_object_url(&mut self) -> Result<String, JsValue> {
        if let Some(url) = &self.object_url {
            return Ok(url.clone());
        }

        let download = self.session.download().map_err(to_js_error)?;
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(download.bytes));

        let options = BlobPropertyBag::new();
        options.set_type(download.mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        self.object_url = Some(url.clone());
        Ok(url)
    }

    /// Revoke the current object URL, if one was created.
    pub fn release_object_url(&mut self) {
        if let Some(url) = self.object_url.take() {
            if let Err(e) = Url::revoke_object_url(&url) {
                web_sys::console::warn_1(&e);
            }
        }
    }

    /// Drop the image and result and return to "empty".
    pub fn reset(&mut self) {
        self.pending = None;
        self.release_object_url();
        self.session.reset();
    }
}

impl JsCompressionSession {
    pub(crate) fn with_config(config: PipelineConfig) -> Self {
        Self {
            session: CompressionSession::with_config(config),
            pending: None,
            object_url: None,
        }
    }

    fn request(
        &self,
        format: Option<String>,
        quality_percent: u8,
    ) -> Result<EncodingRequest, JsValue> {
        let mut request = EncodingRequest::from_settings(format.as_deref(), quality_percent)
            .map_err(|e| to_js_error(e.into()))?;
        if format.is_none() {
            request.format = self.session.pipeline().config().default_format;
        }
        Ok(request)
    }
}

impl Drop for JsCompressionSession {
    fn drop(&mut self) {
        self.release_object_url();
    }
}
