//! Pressroom WASM - WebAssembly bindings for Pressroom
//!
//! This crate exposes the pressroom-core recompression pipeline to a
//! JavaScript presentation layer.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for sources, results and statistics
//! - `pipeline` - Stateless decode/compress/statistics functions
//! - `session` - `JsCompressionSession`, one image and one result per page
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCompressionSession, error_toast_ms } from '@pressroom/wasm';
//!
//! await init();
//!
//! const session = new JsCompressionSession();
//! try {
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   const source = session.load(file.name, bytes, file.type);
//!   const stats = session.compress('jpeg', 80);
//!   console.log(`${source.size_label} -> saved ${stats.saved_label}`);
//! } catch (message) {
//!   showToast(message, error_toast_ms());
//! }
//! ```

use pressroom_core::{PipelineError, ERROR_TOAST_MS};
use wasm_bindgen::prelude::*;

mod pipeline;
mod session;
mod types;

// Re-export public types
pub use pipeline::{
    compress, compute_statistics, decode_and_measure, download_file_name, format_file_size,
};
pub use session::JsCompressionSession;
pub use types::{JsEncodedResult, JsSourceImage, JsStats};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// How long the page should show an error message, in milliseconds.
#[wasm_bindgen]
pub fn error_toast_ms() -> u32 {
    ERROR_TOAST_MS as u32
}

/// Log a pipeline error to the browser console and convert it for JS.
pub(crate) fn to_js_error(err: PipelineError) -> JsValue {
    let message = JsValue::from_str(&err.to_string());
    web_sys::console::error_1(&message);
    message
}
