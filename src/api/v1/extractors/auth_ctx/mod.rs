/*!
 * Authenticated-caller context extractor
 *
 * Responsibility:
 * - hand the verified caller context (AuthCtx) to handlers
 * - HTTP / axum specifics stay in core, the type contract lives in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
