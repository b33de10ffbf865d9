//! Adult content visibility gating for image galleries
//!
//! The crate is split the same way the gallery uses it:
//! - `state`: image data model, session-wide visibility store, feed loading
//! - `gate`: gating context, evaluator, disclosure gate and render policy
//! - `config`: viewer/session settings stored as JSON
//! - `logging`: tracing subscriber setup

pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod state;

pub use error::GateError;
