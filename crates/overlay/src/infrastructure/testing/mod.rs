//! Recording fakes for the outbound ports.
//!
//! Used by unit tests in this crate and by the integration tests under
//! `tests/`; they record every call so assertions can inspect exactly what the
//! core asked the platform to do.

mod audio;
mod catalog;
mod clock;
mod display;

pub use audio::{AudioCall, RecordingAudio};
pub use catalog::StaticCatalog;
pub use clock::ManualClock;
pub use display::{DisplayCall, RecordingDisplay};
