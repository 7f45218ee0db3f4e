//! Application layer: the overlay core.
//!
//! Everything here is synchronous and owned by a single task. Ports are
//! injected through [`OverlayDeps`], so tests can build a fresh context with
//! fakes.

pub mod audio;
pub mod catalog;
pub mod context;
pub mod cooldown;
pub mod router;
pub mod speech;
pub mod view_state;

pub use audio::{AudioEntry, AudioScheduler, DEFAULT_VOLUME, FALLBACK_TONE};
pub use context::{OverlayContext, OverlayDeps};
pub use cooldown::{CooldownGate, DEFAULT_COOLDOWN_MS};
pub use router::EventRouter;
pub use speech::SpeechAnnouncer;
pub use view_state::{ViewItem, ViewStateMap};
