//! Infrastructure layer: adapters implementing the outbound ports, plus the
//! async plumbing that feeds the overlay core.

pub mod audio;
pub mod bridge;
pub mod catalog_http;
pub mod clock;
pub mod config;
pub mod display;
pub mod speech;
pub mod testing;
pub mod websocket;

pub use audio::RodioAudio;
pub use catalog_http::HttpCatalog;
pub use clock::SystemClock;
pub use config::{ConfigError, OverlayConfig};
pub use display::TerminalDisplay;
pub use speech::EspeakSpeech;
