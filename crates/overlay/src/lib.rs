//! Stream Overlay Client
//!
//! Receive-only overlay for a live stream: consumes the backend's event feed
//! and turns it into notices, sound effects, speech and two live lists
//! (quests and call requests).
//!
//! ## Architecture
//!
//! - `ports`: traits the core needs from the platform (audio, speech,
//!   display, clock, catalog)
//! - `application`: the synchronous overlay core (routing, cooldowns, sound
//!   cache, view state)
//! - `infrastructure`: adapters (rodio, eSpeak NG, terminal, reqwest,
//!   tokio-tungstenite) and the async bridge

pub mod application;
pub mod infrastructure;
pub mod ports;
