//! Stream Overlay Protocol - wire types for the overlay event feed
//!
//! This crate contains the types the backend pushes to overlay clients:
//! - The `{ type, data }` event envelope and its typed payloads
//! - The ability/quest catalog served at `/api/catalog`
//! - Lenient field decoders for the loosely-typed JSON the backend emits
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, and thiserror
//! 2. **No business logic** - Pure data types and decoding
//! 3. **Tolerant decoding** - Payload fields never fail a decode; unusable
//!    values collapse to `None` (or NaN for numbers) and callers apply defaults

pub mod catalog;
pub mod lenient;
pub mod messages;

pub use catalog::{Catalog, CatalogAbility, CatalogQuest};
pub use messages::{
    decode, AbilityFireData, DecodeError, DonationData, InboundMessage, QuestData, RemoveData,
    RequestData, TtsPlayData,
};
