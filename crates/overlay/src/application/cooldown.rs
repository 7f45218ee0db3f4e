//! Per-ability cooldown gate.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ports::outbound::ClockPort;

/// Cooldown applied when a fire carries no usable `cooldown_ms`.
pub const DEFAULT_COOLDOWN_MS: u64 = 3_000;

/// Ledger of "not before" timestamps keyed by ability id.
///
/// An absent entry means the ability is ready. Entries are only written on a
/// permitted fire and are never swept; the key space is bounded by the catalog.
pub struct CooldownGate {
    clock: Arc<dyn ClockPort>,
    ledger: HashMap<String, u64>,
}

impl CooldownGate {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            clock,
            ledger: HashMap::new(),
        }
    }

    /// Returns true (and arms the cooldown) if `ability_id` may fire now.
    ///
    /// Denial leaves the ledger untouched.
    pub fn try_fire(&mut self, ability_id: &str, cooldown_ms: f64) -> bool {
        let now = self.clock.now_millis();
        let not_before = self.ledger.get(ability_id).copied().unwrap_or(0);
        if now < not_before {
            tracing::trace!(ability_id, remaining_ms = not_before - now, "ability on cooldown");
            return false;
        }

        let cooldown = normalize_cooldown(cooldown_ms);
        self.ledger
            .insert(ability_id.to_string(), now.saturating_add(cooldown));
        true
    }

    /// Absolute timestamp before which `ability_id` is denied, if armed.
    pub fn not_before(&self, ability_id: &str) -> Option<u64> {
        self.ledger.get(ability_id).copied()
    }
}

fn normalize_cooldown(cooldown_ms: f64) -> u64 {
    if !cooldown_ms.is_finite() {
        return DEFAULT_COOLDOWN_MS;
    }
    cooldown_ms.max(0.0) as u64
}
