//! Platform-agnostic reconnect logic for the event feed connection.
//!
//! This is deliberately free of any runtime dependencies (no tokio, no sockets).
//! The client owns the actual socket and drives this state machine, so the
//! backoff sequence can be tested without opening a transport.

use std::time::Duration;

// Reconnection constants
pub const INITIAL_RETRY_DELAY_MS: u64 = 1_000;
pub const MAX_RETRY_DELAY_MS: u64 = 30_000;
pub const BACKOFF_MULTIPLIER: u64 = 2;

/// Connection state as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    /// Transport closed; `retry_delay_ms` is set once a reconnect is scheduled
    Disconnected { retry_delay_ms: Option<u64> },
}

impl ConnectionState {
    pub fn status_text(&self) -> String {
        match self {
            ConnectionState::Connecting => "WS: connecting".to_string(),
            ConnectionState::Connected => "WS: connected".to_string(),
            ConnectionState::Disconnected {
                retry_delay_ms: None,
            } => "WS: disconnected".to_string(),
            ConnectionState::Disconnected {
                retry_delay_ms: Some(ms),
            } => {
                let secs = (*ms as f64 / 1000.0).round() as u64;
                format!("WS: reconnecting in {secs}s")
            }
        }
    }
}

/// Capped exponential backoff. Never exhausts: once the cap is reached every
/// further attempt waits the cap.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackoffState {
    attempts: u32,
}

impl BackoffState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay for the given zero-based attempt: `min(30s, 1s × 2^attempt)`.
    pub fn delay_for(attempt: u32) -> u64 {
        BACKOFF_MULTIPLIER
            .checked_pow(attempt)
            .and_then(|factor| INITIAL_RETRY_DELAY_MS.checked_mul(factor))
            .map_or(MAX_RETRY_DELAY_MS, |delay| delay.min(MAX_RETRY_DELAY_MS))
    }

    /// Returns the delay to wait before the next attempt and advances the counter.
    pub fn next_delay_and_advance(&mut self) -> u64 {
        let delay = Self::delay_for(self.attempts);
        self.attempts = self.attempts.saturating_add(1);
        delay
    }
}

/// Lifecycle phase of the reconnect loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Idle,
    Connecting,
    Connected,
    /// Waiting out the delay before attempt `n` (1-based)
    Backoff(u32),
}

/// Explicit reconnect state machine.
///
/// `Idle → Connecting → (Connected →) Backoff(n) → Connecting → ...`
/// A successful open resets the backoff; the timer firing is the only way out
/// of `Backoff`.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectMachine {
    phase: ConnectionPhase,
    backoff: BackoffState,
}

impl Default for ReconnectMachine {
    fn default() -> Self {
        Self {
            phase: ConnectionPhase::Idle,
            backoff: BackoffState::default(),
        }
    }
}

impl ReconnectMachine {
    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// Start an attempt (from `Idle`, or when the backoff timer fires).
    pub fn begin_connect(&mut self) -> ConnectionState {
        self.phase = ConnectionPhase::Connecting;
        ConnectionState::Connecting
    }

    /// The transport opened.
    pub fn on_open(&mut self) -> ConnectionState {
        self.backoff.reset();
        self.phase = ConnectionPhase::Connected;
        ConnectionState::Connected
    }

    /// The transport closed or failed to open. Returns the published state and
    /// how long to wait before the next attempt.
    pub fn on_close(&mut self) -> (ConnectionState, Duration) {
        let delay = self.backoff.next_delay_and_advance();
        self.phase = ConnectionPhase::Backoff(self.backoff.attempts());
        (
            ConnectionState::Disconnected {
                retry_delay_ms: Some(delay),
            },
            Duration::from_millis(delay),
        )
    }

    /// The backoff timer fired.
    pub fn on_timer(&mut self) -> ConnectionState {
        self.begin_connect()
    }
}
