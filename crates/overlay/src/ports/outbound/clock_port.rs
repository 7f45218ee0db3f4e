//! Monotonic time for cooldown bookkeeping.

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    /// Milliseconds on a monotonic clock. Only differences are meaningful.
    fn now_millis(&self) -> u64;
}
