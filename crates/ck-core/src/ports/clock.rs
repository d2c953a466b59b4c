pub trait ClockPort: Send + Sync {
    /// Unix epoch milliseconds.
    fn now_ms(&self) -> i64;
}
