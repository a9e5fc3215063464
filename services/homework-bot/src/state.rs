//! Poll cursor and the memory used to suppress repeated notifications

/// Number of consecutive failed ticks after which a warning is logged
pub const FAILURE_WARN_THRESHOLD: u32 = 5;

/// Transient state owned by the engine; reset on every process start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// Unix seconds passed as `from_date` on the next fetch
    pub cursor: i64,
    /// Last status text that was actually delivered
    pub last_message: Option<String>,
    /// Identity of the last failure a notice was attempted for
    pub latest_error: Option<String>,
    pub consecutive_failures: u32,
}

impl PollState {
    /// Start one retry period in the past so the first poll covers one interval
    pub fn new(start_epoch_secs: i64, retry_period_secs: u64) -> Self {
        let retry = i64::try_from(retry_period_secs).unwrap_or(i64::MAX);
        Self {
            cursor: start_epoch_secs.saturating_sub(retry),
            last_message: None,
            latest_error: None,
            consecutive_failures: 0,
        }
    }

    /// Whether `message` differs from the last delivered status text
    pub fn is_new_message(&self, message: &str) -> bool {
        self.last_message.as_deref() != Some(message)
    }

    pub fn record_message(&mut self, message: String) {
        self.last_message = Some(message);
    }

    /// Whether a failure with this identity has not been reported yet
    pub fn is_new_error(&self, identity: &str) -> bool {
        self.latest_error.as_deref() != Some(identity)
    }

    pub fn record_error(&mut self, identity: String) {
        self.latest_error = Some(identity);
    }

    /// Move the cursor after a successful tick. Returns the previous value
    pub fn advance_cursor(&mut self, current_date: i64) -> i64 {
        let previous = self.cursor;
        if current_date < previous {
            tracing::warn!(
                "Server current_date {} is behind the cursor {}",
                current_date,
                previous
            );
        }
        self.cursor = current_date;
        previous
    }

    /// Count a failed tick, returning the new streak length
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    /// Reset the failure streak, returning how long it was
    pub fn record_success(&mut self) -> u32 {
        std::mem::take(&mut self.consecutive_failures)
    }
}
