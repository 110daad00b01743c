//! Human-readable order numbers of the form `PREFIX-YYYYMMDD-NNNNN`.
//!
//! The counter restarts at 1 whenever the reference date changes. The date is
//! taken in a fixed UTC offset so every process agrees on when a day ends.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;
use tracing::{debug, warn};

/// Highest counter value that fits the five-digit field.
pub const MAX_DAILY_SEQUENCE: u32 = 99_999;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SequenceError {
    #[error("All {max} order numbers for {date_key} have been issued", max = MAX_DAILY_SEQUENCE)]
    Exhausted { date_key: String },
}

#[derive(Debug, Default)]
struct SequenceState {
    date_key: String,
    counter: u32,
}

/// Issues unique order numbers. Safe to share between tasks.
pub struct SequenceAllocator {
    prefix: String,
    offset: FixedOffset,
    clock: Box<dyn Fn() -> DateTime<Utc> + Send + Sync>,
    state: Mutex<SequenceState>,
}

impl SequenceAllocator {
    pub fn new(prefix: impl Into<String>, offset: FixedOffset) -> Self {
        Self::with_clock(prefix, offset, Utc::now)
    }

    pub fn with_clock(
        prefix: impl Into<String>,
        offset: FixedOffset,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            offset,
            clock: Box::new(clock),
            state: Mutex::new(SequenceState::default()),
        }
    }

    /// Returns the next order number.
    ///
    /// # Errors
    /// Fails with [`SequenceError::Exhausted`] once 99 999 numbers have been
    /// issued for the current date; the counter is left untouched.
    pub fn next(&self) -> Result<String, SequenceError> {
        // Clock read, date check, reset and increment happen under one lock.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let date_key = (self.clock)()
            .with_timezone(&self.offset)
            .format("%Y%m%d")
            .to_string();
        if state.date_key != date_key {
            if !state.date_key.is_empty() {
                debug!(previous = %state.date_key, current = %date_key, "Order number date rolled over");
            }
            state.date_key = date_key;
            state.counter = 0;
        }
        if state.counter >= MAX_DAILY_SEQUENCE {
            warn!(date_key = %state.date_key, "Order number sequence exhausted");
            return Err(SequenceError::Exhausted {
                date_key: state.date_key.clone(),
            });
        }
        state.counter += 1;

        Ok(format!("{}-{}-{:05}", self.prefix, state.date_key, state.counter))
    }
}
