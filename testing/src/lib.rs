//! # EzraTask Testing
//!
//! Testing utilities and helpers for EzraTask.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - Fixture builders for create requests
//! - Property-based testing strategies for domain inputs
//!
//! ## Example
//!
//! ```
//! use ezratask_core::environment::Clock;
//! use ezratask_testing::SteppingClock;
//!
//! let clock = SteppingClock::default();
//! let first = clock.now();
//! assert!(clock.now() > first);
//! ```

use chrono::{DateTime, Duration, Utc};
use ezratask_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ezratask_testing::mocks::FixedClock;
    /// use ezratask_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every read.
    ///
    /// The first read returns the start time. Useful wherever ordering by
    /// timestamp must be observable without sleeping.
    #[derive(Debug)]
    pub struct SteppingClock {
        start: DateTime<Utc>,
        step: Duration,
        ticks: AtomicI64,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` and advancing by `step`
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                start,
                step,
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Default for SteppingClock {
        /// Starts at 2025-01-01 00:00:00 UTC and steps one second.
        fn default() -> Self {
            Self::new(epoch(), Duration::seconds(1))
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            self.start + self.step * i32::try_from(tick).unwrap_or(i32::MAX)
        }
    }

    /// 2025-01-01 00:00:00 UTC
    #[must_use]
    pub fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(epoch())
    }
}

/// Test helpers and fixtures.
pub mod helpers {
    use ezratask_core::todo::{NewTodo, Priority};

    /// A description of exactly `len` characters.
    #[must_use]
    pub fn description_of_len(len: usize) -> String {
        "x".repeat(len)
    }

    /// A create request with the given description and priority.
    #[must_use]
    pub fn new_todo(description: &str, priority: Priority) -> NewTodo {
        NewTodo::new(description).with_priority(priority)
    }

    /// Install a test-friendly tracing subscriber once per process.
    ///
    /// Honors `RUST_LOG`; output is captured by the test harness.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use ezratask_core::todo::Priority;
    use proptest::prelude::*;

    /// Descriptions whose trimmed length is within 3..=1000 characters.
    pub fn valid_description() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9][a-zA-Z0-9 ]{1,997}[a-zA-Z0-9]"
    }

    /// Descriptions whose trimmed length is below the minimum.
    pub fn short_description() -> impl Strategy<Value = String> {
        " {0,4}[a-z]{0,2} {0,4}"
    }

    /// Any priority.
    pub fn priority() -> impl Strategy<Value = Priority> {
        prop::sample::select(Priority::ALL.to_vec())
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, epoch, test_clock};
