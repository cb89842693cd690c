//! Test harness utilities for connection integration tests.
//!
//! Provides connected pairs of wrapped streams and an event recorder that
//! turns handler invocations into a channel the test can await.

#![allow(dead_code)]

mod events;
mod pair;

pub use events::{Event, Events};
pub use pair::{duplex_pair, tcp_pair};

use std::time::Duration;

/// Upper bound for any single wait in a test.
pub const TIMEOUT: Duration = Duration::from_secs(5);
