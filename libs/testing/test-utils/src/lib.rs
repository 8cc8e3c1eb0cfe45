//! Shared test infrastructure
//!
//! Provides `TestNats`, a throwaway JetStream-enabled NATS broker per
//! test. Used by the job stream framework and the domain crates for
//! integration tests against a real broker.
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::TestNats;
//!
//! # async fn example() {
//! let nats = TestNats::new().await;
//! let jetstream = nats.jetstream();
//! // Create streams, publish, consume...
//! # }
//! ```

mod nats;

pub use nats::TestNats;
