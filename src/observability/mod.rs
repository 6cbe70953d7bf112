//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! container, dispatcher, modal:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stderr log output
//!     → optional Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Private keys never appear in log fields
//! - Every dispatch carries a UUID so its transactions can be correlated

pub mod logging;
pub mod metrics;
