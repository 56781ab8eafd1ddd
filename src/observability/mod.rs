//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch / session / http
//!     → logging.rs (tracing events with request_id / session_id fields)
//!     → metrics.rs (counters, gauges, histograms)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
