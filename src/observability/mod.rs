//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! explorer clients, config loader, dispatcher
//!     → tracing events (chain, endpoint, status; never API keys)
//!     → logging.rs subscriber (EnvFilter + fmt layer)
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of interpolated messages
//! - `RUST_LOG` overrides the configured level
//! - stdout is reserved for rendered summaries

pub mod logging;
