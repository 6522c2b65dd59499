//! External services the wizard talks to.
//!
//! The waitlist registration contract, its HTTP client and in-process
//! registry, plus the fire-and-forget analytics sinks.

pub mod analytics;
pub mod http;
pub mod registry;
pub mod waitlist;

pub use analytics::{AnalyticsSink, NoopSink, ScrollDepthTracker, TracingSink};
pub use http::HttpWaitlistClient;
pub use registry::{WaitlistEntry, WaitlistRegistry};
pub use waitlist::{SubmissionResult, WaitlistError, WaitlistService, DUPLICATE_EMAIL_ERROR};
