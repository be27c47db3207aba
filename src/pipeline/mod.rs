//! Change-detection pipeline.
//!
//! - `AdditionsDetector`: announce items a domain has not shown before
//! - `UpdatesDetector`: announce version bumps of tracked items
//! - `schedule::run`: drive either detector once or on an interval

pub mod additions;
pub mod changelog;
pub mod message;
pub mod report;
pub mod schedule;
pub mod updates;

pub use additions::{AdditionsDetector, AdditionsReport, run_additions};
pub use schedule::{Detector, RetryPolicy, RunMode};
pub use updates::{UpdatesDetector, UpdatesReport, run_updates};

/// Settings shared by both detectors.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Game domain to watch, e.g. `starfield`
    pub domain: String,
    /// Drop items flagged as adult content
    pub hide_adult: bool,
    /// Public website used for item links
    pub site_url: String,
}

impl WatchOptions {
    pub fn new(domain: impl Into<String>, hide_adult: bool, site_url: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            hide_adult,
            site_url: site_url.into(),
        }
    }
}
