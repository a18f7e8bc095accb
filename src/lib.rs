//! Weighted-average planning for Binary Pass (Pass/Fail) conversions.

pub mod average;
pub mod config;
pub mod eligibility;
pub mod input;
pub mod optimizer;
pub mod output;
pub mod planner;
pub mod server;
pub mod types;
pub mod validation;
