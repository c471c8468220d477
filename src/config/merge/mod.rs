//! Config composition: defaults, file layers and environment overlay.

pub mod merge_policy;
pub mod service;
