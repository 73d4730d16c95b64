pub mod distribution;
pub mod format;
pub mod id;
pub mod weighted_selector;
