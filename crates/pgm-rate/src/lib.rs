#![no_std]

extern crate alloc;

mod bucket;
mod config;
mod resolution;

pub use bucket::RateBucket;
pub use config::RateConfig;
pub use resolution::{Resolution, MILLISECOND_TPDU_MULTIPLE};
