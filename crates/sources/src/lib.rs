pub mod aggregator;
pub mod cache;
pub mod codeforces;
pub mod contest_hive;
pub mod error;
pub mod fallback;
pub mod source;
