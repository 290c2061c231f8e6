pub mod common;
pub mod dashboard;
pub mod export;
pub mod stats;
pub mod transform;
pub mod validate;
