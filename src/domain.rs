//! Domain layer - entities and job state
//!
//! Core data types of the crawl pipeline: seed rows loaded from the input
//! table, extracted product records, and in-memory job state.

pub mod job;
pub mod product;
pub mod seed;

pub use job::{JobRegistry, JobState, JobStatus};
pub use product::{FailureRecord, ProductRecord};
pub use seed::{MergeError, SeedTable, MASTER_COLUMN, SEARCH_LINK_COLUMN};
