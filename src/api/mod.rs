pub mod client;
pub mod error;
pub mod types;

pub use client::{BriefApiClient, JobApi};
pub use error::ApiError;
pub use types::{BriefResult, JobStatus, StatusSnapshot};
