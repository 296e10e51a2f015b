//! State module for crawl jobs
//!
//! - `JobStatus`: the job lifecycle state machine

mod job_status;

pub use job_status::JobStatus;
