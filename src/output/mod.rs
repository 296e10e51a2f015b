//! Output module: where crawl results go
//!
//! - [`PageSink`]: the persistence seam the crawler writes to
//! - [`SqliteSink`]: jobs, pages (with the full record as JSON) and issues
//! - [`MemorySink`]: keeps everything in memory

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemorySink;
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteSink;
pub use traits::{PageSink, SinkError, SinkResult};
