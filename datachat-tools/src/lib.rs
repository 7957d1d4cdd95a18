pub mod sqlite_reader;
pub mod tool_error;
pub mod types;

pub use sqlite_reader::guard::{FilteredQuery, QuerySafetyFilter, SafetyRejection, DENYLIST};
pub use sqlite_reader::{ReadOnlyExecutor, SchemaIntrospector};
pub use tool_error::ToolError;
pub use types::{QueryResult, SchemaDescription, TableSchema};
