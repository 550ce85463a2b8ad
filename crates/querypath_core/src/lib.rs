//! Query/command object dispatch for querypath.
//! Callers reach persistence only through prebuilt objects executed by a
//! repository bound to one data context.

pub mod db;
pub mod logging;
pub mod memory;
pub mod object;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use memory::InMemoryContext;
pub use object::func::{CommandFn, QueryFn, ScalarFn};
pub use object::sql::{SqlCommand, SqlQuery, SqlScalar};
pub use object::{Command, Query, ScalarQuery};
pub use repo::context_repo::{ContextRepository, RepoError, RepoResult, Repository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
