pub mod error;
pub mod handlers;
pub mod queries;
pub mod repository;
pub mod router;
pub mod server;
pub mod terms;

#[cfg(test)]
mod fixtures;

pub use error::{ApiError, Result};
pub use repository::{DateWindow, FinanceRepository, SqliteFinanceRepository};
pub use router::create_router;
pub use server::{init_tracing, run_server};
