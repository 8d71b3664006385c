pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::SQLError;
pub use sqlite::{ConnectionTarget, SqliteStore};
pub use traits::{Row, SQLStore, Value};
