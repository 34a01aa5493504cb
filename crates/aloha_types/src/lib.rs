pub mod auth;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod query;
pub mod table;
pub mod timestamp;

pub use auth::*;
pub use forms::*;
pub use models::*;
pub use pagination::*;
pub use query::*;
pub use table::*;
pub use timestamp::Timestamp;
