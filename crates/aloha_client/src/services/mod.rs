pub mod association;
pub mod auth;
pub mod contracts;
pub mod resource;

pub use association::*;
pub use auth::AuthClient;
pub use contracts::*;
pub use resource::*;
