pub mod http;
pub mod services;

pub use http::client::{build_http_client, AlohaApiClient, RequestType};
pub use http::routes::Routes;
pub use services::*;
