pub mod backend;
pub mod http;
pub mod types;

pub use backend::ChatBackend;
pub use http::HttpBackend;
