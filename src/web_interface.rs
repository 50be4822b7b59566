// Web Interface module root
pub mod docs;
pub mod rate_limit;
pub mod routes;
pub mod types;
pub mod validation;
pub mod web_server;

pub use rate_limit::RateLimiter;
pub use web_server::{listen_address, WebServer};
