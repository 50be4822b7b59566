pub mod configuration;
pub mod controller;
pub mod data_source;
pub mod error_handling;
pub mod logging;
pub mod session_management;
pub mod web_interface;

pub use controller::Controller;
pub use session_management::SessionStatus;
