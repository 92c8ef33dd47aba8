pub mod domain;
pub mod backend;
pub mod telemetry;
pub mod http;

pub use domain::*;
pub use backend::*;
pub use telemetry::*;
pub use http::*;
