pub mod driver;
pub mod types;

pub use driver::{Driver, DriverResponse};
pub use types::MiddlewarePool;
