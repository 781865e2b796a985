//! GPIO controller adapter (client, HTTP transport, transport trait)

pub mod gpio;
pub mod http;
pub mod traits;

pub use gpio::GpioClient;
pub use http::HttpTransport;
pub use traits::*;
