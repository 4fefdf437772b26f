pub mod error;
pub mod redirect_location;
pub mod response;
pub mod traits;

pub use error::MiddlewareError;
pub use response::{write_error_response, ResponseCapture};
pub use traits::{Handler, HandlerFn, ResponseWriter};
