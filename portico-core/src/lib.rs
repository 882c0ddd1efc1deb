// Portico core: the request/response model the login flow runs against

pub mod error;
pub mod extensions;
pub mod http;

pub use error::{Error, Result};
pub use extensions::Extensions;
pub use http::{HttpRequest, HttpResponse, Json};
