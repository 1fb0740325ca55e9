//! Transport
//!
//! Generic HTTP transport and the bearer-token wrapper around it.

mod authenticated;
mod http;

pub use authenticated::AuthenticatedTransport;
pub use http::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestHttpTransport,
    DEFAULT_MAX_RESPONSE_SIZE,
};
