//! Token Management
//!
//! Client-credentials token acquisition and the per-client token cache.

mod cache;
mod clock;
mod flow;
mod types;

pub use cache::TokenCache;
pub use clock::{Clock, SystemClock};
pub use flow::{ClientCredentialsFlow, ClientCredentialsFlowImpl};
pub use types::{AccessToken, TokenResponse};
