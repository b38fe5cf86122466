//! Bearer tokens and the authorization gate

mod gate;
mod token;

pub use gate::{parse_bearer, AuthorizationGate};
pub use token::{
    Claims, SigningAlgorithm, TokenService, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS,
};
