//! Credential hashing and bearer token adapters.

mod argon2_hasher;
mod jwt_token_issuer;
pub mod token_config;

pub use argon2_hasher::Argon2Hasher;
pub use jwt_token_issuer::JwtTokenIssuer;
pub use token_config::{
    BuildMode, TokenConfigError, TokenSettings, token_settings_from_env,
    token_settings_from_process_env,
};
