//! Authentication for the tao.app API.
//!
//! tao.app authenticates every request with a static key sent in the
//! `X-API-Key` header. This module keeps that key out of logs and lets the
//! caller decide where it comes from.

mod credentials;

pub use credentials::{
    API_KEY_ENV_VAR, API_KEY_HEADER, Credentials, CredentialsProvider, EnvCredentials,
    StaticCredentials,
};
