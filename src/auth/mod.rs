//! Authentication for the DM API
//!
//! DM API calls are authorised with Keycloak access tokens. This module
//! obtains them and avoids asking Keycloak again while a prior token is
//! still good.

pub mod keycloak;

pub use keycloak::{AccessTokenProvider, KeycloakCredentials, PRIOR_TOKEN_MIN_REMAINING_S};
