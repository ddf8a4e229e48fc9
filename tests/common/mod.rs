//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use dm_api::{ApiSettings, DmApi, Settings};
    use wiremock::MockServer;

    /// Base path of the mocked DM API
    pub const API_PATH: &str = "/data-manager-api";

    /// A valid-looking access token
    pub const TOKEN: &str = "test-access-token";

    /// Start a mock DM API and a client pinned to it
    pub async fn start_dm_api() -> (MockServer, DmApi) {
        let server = MockServer::start().await;
        let api = DmApi::with_settings(&create_test_settings(&server));
        (server, api)
    }

    /// Settings pointing at the mock server
    pub fn create_test_settings(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.api = ApiSettings::new(format!("{}{}", server.uri(), API_PATH));
        settings
    }

    /// Full mock path for a DM API endpoint
    pub fn api_path(endpoint: &str) -> String {
        format!("{}{}", API_PATH, endpoint)
    }
}

/// RS256 access tokens signed with a throw-away realm key
pub mod jwt {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use once_cell::sync::Lazy;
    use rsa::{RsaPrivateKey, pkcs1::EncodeRsaPrivateKey, pkcs8::EncodePublicKey};
    use serde_json::json;

    static REALM_KEY: Lazy<RsaPrivateKey> = Lazy::new(|| {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, 2048).expect("failed to generate private key")
    });

    /// The realm public key as Keycloak publishes it: base64 DER, no PEM armour
    pub fn realm_public_key() -> String {
        REALM_KEY
            .to_public_key()
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .unwrap()
            .lines()
            .filter(|line| !line.starts_with("-----"))
            .collect()
    }

    /// A token that expires `seconds` from now
    pub fn token_expiring_in(seconds: i64) -> String {
        let pem = REALM_KEY
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .unwrap();
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
        let claims = json!({
            "sub": "dmit-user",
            "exp": chrono::Utc::now().timestamp() + seconds,
        });
        encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
    }
}
