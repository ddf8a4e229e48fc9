//! Response type definitions
//!
//! The few DM API and Keycloak response shapes the client itself inspects.
//! Everything else is handed back to the caller as JSON.

use serde::{Deserialize, Serialize};

/// A file in a project directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// File name, without its path
    pub file_name: String,
}

/// Response to a project file listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFileList {
    /// Files on the requested path
    #[serde(default)]
    pub files: Vec<ProjectFile>,
}

impl ProjectFileList {
    /// Whether a file of the given name is present
    pub fn contains(&self, file_name: &str) -> bool {
        self.files.iter().any(|f| f.file_name == file_name)
    }
}

/// Application information, used to find the installed Job operator version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    /// Installed versions, latest first
    #[serde(default)]
    pub versions: Vec<String>,
}

/// Keycloak token endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token
    pub access_token: String,
}

/// Keycloak realm information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmInfo {
    /// The realm's public key, base64 DER without PEM armour
    pub public_key: String,
}

/// The access token claims the client needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the epoch
    pub exp: i64,
}
