//! Type definitions for the DM API client
//!
//! This module contains the data structures used for requests and responses.

pub mod request;
pub mod response;

pub use request::{JobSpecification, StartJobOptions};
pub use response::{
    ApplicationInfo, ProjectFile, ProjectFileList, RealmInfo, TokenClaims, TokenResponse,
};
