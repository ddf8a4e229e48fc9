//! Command line arguments for the `dm-api` tool

use crate::client::TEST_PRODUCT_ID;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Data Manager API command line client
#[derive(Parser, Debug)]
#[command(name = "dm-api", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// DM API URL, e.g. https://example.com/data-manager-api (overrides SQUONK_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Disable TLS certificate verification
    #[arg(long, global = true)]
    pub no_verify_ssl: bool,

    /// DM API access token
    #[arg(long, global = true, env = "KEYCLOAK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// `dm-api` sub-commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the DM API URL and TLS verification flag in use
    Config,

    /// Get an access token from Keycloak and print it
    Token {
        /// Keycloak URL, e.g. https://example.com/auth
        #[arg(short = 'k', long)]
        keycloak_url: String,
        /// Keycloak realm
        #[arg(short = 'r', long)]
        realm: String,
        /// Keycloak DM API client ID
        #[arg(short = 'i', long)]
        client_id: String,
        /// User name
        #[arg(long, env = "DMAPI_USERNAME")]
        username: String,
        /// User password
        #[arg(long, env = "DMAPI_PASSWORD", hide_env_values = true)]
        password: String,
        /// Return this token if it still has time left
        #[arg(long)]
        prior_token: Option<String>,
    },

    /// Check the DM API is responding
    Ping,

    /// Show the DM API version
    Version,

    /// List the projects available to you
    Projects,

    /// Show a project
    Project { project_id: String },

    /// Create a project
    CreateProject {
        /// Project name
        name: String,
        /// Account Server tier product ID
        #[arg(long, default_value = TEST_PRODUCT_ID)]
        product_id: String,
    },

    /// Delete a project
    DeleteProject { project_id: String },

    /// List the files on a project path
    Files {
        #[arg(long)]
        project_id: String,
        #[arg(long, default_value = "/")]
        path: String,
        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,
    },

    /// Upload local files to a project path
    Put {
        #[arg(long)]
        project_id: String,
        #[arg(long, default_value = "/")]
        path: String,
        /// Over-write files that already exist
        #[arg(long)]
        force: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Download a file from a project path
    Get {
        #[arg(long)]
        project_id: String,
        #[arg(long, default_value = "/")]
        path: String,
        /// Write to this file (defaults to the project file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
        file: String,
    },

    /// Delete files from a project path
    Rm {
        #[arg(long)]
        project_id: String,
        #[arg(long, default_value = "/")]
        path: String,
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// List the available jobs
    Jobs,

    /// Show a job by its numeric ID
    Job { job_id: u64 },

    /// Show a job by collection, name and version
    JobByName {
        collection: String,
        name: String,
        version: String,
    },

    /// Start a job instance
    Start {
        #[arg(long)]
        project_id: String,
        /// Instance name
        #[arg(long)]
        name: String,
        /// Job specification (JSON), e.g.
        /// '{"collection": "im-test", "job": "nop", "version": "1.0.0"}'
        #[arg(long)]
        spec: String,
        #[arg(long)]
        callback_url: Option<String>,
        #[arg(long)]
        callback_context: Option<String>,
        #[arg(long)]
        generate_callback_token: bool,
        /// Keep the instance after it finishes
        #[arg(long)]
        debug: Option<String>,
    },

    /// Show an instance
    Instance { instance_id: String },

    /// List the instances in a project
    Instances {
        #[arg(long)]
        project_id: String,
    },

    /// Delete an instance
    DeleteInstance { instance_id: String },

    /// Show a task and its events
    Task {
        task_id: String,
        #[arg(long, default_value_t = 0)]
        event_prior_ordinal: u64,
        #[arg(long, default_value_t = 0)]
        event_limit: u64,
    },

    /// Become (or stop being) an administrator
    Admin {
        /// Drop the admin state instead of taking it
        #[arg(long)]
        revoke: bool,
        /// Switch to this user
        #[arg(long)]
        impersonate: Option<String>,
    },
}
