//! Command execution for the `dm-api` tool

use crate::{
    DmApi, KeycloakCredentials, Settings,
    cli::args::{Cli, Command},
    config::{self, ConfigLoader},
    types::{JobSpecification, StartJobOptions},
};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// What a command prints on success
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A DM API response, printed as pretty JSON
    Json(Value),
    /// Plain text
    Text(String),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Json(value) => {
                let text = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                write!(f, "{}", text)
            }
            Output::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Work out the settings for this invocation.
///
/// Precedence: defaults, configuration file, environment, command line.
/// The configuration file is `--config` or, if it exists, the default
/// `<config dir>/dm-api/config.toml`.
pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new().with_default_file(),
    };
    let mut settings = loader.load().context("Failed to load configuration")?;

    if let Some(url) = &cli.api_url {
        settings.api.url = Some(url.clone());
    }
    if cli.no_verify_ssl {
        settings.api.verify_ssl_cert = false;
    }
    if cli.verbose {
        settings.logging.verbose = true;
    }

    // The verification flag only reaches the endpoint together with a URL
    if !settings.api.verify_ssl_cert && settings.api.url.is_none() {
        bail!(
            "Disabling TLS certificate verification needs an API URL \
             (use --api-url, set SQUONK_API_URL or add one to the configuration file)"
        );
    }
    Ok(settings)
}

/// Run the command with settings from [`resolve_settings`], returning what
/// should be printed
pub async fn run(cli: &Cli, settings: Settings) -> Result<Output> {
    if let Some(url) = &settings.api.url {
        config::set_api_url_with_verify(url, settings.api.verify_ssl_cert)
            .with_context(|| format!("Invalid API URL ({})", url))?;
    }
    let api = DmApi::new().with_timeouts(settings.timeouts);

    let output = match &cli.command {
        Command::Config => {
            let endpoint = api.endpoint();
            Output::Text(format!(
                "url={}\nverify_ssl_cert={}",
                endpoint.url.as_deref().unwrap_or("(not set)"),
                endpoint.verify_ssl_cert
            ))
        }
        Command::Token {
            keycloak_url,
            realm,
            client_id,
            username,
            password,
            prior_token,
        } => {
            let credentials =
                KeycloakCredentials::new(keycloak_url, realm, client_id, username, password);
            let token = api
                .get_access_token(&credentials, prior_token.as_deref())
                .await
                .with_context(|| format!("Failed to get token from {}", keycloak_url))?;
            Output::Text(token)
        }
        Command::Ping => Output::Json(api.ping(token(cli)?).await?),
        Command::Version => Output::Json(api.get_version(token(cli)?).await?),
        Command::Projects => Output::Json(api.get_available_projects(token(cli)?).await?),
        Command::Project { project_id } => {
            Output::Json(api.get_project(token(cli)?, project_id).await?)
        }
        Command::CreateProject { name, product_id } => {
            Output::Json(api.create_project(token(cli)?, name, product_id).await?)
        }
        Command::DeleteProject { project_id } => {
            Output::Json(api.delete_project(token(cli)?, project_id).await?)
        }
        Command::Files {
            project_id,
            path,
            include_hidden,
        } => Output::Json(
            api.list_project_files(token(cli)?, project_id, path, *include_hidden)
                .await?,
        ),
        Command::Put {
            project_id,
            path,
            force,
            files,
        } => Output::Json(
            api.put_unmanaged_project_files(token(cli)?, project_id, files, path, *force)
                .await?,
        ),
        Command::Get {
            project_id,
            path,
            output,
            file,
        } => {
            let local_file = output.clone().unwrap_or_else(|| PathBuf::from(file));
            Output::Json(
                api.get_unmanaged_project_file(token(cli)?, project_id, file, &local_file, path)
                    .await?,
            )
        }
        Command::Rm {
            project_id,
            path,
            files,
        } => Output::Json(
            api.delete_unmanaged_project_files(token(cli)?, project_id, files, path)
                .await?,
        ),
        Command::Jobs => Output::Json(api.get_available_jobs(token(cli)?).await?),
        Command::Job { job_id } => Output::Json(api.get_job(token(cli)?, *job_id).await?),
        Command::JobByName {
            collection,
            name,
            version,
        } => Output::Json(
            api.get_job_by_name(token(cli)?, collection, name, version)
                .await?,
        ),
        Command::Start {
            project_id,
            name,
            spec,
            callback_url,
            callback_context,
            generate_callback_token,
            debug,
        } => {
            let specification: JobSpecification =
                serde_json::from_str(spec).context("Invalid job specification")?;
            let mut options =
                StartJobOptions::new().with_generate_callback_token(*generate_callback_token);
            if let Some(url) = callback_url {
                options = options.with_callback_url(url);
            }
            if let Some(context) = callback_context {
                options = options.with_callback_context(context);
            }
            if let Some(debug) = debug {
                options = options.with_debug(debug);
            }
            Output::Json(
                api.start_job_instance(token(cli)?, project_id, name, &specification, &options)
                    .await?,
            )
        }
        Command::Instance { instance_id } => {
            Output::Json(api.get_instance(token(cli)?, instance_id).await?)
        }
        Command::Instances { project_id } => {
            Output::Json(api.get_project_instances(token(cli)?, project_id).await?)
        }
        Command::DeleteInstance { instance_id } => {
            Output::Json(api.delete_instance(token(cli)?, instance_id).await?)
        }
        Command::Task {
            task_id,
            event_prior_ordinal,
            event_limit,
        } => Output::Json(
            api.get_task(token(cli)?, task_id, *event_prior_ordinal, *event_limit)
                .await?,
        ),
        Command::Admin {
            revoke,
            impersonate,
        } => Output::Json(
            api.set_admin_state(token(cli)?, !*revoke, impersonate.as_deref())
                .await?,
        ),
    };

    Ok(output)
}

/// The access token, which every DM API command needs
fn token(cli: &Cli) -> Result<&str> {
    cli.token
        .as_deref()
        .filter(|token| !token.is_empty())
        .context("An access token is required (use --token or set KEYCLOAK_TOKEN)")
}
