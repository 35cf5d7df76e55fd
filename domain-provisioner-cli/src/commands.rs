//! Sub-commands and their handlers.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};

use domain_provisioner_app::AppState;
use domain_provisioner_core::types::{
    DomainRequest, DomainRootFilter, DomainRootInput, DomainRootQuery, ServerRef,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage domain roots.
    Root {
        #[command(subcommand)]
        action: RootCommand,
    },
    /// Request a hostname for a server and provision it.
    Request(RequestArgs),
    /// Re-request a domain whose provisioning failed.
    Retry {
        domain_id: i64,
    },
    /// Run the provisioning job for one domain right away.
    Provision {
        domain_id: i64,
    },
    /// Show one server domain.
    Show {
        domain_id: i64,
    },
    /// List the domains bound to a server.
    Domains {
        server_id: i64,
    },
    /// List automated providers and their configuration fields.
    Providers,
}

#[derive(Subcommand, Debug)]
pub enum RootCommand {
    /// List roots.
    List(RootListArgs),
    /// Show one root.
    Show { id: i64 },
    /// Create a root.
    Add(RootArgs),
    /// Change a root. Omitted fields keep their current value.
    Update {
        id: i64,
        #[command(flatten)]
        fields: RootArgs,
    },
    /// Delete a root.
    Delete { id: i64 },
}

#[derive(Args, Debug)]
pub struct RootListArgs {
    #[arg(long)]
    page: Option<u64>,
    #[arg(long)]
    per_page: Option<u64>,
    /// Sort field, `-` prefix for descending (e.g. `-created_at`).
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    root_domain: Option<String>,
    #[arg(long)]
    provider: Option<String>,
    #[arg(long)]
    active: Option<bool>,
}

#[derive(Args, Debug)]
pub struct RootArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    root_domain: Option<String>,
    /// Provider id, `manual` when omitted on creation.
    #[arg(long)]
    provider: Option<String>,
    /// Provider setting as `key=value`; repeatable.
    #[arg(long = "config", value_name = "KEY=VALUE")]
    config: Vec<String>,
    #[arg(long)]
    active: Option<bool>,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    #[arg(long)]
    server_id: i64,
    /// Short server identifier, used when no subdomain is given.
    #[arg(long)]
    uuid_short: String,
    #[arg(long)]
    root_id: i64,
    #[arg(long)]
    subdomain: Option<String>,
    #[arg(long = "type")]
    domain_type: Option<String>,
    #[arg(long)]
    verification_method: Option<String>,
    #[arg(long)]
    verification_token: Option<String>,
}

pub async fn execute(state: &AppState, command: Command) -> Result<()> {
    match command {
        Command::Root { action } => execute_root(state, action).await,
        Command::Request(args) => {
            let server = ServerRef {
                id: args.server_id,
                uuid_short: args.uuid_short,
            };
            let request = DomainRequest {
                root_id: Some(args.root_id),
                subdomain: args.subdomain,
                domain_type: args.domain_type,
                verification_method: args.verification_method,
                verification_token: args.verification_token,
            };
            let Some(domain) = state
                .provisioning_service
                .request_provision(&server, Some(request))
                .await?
            else {
                bail!("nothing to request");
            };
            drain_queue(state).await;
            print_json(&state.ctx.find_domain(domain.id).await?)
        }
        Command::Retry { domain_id } => {
            state.provisioning_service.retry_provision(domain_id).await?;
            drain_queue(state).await;
            print_json(&state.ctx.find_domain(domain_id).await?)
        }
        Command::Provision { domain_id } => {
            state.provision_job.handle(domain_id).await?;
            print_json(&state.ctx.find_domain(domain_id).await?)
        }
        Command::Show { domain_id } => print_json(&state.ctx.find_domain(domain_id).await?),
        Command::Domains { server_id } => {
            print_json(&state.ctx.domain_repository.find_by_server(server_id).await?)
        }
        Command::Providers => print_json(&state.provider_metadata_service.list_providers()),
    }
}

async fn execute_root(state: &AppState, action: RootCommand) -> Result<()> {
    let roots = &state.domain_root_service;
    match action {
        RootCommand::List(args) => {
            let query = DomainRootQuery {
                page: args.page,
                per_page: args.per_page,
                filter: DomainRootFilter {
                    id: None,
                    name: args.name,
                    root_domain: args.root_domain,
                    provider: args.provider,
                    is_active: args.active,
                },
                sort: args.sort,
            };
            print_json(&roots.list(query).await?)
        }
        RootCommand::Show { id } => print_json(&roots.get(id).await?),
        RootCommand::Add(args) => {
            let input = DomainRootInput {
                name: args.name,
                root_domain: args.root_domain,
                provider: args.provider,
                provider_config: Some(parse_config(&args.config)?),
                is_active: args.active,
            };
            print_json(&roots.create(input).await?)
        }
        RootCommand::Update { id, fields } => {
            let current = roots.get(id).await?;
            let mut provider_config = current.provider_config;
            provider_config.extend(parse_config(&fields.config)?);
            let input = DomainRootInput {
                name: Some(fields.name.unwrap_or(current.name)),
                root_domain: Some(fields.root_domain.unwrap_or(current.root_domain)),
                provider: Some(fields.provider.unwrap_or(current.provider)),
                provider_config: Some(provider_config),
                is_active: Some(fields.active.unwrap_or(current.is_active)),
            };
            print_json(&roots.update(id, input).await?)
        }
        RootCommand::Delete { id } => {
            roots.delete(id).await?;
            println!("Deleted root {id}");
            Ok(())
        }
    }
}

async fn drain_queue(state: &AppState) {
    if let Some(mut worker) = state.take_worker().await {
        let processed = worker.run_pending().await;
        tracing::debug!("Processed {processed} provisioning job(s)");
    }
}

/// Parse `key=value` pairs. Values that read as JSON keep their type,
/// anything else is a string; an empty value clears the key.
fn parse_config(pairs: &[String]) -> Result<Map<String, Value>> {
    pairs
        .iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("expected KEY=VALUE, got `{pair}`"))?;
            let key = key.trim();
            if key.is_empty() {
                bail!("empty key in `{pair}`");
            }
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
            Ok((key.to_string(), value))
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
