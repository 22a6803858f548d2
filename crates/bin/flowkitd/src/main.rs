//! # flowkitd: flowkit command-line runner
//!
//! Composition root that wires all adapters together and runs one command.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Build the entity service catalog and the entity loader
//! - Construct repositories and action components, injecting them via port traits
//! - Run the requested command
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod fixture;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use flowkit_adapter_storage_sqlite_sqlx::activity_type_repo::SqliteActivityTypeRepository;
use flowkit_adapter_storage_sqlite_sqlx::attribute_repo::SqliteAttributeRepository;
use flowkit_adapter_storage_sqlite_sqlx::entity_type_repo::SqliteEntityTypeRepository;
use flowkit_adapter_storage_sqlite_sqlx::group_member_repo::SqliteGroupMemberRepository;
use flowkit_adapter_storage_sqlite_sqlx::group_role_repo::SqliteGroupRoleRepository;
use flowkit_adapter_storage_sqlite_sqlx::pool::Config as DatabaseConfig;
use flowkit_adapter_storage_sqlite_sqlx::register_services;
use flowkit_adapter_storage_sqlite_sqlx::seed::Seeder;
use flowkit_adapter_template_handlebars::HandlebarsResolver;
use flowkit_app::actions::{ActionRunner, ActivateActivity, EntityTemplate, GroupMemberRoles};
use flowkit_app::loader::{EntityLoader, ServiceCatalog};
use flowkit_app::ports::EntityTypeRepository;
use flowkit_domain::entity_type::EntityType;
use flowkit_domain::id::{EntityTypeId, as_guid};
use flowkit_domain::workflow::Workflow;

use crate::config::Config;
use crate::fixture::Fixture;

#[derive(Debug, Parser)]
#[command(name = "flowkitd", version, about = "Run workflow actions and load entities")]
struct Cli {
    /// Config file (defaults to `flowkit.toml` when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every pending action of a workflow document.
    Run {
        /// Workflow JSON file.
        workflow: PathBuf,
        /// Where to write the updated workflow (stdout when omitted).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load one entity and print its fields as JSON.
    Load {
        /// Entity type name or guid.
        #[arg(long)]
        entity_type: String,
        #[arg(long)]
        guid: Uuid,
    },
    /// Import records from a JSON fixture file.
    Seed { fixture: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).context("parsing logging filter")?,
        )
        .with_writer(std::io::stderr)
        .init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .with_context(|| format!("opening database {}", config.database_url()))?;
    let pool = db.pool().clone();

    match cli.command {
        Command::Run { workflow, output } => {
            run_workflow(&config, pool, &workflow, output.as_deref()).await
        }
        Command::Load { entity_type, guid } => load_entity(&config, &pool, &entity_type, guid).await,
        Command::Seed { fixture } => seed(pool, &fixture).await,
    }
}

fn entity_loader(config: &Config, pool: &SqlitePool) -> EntityLoader {
    let builder = ServiceCatalog::builder()
        .with_excluded_namespaces(config.loader.excluded_namespaces.iter().cloned());
    let catalog = register_services(builder, pool).build();
    tracing::debug!(services = catalog.len(), "service catalog built");
    EntityLoader::new(Arc::new(catalog))
}

async fn run_workflow(
    config: &Config,
    pool: SqlitePool,
    path: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading workflow {}", path.display()))?;
    let mut workflow: Workflow = serde_json::from_str(&text)
        .with_context(|| format!("parsing workflow {}", path.display()))?;

    // Repositories
    let loader = entity_loader(config, &pool);
    let attributes = SqliteAttributeRepository::new(pool.clone());
    let entity_types = SqliteEntityTypeRepository::new(pool.clone());
    let activity_types = SqliteActivityTypeRepository::new(pool.clone());
    let members = SqliteGroupMemberRepository::new(pool.clone());
    let roles = SqliteGroupRoleRepository::new(pool);
    let templates = Arc::new(HandlebarsResolver::new());

    // Components
    let runner = ActionRunner::new(
        EntityTemplate::new(
            loader.clone(),
            attributes.clone(),
            entity_types,
            Arc::clone(&templates),
        ),
        ActivateActivity::new(activity_types, templates),
        GroupMemberRoles::new(loader, attributes, members, roles),
    );

    let report = runner
        .run(&mut workflow)
        .await
        .context("running workflow actions")?;
    for message in &report.error_messages {
        tracing::warn!(%message, "action reported an error");
    }

    let rendered = serde_json::to_string_pretty(&workflow)?;
    match output {
        Some(output) => tokio::fs::write(output, rendered)
            .await
            .with_context(|| format!("writing workflow {}", output.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

async fn load_entity(
    config: &Config,
    pool: &SqlitePool,
    entity_type: &str,
    guid: Uuid,
) -> anyhow::Result<()> {
    let repository = SqliteEntityTypeRepository::new(pool.clone());
    let known = match as_guid(entity_type) {
        Some(id) => repository.get_by_id(EntityTypeId::from_uuid(id)).await?,
        None => repository.get_by_name(entity_type).await?,
    };
    let target = match known {
        Some(target) => target,
        None => EntityType::builder().name(entity_type).build()?,
    };

    let loader = entity_loader(config, pool);
    match loader.try_load_entity(&target, guid).await {
        Ok(entity) => println!("{}", serde_json::to_string_pretty(&entity.fields)?),
        Err(err) => {
            tracing::info!(entity_type = %target.name, %guid, reason = %err, "entity not found");
            println!("null");
        }
    }
    Ok(())
}

async fn seed(pool: SqlitePool, path: &Path) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading fixture {}", path.display()))?;
    let fixture: Fixture = serde_json::from_str(&text)
        .with_context(|| format!("parsing fixture {}", path.display()))?;
    if fixture.is_empty() {
        tracing::warn!(path = %path.display(), "fixture has no records");
        return Ok(());
    }
    fixture
        .apply(&Seeder::new(pool))
        .await
        .context("importing fixture")?;
    tracing::info!(records = fixture.len(), "fixture imported");
    Ok(())
}
