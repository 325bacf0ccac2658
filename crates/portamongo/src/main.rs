mod models;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portamongo::{CollectionService, MongoConnectionFactory, Provisioner};
use portamongo_core::config::{DeploymentLocation, MongoConfig, DEFAULT_MANAGEMENT_PORT};
use portamongo_core::provisioning::{ProvisioningError, DEFAULT_INITIAL_THROUGHPUT};

use crate::models::Blog;

/// Portamongo - Provision a MongoDB database on a local or managed-cloud deployment
#[derive(Parser, Debug)]
#[command(name = "portamongo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Name of the database to provision
    #[arg(
        long,
        short,
        default_value = "MyBlogsDatabase",
        env = "PORTAMONGO_DATABASE"
    )]
    database: String,

    /// Where the database is hosted (local or managed-cloud)
    #[arg(long, short, default_value = "local", env = "PORTAMONGO_LOCATION")]
    location: String,

    /// MongoDB connection string
    #[arg(long, short, env = "PORTAMONGO_CONNECTION_STRING")]
    connection_string: String,

    /// Throughput a managed-cloud database is created with
    #[arg(long, default_value_t = DEFAULT_INITIAL_THROUGHPUT, env = "PORTAMONGO_INITIAL_THROUGHPUT")]
    initial_throughput: u32,

    /// Port of the managed-cloud administrative endpoint
    #[arg(long, default_value_t = DEFAULT_MANAGEMENT_PORT, env = "PORTAMONGO_MANAGEMENT_PORT")]
    management_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portamongo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let location = cli
        .location
        .parse::<DeploymentLocation>()
        .map_err(ProvisioningError::from)?;
    let config = MongoConfig::new(&cli.database, location, &cli.connection_string)?
        .with_initial_throughput(cli.initial_throughput)?
        .with_management_port(cli.management_port)?;

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    tracing::info!(
        database = %config.database_name(),
        location = %config.location(),
        "Initializing services"
    );
    let factory = Arc::new(MongoConnectionFactory::new(config));
    let provisioner = Provisioner::new(factory.clone()).with_cancellation(shutdown.clone());
    let collections = CollectionService::new(factory).with_cancellation(shutdown);

    tracing::info!("Ensuring database is created");
    provisioner.ensure_database_created().await?;

    tracing::info!("Ensuring collections exist");
    collections.create_collection::<Blog>().await?;

    tracing::info!("Scaling throughput to the collection count");
    provisioner.scale_throughput().await?;

    let blogs = collections
        .get_collection::<Blog>()
        .await?
        .context("Blog collection is missing after creation")?;

    tracing::info!("Inserting a sample blog");
    blogs
        .insert_one(Blog::new(
            "My First Blog",
            "How to insert data in MongoDB",
            "insert_one",
        ))
        .await?;

    tracing::info!("Reading blogs back");
    let stored: Vec<Blog> = blogs.find(doc! {}).await?.try_collect().await?;
    println!("{}", serde_json::to_string_pretty(&stored)?);

    tracing::info!("Deleting blogs");
    for blog in &stored {
        if let Some(id) = blog.id {
            blogs.delete_one(doc! { "_id": id }).await?;
        }
    }

    tracing::info!("Done");
    Ok(())
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Interrupted, cancelling in-flight operations");
        token.cancel();
    }
}
