//! Database provisioning and throughput scaling.
//!
//! Run once at startup, in this order:
//!
//! 1. [`Provisioner::ensure_database_created`]
//! 2. create collections through the collection service
//! 3. [`Provisioner::scale_throughput`]

mod local;
mod managed_cloud;
mod strategy;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use portamongo_core::config::DeploymentLocation;
use portamongo_core::provisioning::{ConnectionFactory, ProvisioningError, Result, ScaleOutcome};

use crate::cancel::run_cancellable;

pub use local::LocalProvisioning;
pub use managed_cloud::ManagedCloudProvisioning;
pub use strategy::{strategy_for, ProvisioningStrategy};

/// Provisioning service for the configured database.
pub struct Provisioner<F: ConnectionFactory> {
    factory: Arc<F>,
    strategy: Box<dyn ProvisioningStrategy<F>>,
    cancellation: CancellationToken,
}

impl<F: ConnectionFactory + 'static> Provisioner<F> {
    pub fn new(factory: Arc<F>) -> Self {
        let strategy = strategy_for(factory.config().location());
        Self {
            factory,
            strategy,
            cancellation: CancellationToken::new(),
        }
    }

    /// Aborts in-flight calls once `token` is cancelled.
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self {
            cancellation: token,
            ..self
        }
    }

    pub fn location(&self) -> DeploymentLocation {
        self.factory.config().location()
    }

    /// Creates the database if the location needs an explicit creation step.
    ///
    /// Idempotent. A local deployment only resolves a handle.
    #[tracing::instrument(
        skip(self),
        fields(
            database = %self.factory.config().database_name(),
            location = %self.location()
        )
    )]
    pub async fn ensure_database_created(&self) -> Result<()> {
        run_cancellable(
            &self.cancellation,
            self.strategy.ensure_database_created(&self.factory),
            || ProvisioningError::Cancelled("ensure_database_created"),
        )
        .await
    }

    /// Sets throughput to `max(400, collections * 100)` on managed deployments.
    ///
    /// Missing databases, collections or offers are not errors; they come
    /// back as the matching [`ScaleOutcome`].
    #[tracing::instrument(
        skip(self),
        fields(
            database = %self.factory.config().database_name(),
            location = %self.location()
        )
    )]
    pub async fn scale_throughput(&self) -> Result<ScaleOutcome> {
        let outcome = run_cancellable(
            &self.cancellation,
            self.strategy.scale_throughput(&self.factory),
            || ProvisioningError::Cancelled("scale_throughput"),
        )
        .await?;

        if outcome.is_scaled() {
            tracing::info!("{}", outcome.describe());
        } else {
            tracing::debug!("{}", outcome.describe());
        }
        Ok(outcome)
    }
}
