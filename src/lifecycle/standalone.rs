use crate::client::ManagementClient;
use crate::config::LifecycleConfig;
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleCoordinator, shutdown_params};
use crate::lifecycle::operation::RestartOperation;
use crate::lifecycle::state;
use crate::lifecycle::wait::{WaitPoller, WaitTarget};
use crate::model::{Address, names};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle coordinator for a standalone server.
///
/// Every call acts on, and waits for, the root process only.
#[derive(Clone)]
pub struct StandaloneLifecycle {
    client: Arc<dyn ManagementClient>,
    config: LifecycleConfig,
    poller: WaitPoller,
}

impl StandaloneLifecycle {
    /// Create a new standalone coordinator
    pub fn new(client: Arc<dyn ManagementClient>, config: LifecycleConfig) -> Self {
        let poller = WaitPoller::new(&config);
        Self {
            client,
            config,
            poller,
        }
    }

    async fn wait(&self, reconnect_needed: bool) -> Result<()> {
        let client = self.client.as_ref();
        let root = &Address::root();
        self.poller
            .wait_until_responsive(
                client,
                WaitTarget::Standalone,
                reconnect_needed,
                self.config.timeout(),
                move || state::check_responsive(client, root, names::SERVER_STATE),
            )
            .await
            .into_result(self.config.timeout())
    }
}

#[async_trait]
impl LifecycleCoordinator for StandaloneLifecycle {
    #[tracing::instrument(skip(self, operation), fields(operation = %operation))]
    async fn is_required(&self, operation: &RestartOperation) -> Result<bool> {
        let result = self
            .client
            .read_attribute(&Address::root(), names::SERVER_STATE)
            .await?;
        result.assert_defined_value()?;

        let required = operation.is_required(&result, false);
        tracing::debug!(state = ?result.as_string(), required, "Checked server state");
        Ok(required)
    }

    #[tracing::instrument(skip(self, operation), fields(operation = %operation))]
    async fn perform(&self, operation: &RestartOperation) -> Result<()> {
        tracing::info!("Triggering operation on standalone server");
        let reconnect_needed = match operation
            .perform(self.client.as_ref(), &Address::root())
            .await
        {
            Ok(()) => false,
            Err(e) => {
                tracing::debug!(error = %e, "Trigger did not answer cleanly, will reconnect");
                true
            }
        };

        self.wait(reconnect_needed).await?;
        tracing::info!("Standalone server is running");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn wait_until_running(&self) -> Result<()> {
        self.wait(false).await
    }

    #[tracing::instrument(skip(self))]
    async fn shutdown(&self, timeout: Option<Duration>) -> Result<()> {
        let params = shutdown_params(timeout);

        tracing::info!("Shutting down standalone server");
        match self
            .client
            .invoke(names::SHUTDOWN, &Address::root(), params)
            .await
        {
            Ok(result) => result.assert_success(),
            Err(Error::Communication(msg)) => {
                tracing::debug!(error = %msg, "Channel closed by shutdown");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn config(&self) -> &LifecycleConfig {
        &self.config
    }
}
