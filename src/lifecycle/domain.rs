use crate::client::{ManagementClient, read_children_names};
use crate::config::LifecycleConfig;
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleCoordinator, shutdown_params};
use crate::lifecycle::operation::RestartOperation;
use crate::lifecycle::state;
use crate::lifecycle::wait::{WaitPoller, WaitTarget};
use crate::model::{Address, Batch, Values, names};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle coordinator for a managed domain.
///
/// Operations target a host controller and the servers it supervises. The set of
/// running servers is discovered afresh on every call, since servers are started and
/// stopped independently between calls. Through [`LifecycleCoordinator`] the
/// coordinator acts on its default host.
///
/// # Examples
///
/// ```no_run
/// use mgmt_admin::client::ManagementClient;
/// use mgmt_admin::config::LifecycleConfig;
/// use mgmt_admin::lifecycle::{DomainLifecycle, RestartOperation};
/// use std::sync::Arc;
///
/// # async fn example(client: Arc<dyn ManagementClient>) -> mgmt_admin::Result<()> {
/// let domain = DomainLifecycle::new(client, "master", LifecycleConfig::default());
///
/// if domain.is_required_on_host("master", &RestartOperation::Reload).await? {
///     domain.perform_on_host("master", &RestartOperation::Reload).await?;
/// }
/// domain.restart_server("master", "server-one").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DomainLifecycle {
    client: Arc<dyn ManagementClient>,
    default_host: String,
    config: LifecycleConfig,
    poller: WaitPoller,
}

impl DomainLifecycle {
    /// Create a new domain coordinator acting on `default_host` by default
    pub fn new(
        client: Arc<dyn ManagementClient>,
        default_host: impl Into<String>,
        config: LifecycleConfig,
    ) -> Self {
        let poller = WaitPoller::new(&config);
        Self {
            client,
            default_host: default_host.into(),
            config,
            poller,
        }
    }

    /// Host controller targeted through [`LifecycleCoordinator`]
    pub fn default_host(&self) -> &str {
        &self.default_host
    }

    /// Names of all host controllers in the domain
    #[tracing::instrument(skip(self))]
    pub async fn hosts(&self) -> Result<Vec<String>> {
        read_children_names(self.client.as_ref(), &Address::root(), names::HOST).await
    }

    /// Names of all servers configured under `host`, started or not
    #[tracing::instrument(skip(self))]
    pub async fn configured_servers(&self, host: &str) -> Result<Vec<String>> {
        self.ensure_host(host).await?;
        read_children_names(
            self.client.as_ref(),
            &Address::host(host),
            names::SERVER_CONFIG,
        )
        .await
    }

    /// Names of the servers under `host` whose configuration status is `STARTED`
    #[tracing::instrument(skip(self))]
    pub async fn running_servers(&self, host: &str) -> Result<Vec<String>> {
        let mut running = Vec::new();
        for server in self.configured_servers(host).await? {
            let status = self
                .client
                .read_attribute(&server_config_address(host, &server), names::STATUS)
                .await?;
            status.assert_success()?;

            if status.as_string().as_deref() == Some(names::STARTED) {
                running.push(server);
            }
        }

        tracing::debug!(?running, "Discovered running servers");
        Ok(running)
    }

    /// Whether `operation` is required on `host` or on any of its running servers.
    ///
    /// All states are read in one composite request so every server is judged at the
    /// same instant. A state that cannot be read fails the check instead of counting
    /// as "not required".
    #[tracing::instrument(skip(self, operation), fields(operation = %operation))]
    pub async fn is_required_on_host(
        &self,
        host: &str,
        operation: &RestartOperation,
    ) -> Result<bool> {
        let servers = self.running_servers(host).await?;

        let mut batch = Batch::new();
        batch.read_attribute(Address::host(host), names::HOST_STATE);
        for server in &servers {
            batch.read_attribute(server_address(host, server), names::SERVER_STATE);
        }

        let result = self.client.batch(batch).await?;
        result.assert_success()?;

        let host_state = result.step(0);
        host_state.assert_defined_value()?;
        if operation.is_required(&host_state, false) {
            tracing::debug!("Required by host state");
            return Ok(true);
        }
        for (index, server) in servers.iter().enumerate() {
            let server_state = result.step(index + 1);
            server_state.assert_defined_value()?;
            if operation.is_required(&server_state, true) {
                tracing::debug!(%server, "Required by server state");
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Trigger `operation` on `host` and wait for every server that was running
    /// before the trigger.
    ///
    /// The server set is taken before triggering; once the channel may be dropping,
    /// a fresh query is not reliable.
    #[tracing::instrument(skip(self, operation), fields(operation = %operation))]
    pub async fn perform_on_host(&self, host: &str, operation: &RestartOperation) -> Result<()> {
        let servers = self.running_servers(host).await?;

        tracing::info!(?servers, "Triggering operation on host");
        let reconnect_needed = match operation
            .perform(self.client.as_ref(), &Address::host(host))
            .await
        {
            Ok(()) => false,
            Err(e) => {
                tracing::debug!(error = %e, "Trigger did not answer cleanly, will reconnect");
                true
            }
        };

        self.wait_until_servers_are_running(host, &servers, reconnect_needed)
            .await?;
        tracing::info!("Host and servers are running");
        Ok(())
    }

    /// [`is_required_on_host`](Self::is_required_on_host), then
    /// [`perform_on_host`](Self::perform_on_host) if needed.
    ///
    /// Returns whether the operation was performed.
    pub async fn perform_if_required_on_host(
        &self,
        host: &str,
        operation: &RestartOperation,
    ) -> Result<bool> {
        if self.is_required_on_host(host, operation).await? {
            self.perform_on_host(host, operation).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Restart the listed servers in one composite request and wait for all of them.
    ///
    /// An empty list sends nothing and returns at once; nothing was triggered, so
    /// there is nothing to wait for.
    #[tracing::instrument(skip(self))]
    pub async fn restart_servers(&self, host: &str, servers: &[String]) -> Result<()> {
        self.ensure_servers(host, servers).await?;
        self.trigger_restarts(host, servers).await
    }

    /// Restart a single server and wait for it
    pub async fn restart_server(&self, host: &str, server: &str) -> Result<()> {
        self.restart_servers(host, &[server.to_string()]).await
    }

    /// Restart every server currently running under `host`
    #[tracing::instrument(skip(self))]
    pub async fn restart_all_servers(&self, host: &str) -> Result<()> {
        let servers = self.running_servers(host).await?;
        self.trigger_restarts(host, &servers).await
    }

    /// Start a configured server and wait for it to run
    #[tracing::instrument(skip(self))]
    pub async fn start_server(&self, host: &str, server: &str) -> Result<()> {
        let servers = [server.to_string()];
        self.ensure_servers(host, &servers).await?;

        tracing::info!("Starting server");
        let reconnect_needed = match self
            .client
            .invoke(
                names::START,
                &server_config_address(host, server),
                Values::of(names::BLOCKING, true),
            )
            .await
        {
            Ok(result) => {
                result.assert_success()?;
                false
            }
            Err(Error::Communication(msg)) => {
                tracing::debug!(error = %msg, "Start did not answer, will reconnect");
                true
            }
            Err(e) => return Err(e),
        };

        self.wait_until_servers_are_running(host, &servers, reconnect_needed)
            .await
    }

    /// Stop a configured server; returns once the remote side reports it stopped
    #[tracing::instrument(skip(self))]
    pub async fn stop_server(&self, host: &str, server: &str) -> Result<()> {
        self.ensure_servers(host, &[server.to_string()]).await?;

        tracing::info!("Stopping server");
        self.client
            .invoke(
                names::STOP,
                &server_config_address(host, server),
                Values::of(names::BLOCKING, true),
            )
            .await?
            .assert_success()
    }

    /// Shut a host controller down, with an optional suspend timeout
    #[tracing::instrument(skip(self))]
    pub async fn shutdown_host(&self, host: &str, timeout: Option<Duration>) -> Result<()> {
        self.ensure_host(host).await?;

        let params = shutdown_params(timeout);

        tracing::info!("Shutting down host");
        match self
            .client
            .invoke(names::SHUTDOWN, &Address::host(host), params)
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

    /// Wait until every listed server under `host` is responsive.
    ///
    /// With no servers listed only the host controller itself is polled. Otherwise a
    /// single unresponsive server keeps the wait going, however many others are back.
    #[tracing::instrument(skip(self))]
    pub async fn wait_until_servers_are_running(
        &self,
        host: &str,
        servers: &[String],
        reconnect_needed: bool,
    ) -> Result<()> {
        let client = self.client.as_ref();
        let timeout = self.config.timeout();

        let outcome = if servers.is_empty() {
            let address = &Address::host(host);
            self.poller
                .wait_until_responsive(
                    client,
                    WaitTarget::Host(host.to_string()),
                    reconnect_needed,
                    timeout,
                    move || state::check_responsive(client, address, names::HOST_STATE),
                )
                .await
        } else {
            let target = WaitTarget::Servers {
                host: host.to_string(),
                servers: servers.to_vec(),
            };
            self.poller
                .wait_until_responsive(client, target, reconnect_needed, timeout, move || {
                    all_servers_responsive(client, host, servers)
                })
                .await
        };

        outcome.into_result(timeout)
    }

    async fn trigger_restarts(&self, host: &str, servers: &[String]) -> Result<()> {
        if servers.is_empty() {
            tracing::debug!("No servers to restart");
            return Ok(());
        }

        let mut batch = Batch::new();
        for server in servers {
            batch.invoke(
                names::RESTART,
                server_config_address(host, server),
                Values::empty(),
            );
        }

        tracing::info!(?servers, "Restarting servers");
        let reconnect_needed = match self.client.batch(batch).await {
            Ok(result) => match result.assert_success() {
                Ok(()) => false,
                Err(e) => {
                    tracing::debug!(error = %e, "Restart batch failed, will reconnect");
                    true
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "Restart batch did not answer, will reconnect");
                true
            }
        };

        self.wait_until_servers_are_running(host, servers, reconnect_needed)
            .await
    }

    async fn ensure_host(&self, host: &str) -> Result<()> {
        if self.hosts().await?.iter().any(|known| known == host) {
            Ok(())
        } else {
            tracing::warn!(%host, "Unknown host");
            Err(Error::HostNotFound(host.to_string()))
        }
    }

    async fn ensure_servers(&self, host: &str, servers: &[String]) -> Result<()> {
        let configured = self.configured_servers(host).await?;
        match servers.iter().find(|server| !configured.contains(server)) {
            Some(missing) => {
                tracing::warn!(%host, server = %missing, "Unknown server");
                Err(Error::ServerNotFound(format!("{} on host '{}'", missing, host)))
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LifecycleCoordinator for DomainLifecycle {
    async fn is_required(&self, operation: &RestartOperation) -> Result<bool> {
        self.is_required_on_host(&self.default_host, operation).await
    }

    async fn perform(&self, operation: &RestartOperation) -> Result<()> {
        self.perform_on_host(&self.default_host, operation).await
    }

    #[tracing::instrument(skip(self), fields(host = %self.default_host))]
    async fn wait_until_running(&self) -> Result<()> {
        self.wait_until_servers_are_running(&self.default_host, &[], false)
            .await?;
        let servers = self.running_servers(&self.default_host).await?;
        self.wait_until_servers_are_running(&self.default_host, &servers, false)
            .await
    }

    async fn shutdown(&self, timeout: Option<Duration>) -> Result<()> {
        self.shutdown_host(&self.default_host, timeout).await
    }

    fn config(&self) -> &LifecycleConfig {
        &self.config
    }
}

fn server_address(host: &str, server: &str) -> Address {
    Address::host(host).and(names::SERVER, server)
}

fn server_config_address(host: &str, server: &str) -> Address {
    Address::host(host).and(names::SERVER_CONFIG, server)
}

async fn all_servers_responsive(
    client: &dyn ManagementClient,
    host: &str,
    servers: &[String],
) -> Result<bool> {
    for server in servers {
        let responsive =
            state::check_responsive(client, &server_address(host, server), names::SERVER_STATE)
                .await?;
        if !responsive {
            tracing::trace!(%server, "Server not responsive yet");
            return Ok(false);
        }
    }
    Ok(true)
}
