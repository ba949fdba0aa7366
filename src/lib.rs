/*!
 # mgmt-admin

 A Rust library for administering application servers and host controllers over a
 remote management protocol.

 ## Overview

 mgmt-admin provides functionality to:
 - Reload, restart and shut down a standalone server
 - Reload or restart a host controller and the servers it supervises in a managed domain
 - Start, stop and restart individual managed servers
 - Check whether a reload or restart is pending
 - Wait reliably until processes are usable again, even when the triggering call
   tears down the management connection

 The wire transport is supplied by the caller as an implementation of
 [`ManagementClient`](client::ManagementClient).

 ## Basic Usage

 ```no_run
 use mgmt_admin::{Administration, Config, Result};
 use mgmt_admin::client::ManagementClient;
 use std::sync::Arc;

 async fn apply_pending_changes(client: Arc<dyn ManagementClient>) -> Result<()> {
     let config = Config::from_file("admin.json")?;

     // Standalone or domain is decided once, here
     let admin = Administration::connect(client, config).await?;

     if admin.reload_if_required().await? {
         println!("Reloaded");
     }

     if let Some(domain) = admin.domain() {
         domain.restart_server("master", "server-one").await?;
     }

     Ok(())
 }
 ```

 ## License

 This project is licensed under the terms in the LICENSE file.
*/

pub mod client;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;

pub use client::ManagementClient;
pub use config::{Config, LifecycleConfig, Topology};
pub use error::{Error, Result};
pub use lifecycle::{
    DomainLifecycle, LifecycleCoordinator, RestartOperation, StandaloneLifecycle,
};

use model::{Address, names};
use std::sync::Arc;
use std::time::Duration;

/// Administration of a standalone server or a managed domain.
///
/// This struct is the main entry point. The standalone or domain coordinator is chosen
/// once at construction; every call afterwards goes through the same
/// [`LifecycleCoordinator`]. In a domain the calls act on the default host, and
/// [`domain`](Self::domain) gives access to host- and server-specific operations.
/// All public methods are instrumented with `tracing` spans.
pub struct Administration {
    lifecycle: Box<dyn LifecycleCoordinator>,
    domain: Option<DomainLifecycle>,
}

impl Administration {
    /// Administration of a standalone server
    pub fn standalone(client: Arc<dyn ManagementClient>, config: LifecycleConfig) -> Self {
        tracing::debug!("Creating standalone administration");
        Self {
            lifecycle: Box::new(StandaloneLifecycle::new(client, config)),
            domain: None,
        }
    }

    /// Administration of a managed domain, acting on `default_host` by default
    pub fn managed_domain(
        client: Arc<dyn ManagementClient>,
        default_host: impl Into<String>,
        config: LifecycleConfig,
    ) -> Self {
        let domain = DomainLifecycle::new(client, default_host, config);
        tracing::debug!(default_host = %domain.default_host(), "Creating domain administration");
        Self {
            lifecycle: Box::new(domain.clone()),
            domain: Some(domain),
        }
    }

    /// Validate `config` and create the matching administration.
    ///
    /// Without a configured topology the root `launch-type` attribute decides. In a
    /// domain without a configured default host, the host the client is connected to
    /// (root `local-host-name`) is used.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(client, config))]
    pub async fn connect(client: Arc<dyn ManagementClient>, config: Config) -> Result<Self> {
        crate::config::validate_config(&config)?;

        let topology = match config.topology {
            Some(topology) => topology,
            None => detect_topology(client.as_ref()).await?,
        };
        tracing::info!(?topology, "Connecting administration");

        match topology {
            Topology::Standalone => Ok(Self::standalone(client, config.lifecycle)),
            Topology::Domain => {
                let default_host = match config.default_host {
                    Some(host) => host,
                    None => read_string(client.as_ref(), names::LOCAL_HOST_NAME).await?,
                };
                Ok(Self::managed_domain(client, default_host, config.lifecycle))
            }
        }
    }

    /// Whether this administers a managed domain
    pub fn is_domain(&self) -> bool {
        self.domain.is_some()
    }

    /// Host- and server-specific operations, when administering a domain
    pub fn domain(&self) -> Option<&DomainLifecycle> {
        self.domain.as_ref()
    }

    /// Lifecycle timeout
    pub fn timeout(&self) -> Duration {
        self.lifecycle.config().timeout()
    }

    /// Reload and wait until running
    #[tracing::instrument(skip(self))]
    pub async fn reload(&self) -> Result<()> {
        self.lifecycle.perform(&RestartOperation::Reload).await
    }

    /// Reload if a reload is pending; returns whether it reloaded
    #[tracing::instrument(skip(self))]
    pub async fn reload_if_required(&self) -> Result<bool> {
        self.lifecycle
            .perform_if_required(&RestartOperation::Reload)
            .await
    }

    /// Whether a reload is pending
    pub async fn is_reload_required(&self) -> Result<bool> {
        self.lifecycle.is_required(&RestartOperation::Reload).await
    }

    /// Restart and wait until running
    #[tracing::instrument(skip(self))]
    pub async fn restart(&self) -> Result<()> {
        self.lifecycle.perform(&RestartOperation::Restart).await
    }

    /// Restart if a restart is pending; returns whether it restarted
    #[tracing::instrument(skip(self))]
    pub async fn restart_if_required(&self) -> Result<bool> {
        self.lifecycle
            .perform_if_required(&RestartOperation::Restart)
            .await
    }

    /// Whether a restart is pending
    pub async fn is_restart_required(&self) -> Result<bool> {
        self.lifecycle.is_required(&RestartOperation::Restart).await
    }

    /// Reload back to the original configuration and wait until running
    #[tracing::instrument(skip(self))]
    pub async fn reload_to_original(&self) -> Result<()> {
        self.lifecycle
            .perform(&RestartOperation::ReloadToOriginal)
            .await
    }

    /// Reload to a configuration snapshot and wait until running
    #[tracing::instrument(skip(self))]
    pub async fn reload_to_snapshot(&self, snapshot: &str) -> Result<()> {
        self.lifecycle
            .perform(&RestartOperation::ReloadToSnapshot(snapshot.to_string()))
            .await
    }

    /// Wait until running without triggering anything
    #[tracing::instrument(skip(self))]
    pub async fn wait_until_running(&self) -> Result<()> {
        self.lifecycle.wait_until_running().await
    }

    /// Shut down, with an optional suspend timeout; does not wait
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&self, timeout: Option<Duration>) -> Result<()> {
        self.lifecycle.shutdown(timeout).await
    }
}

async fn detect_topology(client: &dyn ManagementClient) -> Result<Topology> {
    let launch_type = read_string(client, names::LAUNCH_TYPE).await?;
    match launch_type.to_ascii_uppercase().as_str() {
        "DOMAIN" => Ok(Topology::Domain),
        "STANDALONE" => Ok(Topology::Standalone),
        other => Err(Error::Other(format!("Unsupported launch type: {}", other))),
    }
}

async fn read_string(client: &dyn ManagementClient, attribute: &str) -> Result<String> {
    let result = client.read_attribute(&Address::root(), attribute).await?;
    result.assert_defined_value()?;
    result
        .as_string()
        .ok_or_else(|| Error::UndefinedValue(attribute.to_string()))
}
