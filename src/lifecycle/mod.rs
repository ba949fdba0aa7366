/// Lifecycle coordination for remote processes.
///
/// Triggering a reload, restart or shutdown routinely breaks the connection used to
/// observe its outcome. This module triggers such operations and then decides, by
/// polling, when the affected processes are usable again. All public components are
/// instrumented with `tracing` spans.
///
/// # Components
///
/// * `state` - Classifies raw process states into responsive / not responsive
/// * `operation` - Reload, restart and reload-to-configuration strategies
/// * `wait` - Settle, reconnect and bounded polling loop
/// * `standalone` - Coordinator for a single standalone server
/// * `domain` - Coordinator for a host controller and its managed servers
///
/// # Examples
///
/// ```no_run
/// use mgmt_admin::client::ManagementClient;
/// use mgmt_admin::config::LifecycleConfig;
/// use mgmt_admin::lifecycle::{LifecycleCoordinator, RestartOperation, StandaloneLifecycle};
/// use std::sync::Arc;
///
/// # async fn example(client: Arc<dyn ManagementClient>) -> mgmt_admin::Result<()> {
/// let lifecycle = StandaloneLifecycle::new(client, LifecycleConfig::default());
///
/// // Reloads and waits only if the server reports reload-required
/// let reloaded = lifecycle.perform_if_required(&RestartOperation::Reload).await?;
/// println!("Reloaded: {}", reloaded);
/// # Ok(())
/// # }
/// ```
pub mod domain;
pub mod operation;
pub mod standalone;
pub mod state;
pub mod wait;

pub use domain::DomainLifecycle;
pub use operation::RestartOperation;
pub use standalone::StandaloneLifecycle;
pub use state::{ProcessState, is_responsive};
pub use wait::{WaitOutcome, WaitPoller, WaitTarget};

use crate::config::LifecycleConfig;
use crate::error::Result;
use crate::model::{Values, names};
use async_trait::async_trait;
use std::time::Duration;

/// Lifecycle capability shared by the standalone and domain coordinators
#[async_trait]
pub trait LifecycleCoordinator: Send + Sync {
    /// Whether the process (or, in a domain, the host or any running server) calls for
    /// `operation`
    async fn is_required(&self, operation: &RestartOperation) -> Result<bool>;

    /// Trigger `operation` and wait until the affected processes are responsive
    async fn perform(&self, operation: &RestartOperation) -> Result<()>;

    /// Perform `operation` only if it is required; returns whether it was performed.
    ///
    /// Nothing is changed on the remote side when the operation is not required.
    async fn perform_if_required(&self, operation: &RestartOperation) -> Result<bool> {
        if self.is_required(operation).await? {
            self.perform(operation).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Wait until the processes are responsive without triggering anything
    async fn wait_until_running(&self) -> Result<()>;

    /// Shut the process down, with an optional suspend timeout; does not wait
    async fn shutdown(&self, timeout: Option<Duration>) -> Result<()>;

    /// Lifecycle timing used by this coordinator
    fn config(&self) -> &LifecycleConfig;
}

/// Parameters of a `shutdown` with an optional suspend timeout.
///
/// The remote side takes whole seconds; fractions round up so a short timeout is not
/// sent as `0`, which would skip the suspend entirely.
pub(crate) fn shutdown_params(timeout: Option<Duration>) -> Values {
    match timeout {
        Some(timeout) => {
            let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
            Values::of(names::TIMEOUT, secs)
        }
        None => Values::empty(),
    }
}
