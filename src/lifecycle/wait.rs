use crate::client::ManagementClient;
use crate::config::LifecycleConfig;
use crate::error::{Error, Result};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant};

/// What a lifecycle call waits on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitTarget {
    /// The root process of a standalone server
    Standalone,
    /// A host controller alone
    Host(String),
    /// A set of servers under a host; all of them must come back
    Servers {
        /// Host controller
        host: String,
        /// Servers waited on
        servers: Vec<String>,
    },
}

impl fmt::Display for WaitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone server"),
            Self::Host(host) => write!(f, "host '{}'", host),
            Self::Servers { host, servers } => {
                write!(f, "servers [{}] on host '{}'", servers.join(", "), host)
            }
        }
    }
}

/// Result of waiting on a [`WaitTarget`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Everything waited on is responsive
    Running,
    /// The target did not become responsive in time
    TimedOut(WaitTarget),
}

impl WaitOutcome {
    /// Turn a timeout into [`Error::Timeout`] naming the target
    pub fn into_result(self, timeout: Duration) -> Result<()> {
        match self {
            Self::Running => Ok(()),
            Self::TimedOut(target) => Err(Error::Timeout(format!(
                "{} did not become responsive within {} seconds",
                target,
                timeout.as_secs()
            ))),
        }
    }
}

/// Bounded retry loop deciding when processes are back after a lifecycle operation.
///
/// One wait goes through `settle -> [reconnect] -> polling -> {running, timed out}`.
/// Errors raised by the check while polling are swallowed; the process may be
/// unreachable for a while.
#[derive(Debug, Clone)]
pub struct WaitPoller {
    settle_delay: Duration,
    poll_interval: Duration,
}

impl WaitPoller {
    /// Create a poller using the settle delay and poll interval of `config`
    pub fn new(config: &LifecycleConfig) -> Self {
        Self {
            settle_delay: config.settle_delay(),
            poll_interval: config.poll_interval(),
        }
    }

    /// Wait until `check` reports the target responsive, or `timeout` elapses.
    ///
    /// The clock starts once the settle delay and the optional reconnect are over.
    /// When the loop runs out of time, one last check is made so a process that comes
    /// back right at the boundary is not reported as timed out.
    pub async fn wait_until_responsive<F, Fut>(
        &self,
        client: &dyn ManagementClient,
        target: WaitTarget,
        reconnect_needed: bool,
        timeout: Duration,
        mut check: F,
    ) -> WaitOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        time::sleep(self.settle_delay).await;

        if reconnect_needed {
            tracing::debug!(%target, "Reconnecting before polling");
            match time::timeout(timeout, client.reconnect(timeout)).await {
                Ok(Ok(())) => tracing::debug!(%target, "Reconnected"),
                Ok(Err(e)) => tracing::warn!(%target, error = %e, "Reconnect failed"),
                Err(_) => tracing::warn!(%target, "Reconnect timed out"),
            }
        }

        let start = Instant::now();
        let mut attempts = 0u32;
        while start.elapsed() < timeout {
            attempts += 1;
            if Self::attempt(&target, &mut check).await {
                tracing::debug!(%target, attempts, "Target is responsive");
                return WaitOutcome::Running;
            }
            time::sleep(self.poll_interval).await;
        }

        if Self::attempt(&target, &mut check).await {
            tracing::debug!(%target, attempts = attempts + 1, "Target is responsive");
            return WaitOutcome::Running;
        }

        tracing::error!(%target, attempts = attempts + 1, "Target did not become responsive");
        WaitOutcome::TimedOut(target)
    }

    async fn attempt<F, Fut>(target: &WaitTarget, check: &mut F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        match check().await {
            Ok(responsive) => responsive,
            Err(e) => {
                tracing::debug!(%target, error = %e, "Check failed, retrying");
                false
            }
        }
    }
}
