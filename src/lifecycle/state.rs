use crate::client::ManagementClient;
use crate::error::Result;
use crate::model::{Address, ModelNodeResult};
use std::fmt;

/// Readiness of a server or host controller, as reported by its
/// `server-state` / `host-state` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessState {
    /// Up and serving
    Running,
    /// Up, but configuration changes only take effect after a reload
    ReloadRequired,
    /// Up, but configuration changes only take effect after a restart
    RestartRequired,
    /// Starting, stopping, or the attribute was undefined
    Other(String),
}

impl ProcessState {
    /// Classify a raw state string
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "reload-required" => Self::ReloadRequired,
            "restart-required" => Self::RestartRequired,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Classify an attribute read; failed or undefined reads are `Other`
    pub fn from_result(result: &ModelNodeResult) -> Self {
        match result.as_string() {
            Some(raw) if result.is_success() => Self::parse(&raw),
            _ => Self::Other("undefined".to_string()),
        }
    }

    /// Whether the process answers management requests.
    ///
    /// A pending reload or restart still counts; mid-boot, mid-shutdown and
    /// undefined do not.
    pub fn is_responsive(&self) -> bool {
        matches!(
            self,
            Self::Running | Self::ReloadRequired | Self::RestartRequired
        )
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::ReloadRequired => write!(f, "reload-required"),
            Self::RestartRequired => write!(f, "restart-required"),
            Self::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Whether a raw state string describes a responsive process
pub fn is_responsive(raw: &str) -> bool {
    ProcessState::parse(raw).is_responsive()
}

/// Read `attribute` at `address` and classify it.
///
/// An undefined value is an error here; the wait loop folds it into
/// "not yet responsive".
pub(crate) async fn check_responsive(
    client: &dyn ManagementClient,
    address: &Address,
    attribute: &str,
) -> Result<bool> {
    let result = client.read_attribute(address, attribute).await?;
    result.assert_defined_value()?;
    let state = ProcessState::from_result(&result);
    tracing::trace!(%address, %state, "Read process state");
    Ok(state.is_responsive())
}
