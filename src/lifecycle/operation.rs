use crate::client::ManagementClient;
use crate::error::Result;
use crate::lifecycle::state::ProcessState;
use crate::model::{Address, ModelNodeResult, Values, names};
use std::fmt;

/// A reload- or restart-class operation.
///
/// Each kind knows how to trigger itself and whether a process state calls for it.
/// Values carry no per-call state and can be reused freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartOperation {
    /// `reload`
    Reload,
    /// `shutdown(restart=true)`; there is no separate restart primitive
    Restart,
    /// `reload(use-current-server-config=false)`, back to the original configuration
    ReloadToOriginal,
    /// `reload(server-config=<snapshot>)`
    ReloadToSnapshot(String),
}

impl RestartOperation {
    /// Operation name and parameters sent to the remote side
    pub fn request(&self) -> (&'static str, Values) {
        match self {
            Self::Reload => (names::RELOAD, Values::empty()),
            Self::Restart => (names::SHUTDOWN, Values::of(names::RESTART_PARAM, true)),
            Self::ReloadToOriginal => (
                names::RELOAD,
                Values::of(names::USE_CURRENT_SERVER_CONFIG, false),
            ),
            Self::ReloadToSnapshot(snapshot) => (
                names::RELOAD,
                Values::of(names::SERVER_CONFIG_PARAM, snapshot.as_str()),
            ),
        }
    }

    /// Trigger the operation on `address`.
    ///
    /// A restart typically fails here with a communication error because the remote
    /// side drops the channel before answering; callers treat any error as "reconnect
    /// before polling".
    pub async fn perform(&self, client: &dyn ManagementClient, address: &Address) -> Result<()> {
        let (operation, params) = self.request();
        client
            .invoke(operation, address, params)
            .await?
            .assert_success()
    }

    /// Whether the state read in `state` calls for this operation.
    ///
    /// For a managed server in a domain, `restart-required` also makes a reload of its
    /// host required.
    pub fn is_required(&self, state: &ModelNodeResult, is_managed_server_in_domain: bool) -> bool {
        let state = ProcessState::from_result(state);
        match self {
            Self::Restart => state == ProcessState::RestartRequired,
            Self::Reload | Self::ReloadToOriginal | Self::ReloadToSnapshot(_) => {
                state == ProcessState::ReloadRequired
                    || (is_managed_server_in_domain && state == ProcessState::RestartRequired)
            }
        }
    }
}

impl fmt::Display for RestartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reload => write!(f, "reload"),
            Self::Restart => write!(f, "restart"),
            Self::ReloadToOriginal => write!(f, "reload to original configuration"),
            Self::ReloadToSnapshot(snapshot) => write!(f, "reload to snapshot {}", snapshot),
        }
    }
}
