//! Management protocol model.
//!
//! Addresses, operations, composite batches and the results the remote side
//! answers with. These types are what a [`ManagementClient`](crate::client::ManagementClient)
//! implementation puts on the wire; the lifecycle code only builds and inspects them.
//!
//! # Examples
//!
//! ```
//! use mgmt_admin::model::{Address, Batch, names};
//!
//! let host = Address::host("master");
//! let mut batch = Batch::new();
//! batch.read_attribute(host.clone(), names::HOST_STATE);
//! let server = host.clone().and("server", "server-one");
//! batch.read_attribute(server.clone(), names::SERVER_STATE);
//!
//! assert_eq!(batch.len(), 2);
//! assert_eq!(server.to_string(), "/host=master/server=server-one");
//! ```
mod address;
mod operation;
mod result;

pub use address::Address;
pub use operation::{Batch, Operation, Values};
pub use result::ModelNodeResult;

/// Attribute, operation and parameter names understood by the remote side.
///
/// These are a bit-exact contract with the management model.
pub mod names {
    /// Process state of a standalone server or a running managed server.
    pub const SERVER_STATE: &str = "server-state";
    /// Process state of a host controller.
    pub const HOST_STATE: &str = "host-state";
    /// Configuration status of a managed server (`STARTED`, `STOPPED`, ...).
    pub const STATUS: &str = "status";
    /// Value of [`STATUS`] for servers that are currently started.
    pub const STARTED: &str = "STARTED";
    /// Root attribute telling standalone and domain launches apart.
    pub const LAUNCH_TYPE: &str = "launch-type";
    /// Root attribute naming the host controller the client is connected to.
    pub const LOCAL_HOST_NAME: &str = "local-host-name";

    /// Resource type of host controllers.
    pub const HOST: &str = "host";
    /// Resource type of configured servers under a host.
    pub const SERVER_CONFIG: &str = "server-config";
    /// Resource type of running servers under a host.
    pub const SERVER: &str = "server";

    pub const RELOAD: &str = "reload";
    pub const SHUTDOWN: &str = "shutdown";
    pub const RESTART: &str = "restart";
    pub const START: &str = "start";
    pub const STOP: &str = "stop";
    pub const READ_ATTRIBUTE: &str = "read-attribute";
    pub const READ_CHILDREN_NAMES: &str = "read-children-names";
    pub const COMPOSITE: &str = "composite";

    /// Boolean parameter of `shutdown` turning it into a restart.
    pub const RESTART_PARAM: &str = "restart";
    /// Boolean parameter of domain `start`/`stop`.
    pub const BLOCKING: &str = "blocking";
    /// Suspend timeout parameter of `shutdown`, in seconds.
    pub const TIMEOUT: &str = "timeout";
    /// `reload` parameter; `false` reloads the original (read-only) configuration.
    pub const USE_CURRENT_SERVER_CONFIG: &str = "use-current-server-config";
    /// `reload` parameter naming a configuration snapshot.
    pub const SERVER_CONFIG_PARAM: &str = "server-config";
    /// Parameter of `read-children-names`.
    pub const CHILD_TYPE: &str = "child-type";
    /// Parameter of `read-attribute`.
    pub const NAME: &str = "name";
}
