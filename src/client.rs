/// Client contract for the remote management channel.
///
/// This module defines the [`ManagementClient`] trait, the one seam between the
/// lifecycle code and whatever carries management requests to the remote process
/// (native protocol, HTTP, an in-memory fake in tests). Implementations are shared as
/// `Arc<dyn ManagementClient>`; [`ManagementClient::reconnect`] re-establishes the
/// underlying channel of the existing handle rather than producing a new one.
use crate::error::Result;
use crate::model::{Address, Batch, ModelNodeResult, Values, names};
use async_trait::async_trait;
use std::time::Duration;

/// A connection capable of executing management operations.
///
/// Communication failures (including the channel being torn down by a restart in
/// progress) are reported as [`Error::Communication`](crate::Error::Communication);
/// a `failed` outcome answered by the remote side is returned as a
/// [`ModelNodeResult`] and is not an `Err`.
///
/// # Examples
///
/// ```no_run
/// use mgmt_admin::client::ManagementClient;
/// use mgmt_admin::model::{Address, names};
/// use mgmt_admin::Result;
///
/// async fn print_state(client: &dyn ManagementClient) -> Result<()> {
///     let state = client.read_attribute(&Address::root(), names::SERVER_STATE).await?;
///     println!("server-state = {:?}", state.as_string());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ManagementClient: Send + Sync {
    /// Invoke a named operation against an address
    async fn invoke(
        &self,
        operation: &str,
        address: &Address,
        params: Values,
    ) -> Result<ModelNodeResult>;

    /// Execute all steps atomically as one composite request
    async fn batch(&self, batch: Batch) -> Result<ModelNodeResult>;

    /// Read a single attribute
    async fn read_attribute(&self, address: &Address, name: &str) -> Result<ModelNodeResult>;

    /// Re-establish the channel, giving up after `timeout`
    async fn reconnect(&self, timeout: Duration) -> Result<()>;
}

/// Names of the children of `address` of the given type
pub(crate) async fn read_children_names(
    client: &dyn ManagementClient,
    address: &Address,
    child_type: &str,
) -> Result<Vec<String>> {
    client
        .invoke(
            names::READ_CHILDREN_NAMES,
            address,
            Values::of(names::CHILD_TYPE, child_type),
        )
        .await?
        .string_list()
}
