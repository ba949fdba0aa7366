mod common;

use common::{Call, FakeController, Reply, test_lifecycle, value};
use mgmt_admin::error::{Error, Result};
use mgmt_admin::model::{Address, names};
use mgmt_admin::{Administration, Config, LifecycleConfig, Topology};
use std::sync::Arc;
use std::time::Duration;

fn config(topology: Option<Topology>, default_host: Option<&str>) -> Config {
    Config {
        topology,
        default_host: default_host.map(str::to_string),
        lifecycle: test_lifecycle(),
    }
}

#[tokio::test]
async fn test_connect_detects_standalone() -> Result<()> {
    let client = Arc::new(FakeController::standalone("running"));

    let admin = Administration::connect(client.clone(), config(None, None)).await?;

    assert!(!admin.is_domain());
    assert!(admin.domain().is_none());
    assert_eq!(admin.timeout(), Duration::from_secs(5));
    assert_eq!(client.reads_of(&Address::root(), names::LAUNCH_TYPE), 1);
    Ok(())
}

#[tokio::test]
async fn test_connect_detects_domain_and_local_host() -> Result<()> {
    let client = Arc::new(FakeController::domain("primary"));

    let admin = Administration::connect(client.clone(), config(None, None)).await?;

    let domain = admin.domain().expect("domain administration");
    assert_eq!(domain.default_host(), "primary");
    assert_eq!(client.reads_of(&Address::root(), names::LOCAL_HOST_NAME), 1);
    Ok(())
}

#[tokio::test]
async fn test_connect_with_configured_topology_skips_detection() -> Result<()> {
    let client = Arc::new(FakeController::domain("master").with_host("backup"));

    let admin = Administration::connect(
        client.clone(),
        config(Some(Topology::Domain), Some("backup")),
    )
    .await?;

    assert_eq!(admin.domain().map(|d| d.default_host()), Some("backup"));
    assert!(client.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_connect_rejects_invalid_config() {
    let client = Arc::new(FakeController::standalone("running"));
    let mut invalid = config(Some(Topology::Standalone), None);
    invalid.lifecycle.timeout_secs = 0;

    let result = Administration::connect(client.clone(), invalid).await;

    assert!(matches!(result, Err(Error::ConfigInvalid(_))));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_connect_rejects_unknown_launch_type() {
    let client = Arc::new(FakeController::standalone("running").script(
        &Address::root(),
        names::LAUNCH_TYPE,
        vec![value("EMBEDDED_HOST_CONTROLLER")],
    ));

    let result = Administration::connect(client, config(None, None)).await;

    assert!(matches!(result, Err(Error::Other(_))));
}

#[tokio::test(start_paused = true)]
async fn test_standalone_restart_if_required() -> Result<()> {
    let client = Arc::new(
        FakeController::standalone("restart-required")
            .fail_on(names::SHUTDOWN)
            .script(
                &Address::root(),
                names::SERVER_STATE,
                vec![value("restart-required"), Reply::Unreachable, value("running")],
            ),
    );
    let admin = Administration::standalone(client.clone(), test_lifecycle());

    assert!(admin.restart_if_required().await?);
    assert!(!admin.is_restart_required().await?);
    assert!(!admin.reload_if_required().await?);

    assert_eq!(client.mutating_calls().len(), 1);
    assert_eq!(client.reconnects(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_reload_to_snapshot_and_original() -> Result<()> {
    let client = Arc::new(FakeController::standalone("running"));
    let admin = Administration::standalone(client.clone(), LifecycleConfig::default());

    admin.reload_to_snapshot("standalone-snapshot.xml").await?;
    admin.reload_to_original().await?;
    admin.reload().await?;

    let reloads = client
        .mutating_calls()
        .into_iter()
        .filter(|call| {
            matches!(
                call,
                Call::Invoke { operation, address } if operation == "reload" && address == "/"
            )
        })
        .count();
    assert_eq!(reloads, 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_domain_reload_acts_on_default_host() -> Result<()> {
    let client = Arc::new(
        FakeController::domain("master")
            .with_server("master", "server-one", "STARTED", "restart-required"),
    );
    let admin = Administration::managed_domain(client.clone(), "master", test_lifecycle());

    // a managed server in restart-required makes a reload of its host required
    assert!(admin.is_reload_required().await?);
    assert!(admin.reload_if_required().await?);

    assert_eq!(
        client.mutating_calls(),
        vec![Call::Invoke {
            operation: "reload".to_string(),
            address: "/host=master".to_string(),
        }]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_domain_wait_until_running() -> Result<()> {
    let client = Arc::new(
        FakeController::domain("master")
            .with_server("master", "server-one", "STARTED", "running")
            .script(
                &Address::host("master"),
                names::HOST_STATE,
                vec![value("starting"), value("running")],
            ),
    );
    let admin = Administration::managed_domain(client.clone(), "master", test_lifecycle());

    admin.wait_until_running().await?;

    assert_eq!(client.reads_of(&Address::host("master"), names::HOST_STATE), 2);
    assert_eq!(
        client.reads_of(&Address::host("master").and("server", "server-one"), names::SERVER_STATE),
        1
    );
    assert!(client.mutating_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_shutdown() -> Result<()> {
    let client = Arc::new(FakeController::standalone("running"));
    let admin = Administration::standalone(client.clone(), test_lifecycle());

    admin.shutdown(None).await?;

    assert_eq!(
        client.mutating_calls(),
        vec![Call::Invoke {
            operation: "shutdown".to_string(),
            address: "/".to_string(),
        }]
    );
    Ok(())
}
