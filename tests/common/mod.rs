#![allow(dead_code)]

use async_trait::async_trait;
use mgmt_admin::client::ManagementClient;
use mgmt_admin::config::LifecycleConfig;
use mgmt_admin::error::{Error, Result};
use mgmt_admin::model::{Address, Batch, ModelNodeResult, Values, names};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

/// Install a test log writer; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Lifecycle timing small enough for tests; time is paused anyway
pub fn test_lifecycle() -> LifecycleConfig {
    LifecycleConfig {
        timeout_secs: 5,
        settle_delay_ms: 500,
        poll_interval_ms: 200,
    }
}

/// A call observed by the fake controller
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Invoke { operation: String, address: String },
    Batch { steps: Vec<(String, String)> },
    Read { address: String, attribute: String },
    Reconnect,
}

impl Call {
    /// Whether the call changes anything on the remote side
    pub fn is_mutating(&self) -> bool {
        match self {
            Call::Invoke { operation, .. } => operation != names::READ_CHILDREN_NAMES,
            Call::Batch { steps } => steps.iter().any(|(op, _)| op != names::READ_ATTRIBUTE),
            Call::Read { .. } | Call::Reconnect => false,
        }
    }
}

/// Answer to an attribute read
#[derive(Debug, Clone)]
pub enum Reply {
    Value(String),
    Undefined,
    Unreachable,
}

pub fn value(raw: &str) -> Reply {
    Reply::Value(raw.to_string())
}

/// How the fake answers a reconnect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reconnect {
    #[default]
    Succeed,
    Fail,
    Hang,
}

#[derive(Default)]
struct State {
    hosts: BTreeMap<String, Vec<String>>,
    attributes: HashMap<(String, String), VecDeque<Reply>>,
    failing: HashSet<String>,
    start_on_trigger: Option<(String, String)>,
    reconnect: Reconnect,
    calls: Vec<Call>,
}

impl State {
    fn set(&mut self, address: &Address, attribute: &str, replies: Vec<Reply>) {
        self.attributes
            .insert((address.to_string(), attribute.to_string()), replies.into());
    }

    fn read(&mut self, address: &Address, attribute: &str) -> Result<ModelNodeResult> {
        let key = (address.to_string(), attribute.to_string());
        let reply = match self.attributes.get_mut(&key) {
            Some(replies) if replies.len() > 1 => replies.pop_front(),
            Some(replies) => replies.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Value(raw)) => Ok(ModelNodeResult::success(raw)),
            Some(Reply::Undefined) => Ok(ModelNodeResult::undefined()),
            Some(Reply::Unreachable) => Err(Error::Communication(format!(
                "{} is unreachable",
                address
            ))),
            None => Ok(ModelNodeResult::failure(format!(
                "Resource {} has no attribute {}",
                address, attribute
            ))),
        }
    }

    fn children(&self, address: &Address, child_type: &str) -> ModelNodeResult {
        let segments = address.segments();
        let children: Option<Vec<String>> = match (segments, child_type) {
            ([], names::HOST) => Some(self.hosts.keys().cloned().collect()),
            ([(kind, host)], names::SERVER_CONFIG) if kind == names::HOST => {
                self.hosts.get(host).cloned()
            }
            _ => None,
        };

        match children {
            Some(children) => ModelNodeResult::success(serde_json::json!(children)),
            None => ModelNodeResult::failure(format!("{} not found", address)),
        }
    }

    /// Applies the side effects of a mutating operation
    fn mutate(&mut self, operation: &str, address: &Address) {
        if let Some((host, server)) = self.start_on_trigger.take() {
            self.mark_started(&host, &server);
        }

        if let [(_, host), (kind, server)] = address.segments() {
            if kind == names::SERVER_CONFIG {
                match operation {
                    names::START => self.mark_started(host, server),
                    names::STOP => {
                        let config =
                            Address::host(host.as_str()).and(names::SERVER_CONFIG, server.as_str());
                        self.set(&config, names::STATUS, vec![value("STOPPED")]);
                        let running =
                            Address::host(host.as_str()).and(names::SERVER, server.as_str());
                        self.attributes
                            .remove(&(running.to_string(), names::SERVER_STATE.to_string()));
                    }
                    _ => {}
                }
            }
        }
    }

    fn mark_started(&mut self, host: &str, server: &str) {
        let config = Address::host(host).and(names::SERVER_CONFIG, server);
        self.set(&config, names::STATUS, vec![value(names::STARTED)]);
        let running = Address::host(host).and(names::SERVER, server);
        self.set(&running, names::SERVER_STATE, vec![value("running")]);
    }
}

/// In-memory management endpoint with scripted attribute answers.
///
/// Scripted replies are consumed one per read until only the last is left, which then
/// answers every further read.
pub struct FakeController {
    state: Mutex<State>,
}

impl FakeController {
    fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// A standalone server reporting `server_state`
    pub fn standalone(server_state: &str) -> Self {
        Self::new()
            .script(&Address::root(), names::LAUNCH_TYPE, vec![value("STANDALONE")])
            .script(&Address::root(), names::SERVER_STATE, vec![value(server_state)])
    }

    /// A domain with one running host controller the client is connected to
    pub fn domain(host: &str) -> Self {
        Self::new()
            .script(&Address::root(), names::LAUNCH_TYPE, vec![value("DOMAIN")])
            .script(&Address::root(), names::LOCAL_HOST_NAME, vec![value(host)])
            .with_host(host)
    }

    /// Add a running host controller
    pub fn with_host(self, host: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .hosts
            .insert(host.to_string(), Vec::new());
        self.script(&Address::host(host), names::HOST_STATE, vec![value("running")])
    }

    /// Add a server under `host`. Started servers report `server_state`.
    pub fn with_server(self, host: &str, server: &str, status: &str, server_state: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .hosts
                .entry(host.to_string())
                .or_default()
                .push(server.to_string());
            let config = Address::host(host).and(names::SERVER_CONFIG, server);
            state.set(&config, names::STATUS, vec![value(status)]);
            if status == names::STARTED {
                let running = Address::host(host).and(names::SERVER, server);
                state.set(&running, names::SERVER_STATE, vec![value(server_state)]);
            }
        }
        self
    }

    /// Script the answers for reads of `attribute` at `address`
    pub fn script(self, address: &Address, attribute: &str, replies: Vec<Reply>) -> Self {
        self.state.lock().unwrap().set(address, attribute, replies);
        self
    }

    /// Invoking `operation` fails with a communication error, as when the remote
    /// side drops the channel before answering. Side effects still apply.
    pub fn fail_on(self, operation: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert(operation.to_string());
        self
    }

    /// Answer every reconnect attempt with `reconnect`
    pub fn reconnect_with(self, reconnect: Reconnect) -> Self {
        self.state.lock().unwrap().reconnect = reconnect;
        self
    }

    /// Another actor starts `server` as soon as any mutating operation arrives
    pub fn start_on_trigger(self, host: &str, server: &str) -> Self {
        self.state.lock().unwrap().start_on_trigger = Some((host.to_string(), server.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    pub fn reconnects(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == Call::Reconnect)
            .count()
    }

    pub fn reads_of(&self, address: &Address, attribute: &str) -> usize {
        let expected = Call::Read {
            address: address.to_string(),
            attribute: attribute.to_string(),
        };
        self.calls().iter().filter(|call| **call == expected).count()
    }

    pub fn batches(&self) -> Vec<Vec<(String, String)>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Batch { steps } => Some(steps),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ManagementClient for FakeController {
    async fn invoke(
        &self,
        operation: &str,
        address: &Address,
        params: Values,
    ) -> Result<ModelNodeResult> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Invoke {
            operation: operation.to_string(),
            address: address.to_string(),
        });

        if operation == names::READ_CHILDREN_NAMES {
            let child_type = params
                .get(names::CHILD_TYPE)
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            return Ok(state.children(address, child_type));
        }

        state.mutate(operation, address);
        if state.failing.contains(operation) {
            return Err(Error::Communication("Channel closed".to_string()));
        }
        Ok(ModelNodeResult::undefined())
    }

    async fn batch(&self, batch: Batch) -> Result<ModelNodeResult> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Batch {
            steps: batch
                .steps()
                .iter()
                .map(|step| (step.name.clone(), step.address.to_string()))
                .collect(),
        });

        let mut results = Vec::new();
        for step in batch.steps() {
            if step.name == names::READ_ATTRIBUTE {
                let attribute = step
                    .params
                    .get(names::NAME)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                results.push(state.read(&step.address, &attribute)?);
            } else {
                state.mutate(&step.name, &step.address);
                if state.failing.contains(&step.name) {
                    return Err(Error::Communication("Channel closed".to_string()));
                }
                results.push(ModelNodeResult::undefined());
            }
        }

        Ok(ModelNodeResult::composite(results))
    }

    async fn read_attribute(&self, address: &Address, name: &str) -> Result<ModelNodeResult> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Read {
            address: address.to_string(),
            attribute: name.to_string(),
        });
        state.read(address, name)
    }

    async fn reconnect(&self, _timeout: Duration) -> Result<()> {
        let reconnect = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::Reconnect);
            state.reconnect
        };

        match reconnect {
            Reconnect::Succeed => Ok(()),
            Reconnect::Fail => Err(Error::Communication("Connection refused".to_string())),
            Reconnect::Hang => std::future::pending().await,
        }
    }
}
