use crate::model::{Address, names};
use serde_json::{Map, Value};

/// Named parameters of a management operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values(Map<String, Value>);

impl Values {
    /// No parameters
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single parameter
    pub fn of(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::empty().and(name, value)
    }

    /// Add a parameter, replacing an earlier one with the same name
    pub fn and(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Look up a parameter
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether there are no parameters
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the parameters
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// A single management operation
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Operation name
    pub name: String,
    /// Target resource
    pub address: Address,
    /// Operation parameters
    pub params: Values,
}

impl Operation {
    /// Create a new operation
    pub fn new(name: impl Into<String>, address: Address, params: Values) -> Self {
        Self {
            name: name.into(),
            address,
            params,
        }
    }

    /// Create a `read-attribute` operation
    pub fn read_attribute(address: Address, attribute: &str) -> Self {
        Self::new(
            names::READ_ATTRIBUTE,
            address,
            Values::of(names::NAME, attribute),
        )
    }

    /// Wire form, e.g. `{"operation": "reload", "address": [{"host": "master"}]}`
    pub fn to_json(&self) -> Value {
        let mut request = Map::new();
        request.insert("operation".to_string(), Value::from(self.name.as_str()));
        request.insert("address".to_string(), self.address.to_json());
        for (name, value) in self.params.iter() {
            request.insert(name.clone(), value.clone());
        }
        Value::Object(request)
    }
}

/// Operations executed atomically as one composite request.
///
/// The answer carries one sub-result per step, reachable through
/// [`ModelNodeResult::step`](crate::model::ModelNodeResult::step) by the index the step
/// was added at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    steps: Vec<Operation>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation step
    pub fn invoke(
        &mut self,
        name: impl Into<String>,
        address: Address,
        params: Values,
    ) -> &mut Self {
        self.steps.push(Operation::new(name, address, params));
        self
    }

    /// Add a `read-attribute` step
    pub fn read_attribute(&mut self, address: Address, attribute: &str) -> &mut Self {
        self.steps.push(Operation::read_attribute(address, attribute));
        self
    }

    /// Steps in order
    pub fn steps(&self) -> &[Operation] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the batch has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Wire form: a `composite` operation on the root carrying the steps
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "operation": names::COMPOSITE,
            "address": [],
            "steps": self.steps.iter().map(Operation::to_json).collect::<Vec<_>>(),
        })
    }
}
