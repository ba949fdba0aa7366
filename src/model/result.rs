use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const OUTCOME: &str = "outcome";
const RESULT: &str = "result";
const FAILURE_DESCRIPTION: &str = "failure-description";
const SUCCESS: &str = "success";
const FAILED: &str = "failed";

/// Response to a management operation.
///
/// The raw response is an object with an `outcome` (`success` or `failed`), an optional
/// `result` and, on failure, a `failure-description`. Composite responses carry one
/// sub-response per step under `result.step-1` ... `result.step-N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelNodeResult(Value);

impl ModelNodeResult {
    /// Wrap a raw response
    pub fn from_json(value: Value) -> Self {
        Self(value)
    }

    /// A successful response carrying `result`
    pub fn success(result: impl Into<Value>) -> Self {
        Self(serde_json::json!({ OUTCOME: SUCCESS, RESULT: result.into() }))
    }

    /// A successful response without a result value
    pub fn undefined() -> Self {
        Self(serde_json::json!({ OUTCOME: SUCCESS }))
    }

    /// A failed response
    pub fn failure(description: impl Into<String>) -> Self {
        Self(serde_json::json!({ OUTCOME: FAILED, FAILURE_DESCRIPTION: description.into() }))
    }

    /// A composite response; fails as a whole if any step failed
    pub fn composite(steps: impl IntoIterator<Item = ModelNodeResult>) -> Self {
        let mut result = Map::new();
        let mut all_succeeded = true;
        for (index, step) in steps.into_iter().enumerate() {
            all_succeeded &= step.is_success();
            result.insert(format!("step-{}", index + 1), step.0);
        }

        if all_succeeded {
            Self::success(Value::Object(result))
        } else {
            Self(serde_json::json!({
                OUTCOME: FAILED,
                FAILURE_DESCRIPTION: "Composite operation failed and was rolled back",
                RESULT: Value::Object(result),
            }))
        }
    }

    /// The raw response
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Whether the outcome is `success`
    pub fn is_success(&self) -> bool {
        self.0.get(OUTCOME).and_then(Value::as_str) == Some(SUCCESS)
    }

    /// Whether the operation succeeded and produced a non-null result
    pub fn is_defined(&self) -> bool {
        self.is_success() && self.value().is_some()
    }

    /// The result value, if present and not null
    pub fn value(&self) -> Option<&Value> {
        self.0.get(RESULT).filter(|v| !v.is_null())
    }

    /// Failure description, or an empty string on success
    pub fn failure_description(&self) -> String {
        match self.0.get(FAILURE_DESCRIPTION) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None if self.is_success() => String::new(),
            None => "Unknown failure".to_string(),
        }
    }

    /// The result as a string; non-string scalars are rendered
    pub fn as_string(&self) -> Option<String> {
        match self.value()? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The result as a list of strings, e.g. the answer of `read-children-names`
    pub fn string_list(&self) -> Result<Vec<String>> {
        self.assert_defined_value()?;
        let items = self.value().and_then(Value::as_array).ok_or_else(|| {
            Error::Serialization(format!("Expected a list result, got {}", self.0))
        })?;

        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::Serialization(format!("Expected a string list item, got {}", item))
                })
            })
            .collect()
    }

    /// Fail with [`Error::OperationFailed`] unless the outcome is `success`
    pub fn assert_success(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Error::OperationFailed(self.failure_description()))
        }
    }

    /// Fail fast unless the operation succeeded with a value
    pub fn assert_defined_value(&self) -> Result<()> {
        self.assert_success()?;
        if self.value().is_none() {
            return Err(Error::UndefinedValue(format!(
                "Expected a defined result, got {}",
                self.0
            )));
        }
        Ok(())
    }

    /// Sub-result of a composite step by zero-based index.
    ///
    /// A missing step yields a failed result rather than panicking.
    pub fn step(&self, index: usize) -> ModelNodeResult {
        let key = format!("step-{}", index + 1);
        self.0
            .get(RESULT)
            .and_then(|result| result.get(&key))
            .cloned()
            .map(Self)
            .unwrap_or_else(|| Self::failure(format!("Composite response has no {}", key)))
    }
}

impl fmt::Display for ModelNodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
