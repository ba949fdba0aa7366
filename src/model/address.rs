use crate::model::names;
use serde_json::Value;
use std::fmt;

/// Address of a resource in the management model.
///
/// An address is an ordered list of `(type, name)` segments. The empty address is the
/// root resource, which for a standalone server is the server itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    segments: Vec<(String, String)>,
}

impl Address {
    /// The root resource
    pub fn root() -> Self {
        Self::default()
    }

    /// A host controller, `/host=<name>`
    pub fn host(name: impl Into<String>) -> Self {
        Self::root().and(names::HOST, name)
    }

    /// Append a segment
    pub fn and(mut self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        self.segments.push((kind.into(), name.into()));
        self
    }

    /// Whether this is the root address
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in order
    pub fn segments(&self) -> &[(String, String)] {
        &self.segments
    }

    /// Wire form: a list of one-key objects, e.g. `[{"host": "master"}]`
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.segments
                .iter()
                .map(|(kind, name)| {
                    let mut segment = serde_json::Map::new();
                    segment.insert(kind.clone(), Value::from(name.as_str()));
                    Value::Object(segment)
                })
                .collect(),
        )
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for (kind, name) in &self.segments {
            write!(f, "/{}={}", kind, name)?;
        }
        Ok(())
    }
}
