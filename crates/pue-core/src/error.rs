use thiserror::Error;

/// Error raised while constructing AST or template values.
///
/// Builder calls fail immediately when handed a value the wire format
/// cannot represent (a non-finite float literal, a malformed compound
/// property key). Nothing is coerced or deferred to serialization time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BuildError {
    pub message: String,
}

impl BuildError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error raised by a component lifecycle hook.
///
/// Any hook failing during fan-out aborts the whole endpoint response;
/// `component` and `hook` are filled in by the aggregator so the request
/// boundary can report which unit of work failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    pub message: String,
    pub component: Option<String>,
    pub hook: Option<String>,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            component: None,
            hook: None,
        }
    }

    pub(crate) fn in_hook(mut self, component: &str, hook: &str) -> Self {
        self.component = Some(component.to_string());
        self.hook = Some(hook.to_string());
        self
    }
}

impl From<BuildError> for HookError {
    fn from(value: BuildError) -> Self {
        Self::new(value.message)
    }
}

/// Error raised while decoding a wire-format value back into typed nodes:
/// unknown `kind`, missing field, or a malformed node shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WireError {
    pub message: String,
}

impl WireError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
