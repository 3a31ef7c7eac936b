use crate::error::SignalError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An action submitted to the store to trigger a state transition.
///
/// The payload is intentionally untyped ([`serde_json::Value`]) — the store
/// has no opinion about action shapes beyond requiring a JSON object at the
/// top level. Mutators give actions meaning.
///
/// By convention actions carry a `"type"` discriminator and an optional
/// `"payload"` field, but any object is accepted. Construction validates the
/// object requirement, so a held `Action` is always object-shaped.
///
/// # Examples
///
/// ```
/// use sigfold::Action;
/// use serde_json::json;
///
/// // The {type, payload} convention
/// let action = Action::of("todo_added", json!({"text": "write docs"}));
/// assert_eq!(action.action_type(), Some("todo_added"));
///
/// // Any object works
/// let action = Action::new(json!({"custom": true})).unwrap();
/// assert_eq!(action.action_type(), None);
///
/// // Non-objects are rejected
/// assert!(Action::new(json!("bare string")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Action(Value);

impl Action {
    /// Create an action from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidPayload`] if the value is not an object.
    pub fn new(payload: Value) -> Result<Self, SignalError> {
        if payload.is_object() {
            Ok(Action(payload))
        } else {
            Err(SignalError::InvalidPayload {
                kind: value_kind(&payload),
            })
        }
    }

    /// Build a `{"type": ..., "payload": ...}` action.
    ///
    /// The payload field may be any JSON value — only the enclosing action
    /// must be an object.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigfold::Action;
    /// use serde_json::json;
    ///
    /// let action = Action::of("action", json!("foo"));
    /// assert_eq!(action.payload(), Some(&json!("foo")));
    /// ```
    pub fn of(action_type: &str, payload: Value) -> Self {
        Action(json!({ "type": action_type, "payload": payload }))
    }

    /// The `"type"` field, if present and a string.
    pub fn action_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// The `"payload"` field, if present.
    pub fn payload(&self) -> Option<&Value> {
        self.0.get("payload")
    }

    /// A named field of the action object.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The full action object.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the action, returning the underlying object.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl TryFrom<Value> for Action {
    type Error = SignalError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Action::new(value)
    }
}

/// Human-readable JSON kind, used in `InvalidPayload` messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
