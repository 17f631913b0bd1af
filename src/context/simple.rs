use super::Context;

/// A [`Context`] keyed by `String` holding arbitrary JSON-like values.
///
/// `None` is the null value; a stored `serde_json::Value::Null` is an
/// ordinary, non-null value.
pub type SimpleContext = Context<String, serde_json::Value>;
