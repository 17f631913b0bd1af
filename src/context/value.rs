use std::fmt;

/// Immutable holder for one stored value, `None` included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value<V> {
    value: Option<V>,
}

impl<V> Value<V> {
    pub fn new(value: Option<V>) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self { value: None }
    }

    pub fn get(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn into_inner(self) -> Option<V> {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

impl<V> From<Option<V>> for Value<V> {
    fn from(value: Option<V>) -> Self {
        Self::new(value)
    }
}

/// Renders `null`, or the value's type name and the value on the next line.
impl<V: fmt::Display> fmt::Display for Value<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}\n{}", std::any::type_name::<V>(), value),
            None => f.write_str("null"),
        }
    }
}

/// A key/value pair handed to [`crate::Context::put_entry`]. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    value: Option<V>,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: impl Into<Option<V>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn into_parts(self) -> (K, Option<V>) {
        (self.key, self.value)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key [{}]\nValue [", self.key)?;
        match &self.value {
            Some(value) => write!(f, "{value}")?,
            None => f.write_str("null")?,
        }
        f.write_str("]")
    }
}
