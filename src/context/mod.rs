//! Shared key/value context
//!
//! A [`Context`] maps keys to optional values and may be shared by any number
//! of threads. Writes go straight to a [`DashMap`], so `put`, `remove` and
//! `put_if_absent` are atomic for the key they touch. There is no ordering
//! between different keys.
//!
//! # Null values
//!
//! Every stored value is wrapped in a [`Value`], which holds an `Option<V>`.
//! `None` is a legal value. [`Context::get`] collapses "absent" and "present
//! with `None`" into `None`; use [`Context::contains_key`] or
//! [`Context::lookup`] when the difference matters.
//!
//! # Sharing
//!
//! - [`Context::mirror`] (and `Clone`) returns a new handle on the *same*
//!   backing map. Writes through one handle are visible through the other.
//! - [`Context::copy`] merges every entry of one context into another,
//!   independent one. Keys of the source win on conflict.
//!
//! # Example Usage
//!
//! ```rust
//! use shared_context::Context;
//!
//! let context: Context<&str, u32> = Context::new();
//! assert_eq!(context.put("retries", 3), None);
//! assert_eq!(context.put_if_absent("retries", 5), Some(3));
//!
//! let mirror = Context::mirror(&context);
//! mirror.put("timeout", 30);
//! assert_eq!(context.get("timeout"), Some(30));
//!
//! // The fallback is computed but never stored
//! assert_eq!(context.get_or_else("missing", |_| Some(7)), Some(7));
//! assert!(!context.contains_key("missing"));
//! ```

mod simple;
mod value;


pub use simple::SimpleContext;
pub use value::{Entry, Value};

use crate::config::{validate, ContextConfig};
use crate::error::Result;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, trace};

/// Thread-safe mapping from `K` to optional `V`.
pub struct Context<K, V> {
    entries: Arc<DashMap<K, Value<V>>>,
}

impl<K, V> Context<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::from_entries(Arc::new(DashMap::new()))
    }

    /// Create a context whose backing map is sized by `config`.
    pub fn with_config(config: &ContextConfig) -> Result<Self> {
        validate(config)?;

        let entries = match config.shard_amount {
            Some(shards) => {
                DashMap::with_capacity_and_shard_amount(config.initial_capacity, shards)
            }
            None => DashMap::with_capacity(config.initial_capacity),
        };

        Ok(Self::from_entries(Arc::new(entries)))
    }

    /// Wrap an existing backing map. Anyone else holding `entries` keeps
    /// seeing the writes made through this context.
    pub fn from_entries(entries: Arc<DashMap<K, Value<V>>>) -> Self {
        Self { entries }
    }

    /// A new handle sharing `original`'s backing map.
    pub fn mirror(original: &Self) -> Self {
        trace!("Mirroring context");
        Self::from_entries(Arc::clone(&original.entries))
    }

    /// Merge every entry of `from` into `to`, overwriting keys `to` already has.
    ///
    /// Each key is written atomically but the copy as a whole is not: writers
    /// racing on `from` may leave `to` with a mix of old and new values.
    pub fn copy(from: &Self, to: &Self)
    where
        K: Clone,
        V: Clone,
    {
        if from.is_mirror_of(to) {
            trace!("Skipping copy onto the same backing map");
            return;
        }

        // Collected first so no shard guard of `from` is held while `to` is written.
        let snapshot: Vec<(K, Value<V>)> = from
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let count = snapshot.len();
        for (key, value) in snapshot {
            to.entries.insert(key, value);
        }
        trace!(count, "Copied context entries");
    }

    /// Whether both handles share one backing map.
    pub fn is_mirror_of(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// The backing map, for embedding code that needs direct access.
    pub fn entries(&self) -> &Arc<DashMap<K, Value<V>>> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// The stored wrapper for `key`: `None` when the key is absent,
    /// `Some(value)` with `value.is_null()` when it maps to `None`.
    pub fn lookup<Q>(&self, key: &Q) -> Option<Value<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.entries.get(key).map(|value| value.value().clone())
    }

    /// The value for `key`, or `None` if the key is absent or maps to `None`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.entries
            .get(key)
            .and_then(|value| value.value().get().cloned())
    }

    /// The value for `key`, or the result of `fallback` when the key is absent.
    ///
    /// `fallback` receives this context and runs without any map guard held,
    /// so it may read or write the context itself. Its result is not stored.
    /// A key present with a `None` value returns `None` without calling it.
    pub fn get_or_else<Q, F>(&self, key: &Q, fallback: F) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
        F: FnOnce(&Self) -> Option<V>,
    {
        match self.lookup(key) {
            Some(value) => value.into_inner(),
            None => {
                debug!("Key absent, computing fallback value");
                fallback(self)
            }
        }
    }

    /// Like [`get_or_else`](Self::get_or_else) for a fallback that can fail.
    /// The fallback's error is returned as is.
    pub fn try_get_or_else<Q, F, E>(
        &self,
        key: &Q,
        fallback: F,
    ) -> std::result::Result<Option<V>, E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
        F: FnOnce(&Self) -> std::result::Result<Option<V>, E>,
    {
        match self.lookup(key) {
            Some(value) => Ok(value.into_inner()),
            None => {
                debug!("Key absent, computing fallible fallback value");
                fallback(self)
            }
        }
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn put(&self, key: K, value: impl Into<Option<V>>) -> Option<V> {
        self.entries
            .insert(key, Value::new(value.into()))
            .and_then(Value::into_inner)
    }

    pub fn set(&self, key: K, value: impl Into<Option<V>>) -> Option<V> {
        self.put(key, value)
    }

    pub fn put_entry(&self, entry: Entry<K, V>) -> Option<V> {
        let (key, value) = entry.into_parts();
        self.put(key, value)
    }

    /// Store `value` only if `key` is absent.
    ///
    /// Returns the existing value when the key was already present (nothing is
    /// written), or `None` when `value` was installed. An existing `None`
    /// value also yields `None`; check [`contains_key`](Self::contains_key)
    /// beforehand if the two cases must be told apart.
    pub fn put_if_absent(&self, key: K, value: impl Into<Option<V>>) -> Option<V>
    where
        V: Clone,
    {
        match self.entries.entry(key) {
            MapEntry::Occupied(occupied) => occupied.get().get().cloned(),
            MapEntry::Vacant(vacant) => {
                vacant.insert(Value::new(value.into()));
                None
            }
        }
    }

    /// Remove `key`, returning the value it held.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .remove(key)
            .and_then(|(_, value)| value.into_inner())
    }
}

impl<K, V> Default for Context<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

// Cloning shares the backing map, same as `Context::mirror`.
impl<K, V> Clone for Context<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, V> From<Arc<DashMap<K, Value<V>>>> for Context<K, V>
where
    K: Eq + Hash,
{
    fn from(entries: Arc<DashMap<K, Value<V>>>) -> Self {
        Self::from_entries(entries)
    }
}

/// Diagnostic rendering. Entry order is unspecified.
///
/// The header is the full generic type name, so a [`SimpleContext`] prints as
/// `shared_context::context::Context<alloc::string::String,
/// serde_json::value::Value>` rather than under its alias. Each value is
/// rendered through [`Value`]'s `Display`, i.e. with its type name.
impl<K, V> fmt::Display for Context<K, V>
where
    K: Eq + Hash + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [", std::any::type_name::<Self>())?;
        for entry in self.entries.iter() {
            writeln!(f, "Key [{}]", entry.key())?;
            writeln!(f, "Value [{}]", entry.value())?;
        }
        write!(f, "]")
    }
}

impl<K, V> fmt::Debug for Context<K, V>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for entry in self.entries.iter() {
            map.entry(entry.key(), entry.value());
        }
        map.finish()
    }
}
