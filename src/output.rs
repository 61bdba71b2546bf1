//! Output records: the named bundles of reactive values a component
//! exposes to whoever composed it.
//!
//! A record is an ordered string-keyed map. Composition merges records as a
//! *disjoint* union: a colliding key is an error, never a silent overwrite,
//! so sequencing components stays order-insensitive in what it exposes.

use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;

use eddy_reactive::{Behavior, Placeholder, Stream};

use crate::error::{Error, Result};
use crate::value::Value;

// =============================================================================
// Out
// =============================================================================

/// One entry in an output record.
///
/// Placeholder entries stand in for values that do not exist yet (loop
/// inputs, view inputs); the typed accessors on [`OutputRecord`] hand out
/// their views transparently, so consumers never need to know whether a key
/// is already backed by its real source.
#[derive(Clone)]
pub enum Out {
    Behavior(Behavior<Value>),
    Stream(Stream<Value>),
    Record(OutputRecord),
    Placeholder(Placeholder<Value>),
}

impl Out {
    /// Kind name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Out::Behavior(_) => "behavior",
            Out::Stream(_) => "stream",
            Out::Record(_) => "record",
            Out::Placeholder(_) => "placeholder",
        }
    }
}

impl fmt::Debug for Out {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Out::Record(record) => write!(f, "record{record:?}"),
            other => f.write_str(other.kind()),
        }
    }
}

impl From<Behavior<Value>> for Out {
    fn from(behavior: Behavior<Value>) -> Self {
        Out::Behavior(behavior)
    }
}

impl From<Stream<Value>> for Out {
    fn from(stream: Stream<Value>) -> Self {
        Out::Stream(stream)
    }
}

impl From<OutputRecord> for Out {
    fn from(record: OutputRecord) -> Self {
        Out::Record(record)
    }
}

impl From<Placeholder<Value>> for Out {
    fn from(placeholder: Placeholder<Value>) -> Self {
        Out::Placeholder(placeholder)
    }
}

// =============================================================================
// OutputRecord
// =============================================================================

/// An ordered, string-keyed record of reactive outputs.
#[derive(Clone, Default)]
pub struct OutputRecord {
    entries: IndexMap<String, Out>,
}

impl OutputRecord {
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Insert an entry. Fails with [`Error::DuplicateKey`] if the key is
    /// already present.
    pub fn insert(&mut self, key: impl Into<String>, out: impl Into<Out>) -> Result<()> {
        let key = key.into();
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Err(Error::DuplicateKey { key: entry.key().clone() }),
            Entry::Vacant(entry) => {
                entry.insert(out.into());
                Ok(())
            }
        }
    }

    /// Disjoint union with `other`, preserving insertion order (self's keys
    /// first). A key present in both is [`Error::DuplicateKey`].
    pub fn merge(mut self, other: OutputRecord) -> Result<OutputRecord> {
        for (key, out) in other.entries {
            self.insert(key, out)?;
        }
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Out> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stream under `key`. A placeholder entry yields its stream view.
    pub fn stream(&self, key: &str) -> Result<Stream<Value>> {
        match self.get(key) {
            None => Err(Error::KeyNotFound { key: key.to_string() }),
            Some(Out::Stream(stream)) => Ok(stream.clone()),
            Some(Out::Placeholder(placeholder)) => Ok(placeholder.stream()),
            Some(other) => Err(Error::KindMismatch {
                key: key.to_string(),
                expected: "stream",
                found: other.kind(),
            }),
        }
    }

    /// The behavior under `key`. A placeholder entry yields its behavior
    /// view.
    pub fn behavior(&self, key: &str) -> Result<Behavior<Value>> {
        match self.get(key) {
            None => Err(Error::KeyNotFound { key: key.to_string() }),
            Some(Out::Behavior(behavior)) => Ok(behavior.clone()),
            Some(Out::Placeholder(placeholder)) => Ok(placeholder.behavior()),
            Some(other) => Err(Error::KindMismatch {
                key: key.to_string(),
                expected: "behavior",
                found: other.kind(),
            }),
        }
    }

    /// The nested record under `key`.
    pub fn record(&self, key: &str) -> Result<OutputRecord> {
        match self.get(key) {
            None => Err(Error::KeyNotFound { key: key.to_string() }),
            Some(Out::Record(record)) => Ok(record.clone()),
            Some(other) => Err(Error::KindMismatch {
                key: key.to_string(),
                expected: "record",
                found: other.kind(),
            }),
        }
    }
}

impl fmt::Debug for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

// =============================================================================
// Placeholder resolution
// =============================================================================

/// Resolve `placeholder` from a record entry: streams and behaviors connect
/// directly, placeholder entries chain view-to-view, records are rejected.
pub(crate) fn resolve_out(key: &str, placeholder: &Placeholder<Value>, out: &Out) -> Result<()> {
    match out {
        Out::Stream(stream) => placeholder.replace_with_stream(stream)?,
        Out::Behavior(behavior) => placeholder.replace_with_behavior(behavior)?,
        Out::Placeholder(other) => placeholder.replace_with_placeholder(other)?,
        Out::Record(_) => {
            return Err(Error::InvalidResolution { key: key.to_string() });
        }
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
