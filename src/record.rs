//! # Record model: the data context a timer is bound to.
//!
//! The platform owns the actual data objects; the controller only needs an
//! opaque identity plus synchronous attribute reads. [`Record`] is the seam:
//! production code wraps a platform object, tests use an in-memory map.
//!
//! Attribute values arrive untyped from the binding layer, so [`AttrValue`]
//! carries the three shapes the controller cares about and exposes lenient
//! accessors ([`AttrValue::as_millis`], [`AttrValue::as_bool`]) that return
//! `None` instead of failing on a mismatched type.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// Opaque identity of a bound record.
///
/// Actions are always invoked against exactly one record, identified by this.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RecordId(u64);

impl RecordId {
    /// Wraps a raw platform identifier.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record#{}", self.0)
    }
}

/// Reference to a named attribute of a record.
///
/// # Example
/// ```
/// use flowtimer::AttrRef;
///
/// let attr = AttrRef::new("TimerStatus");
/// assert_eq!(attr.as_str(), "TimerStatus");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct AttrRef(Cow<'static, str>);

impl AttrRef {
    /// Creates an attribute reference from a static or owned name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Returns the attribute name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value read from a record attribute.
#[derive(Clone, PartialEq, Debug)]
pub enum AttrValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

impl AttrValue {
    /// Interprets the value as a millisecond duration.
    ///
    /// Negative numbers and non-numeric strings yield `None`; the caller
    /// treats that the same as an absent attribute.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use flowtimer::AttrValue;
    ///
    /// assert_eq!(AttrValue::Int(5000).as_millis(), Some(Duration::from_millis(5000)));
    /// assert_eq!(AttrValue::Str("250".into()).as_millis(), Some(Duration::from_millis(250)));
    /// assert_eq!(AttrValue::Int(-1).as_millis(), None);
    /// assert_eq!(AttrValue::Bool(true).as_millis(), None);
    /// ```
    pub fn as_millis(&self) -> Option<Duration> {
        let ms = match self {
            AttrValue::Int(n) => Some(*n),
            AttrValue::Str(s) => s.trim().parse::<i64>().ok(),
            AttrValue::Bool(_) => None,
        }?;
        u64::try_from(ms).ok().map(Duration::from_millis)
    }

    /// Interprets the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            AttrValue::Str(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            AttrValue::Int(_) => None,
        }
    }
}

/// # Synchronous view of the bound data record.
///
/// Reads must reflect the platform's current attribute values: the controller
/// re-reads through this trait whenever a change notification arrives.
pub trait Record {
    /// Stable identity of the record; the target of every action invocation.
    fn id(&self) -> RecordId;

    /// Reads one attribute, `None` when absent.
    fn get(&self, attr: &AttrRef) -> Option<AttrValue>;
}
