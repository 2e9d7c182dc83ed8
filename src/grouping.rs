//! Stable grouping of records by a field or a derived key.
//!
//! Groups come back ordered by ascending key. Numeric keys sort before text
//! keys, and records without the field come last. Numbers compare numerically
//! and text compares byte-wise. Records sharing a key keep their input order.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Error produced by a selector that cannot derive a key from a record.
pub type SelectorError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub enum GroupKey {
    Number(f64),
    Text(String),
    /// The field was absent or null on the record
    Missing,
}

impl GroupKey {
    /// Numeric value of the key, if it is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            GroupKey::Number(n) => Some(*n),
            GroupKey::Text(_) | GroupKey::Missing => None,
        }
    }

    /// Numeric key with -0.0 folded into 0.0
    pub fn number(value: f64) -> Self {
        GroupKey::Number(if value == 0.0 { 0.0 } else { value })
    }
}

impl From<i64> for GroupKey {
    fn from(value: i64) -> Self {
        GroupKey::Number(value as f64)
    }
}

impl From<usize> for GroupKey {
    fn from(value: usize) -> Self {
        GroupKey::Number(value as f64)
    }
}

impl From<f64> for GroupKey {
    fn from(value: f64) -> Self {
        GroupKey::number(value)
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey::Text(value.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        GroupKey::Text(value)
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            (GroupKey::Missing, GroupKey::Missing) => Ordering::Equal,
            (GroupKey::Number(_), _) => Ordering::Less,
            (_, GroupKey::Number(_)) => Ordering::Greater,
            (GroupKey::Text(_), GroupKey::Missing) => Ordering::Less,
            (GroupKey::Missing, GroupKey::Text(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // 1e15 keeps the cast exact
            GroupKey::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            GroupKey::Number(n) => write!(f, "{}", n),
            GroupKey::Text(s) => f.write_str(s),
            GroupKey::Missing => f.write_str("unknown"),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            GroupKey::Number(n) => serializer.serialize_f64(*n),
            GroupKey::Text(s) => serializer.serialize_str(s),
            GroupKey::Missing => serializer.serialize_none(),
        }
    }
}

/// A structured value with named fields that can be grouped.
pub trait Record {
    /// Look up a field as a group key. `None` when the field is absent.
    fn field(&self, name: &str) -> Option<GroupKey>;
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<GroupKey> {
        match self.get(name)? {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(GroupKey::number),
            Value::String(s) => Some(GroupKey::Text(s.clone())),
            Value::Bool(b) => Some(GroupKey::Text(b.to_string())),
            other => Some(GroupKey::Text(other.to_string())),
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Option<GroupKey> {
        (**self).field(name)
    }
}

/// How a group key is obtained from each record.
pub enum GroupSelector<'s, R: ?Sized> {
    /// Look up a named field on the record; absent or null gives `GroupKey::Missing`
    Field(String),
    /// Compute the key from the whole record
    Derive(Box<dyn Fn(&R) -> Result<GroupKey, SelectorError> + 's>),
}

impl<'s, R: ?Sized> GroupSelector<'s, R> {
    pub fn field(name: impl Into<String>) -> Self {
        GroupSelector::Field(name.into())
    }

    pub fn derive<F>(f: F) -> Self
    where
        F: Fn(&R) -> Result<GroupKey, SelectorError> + 's,
    {
        GroupSelector::Derive(Box::new(f))
    }
}

impl<R: ?Sized> fmt::Debug for GroupSelector<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSelector::Field(name) => f.debug_tuple("Field").field(name).finish(),
            GroupSelector::Derive(_) => f.write_str("Derive(..)"),
        }
    }
}

#[derive(Debug, Error)]
#[error("could not derive a group key for record #{index} ({record}): {source}")]
pub struct EvaluationError {
    /// Position of the offending record in the input
    pub index: usize,
    /// Debug rendering of the offending record
    pub record: String,
    #[source]
    pub source: SelectorError,
}

/// One group of the result. Members borrow from the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<'r, R> {
    pub key: GroupKey,
    pub members: Vec<&'r R>,
}

impl<R> Group<'_, R> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partition `records` by the key `selector` yields for each of them.
///
/// Fails on the first record a `Derive` selector cannot evaluate; no partial
/// grouping is returned. A `Field` selector never fails.
pub fn group<'r, R, I>(
    records: I,
    selector: GroupSelector<'_, R>,
) -> Result<Vec<Group<'r, R>>, EvaluationError>
where
    R: Record + fmt::Debug + 'r,
    I: IntoIterator<Item = &'r R>,
{
    let derive: Box<dyn Fn(&R) -> Result<GroupKey, SelectorError> + '_> = match selector {
        GroupSelector::Field(name) => {
            Box::new(move |record: &R| -> Result<GroupKey, SelectorError> {
                Ok(record.field(&name).unwrap_or(GroupKey::Missing))
            })
        }
        GroupSelector::Derive(f) => f,
    };

    let mut groups: BTreeMap<GroupKey, Vec<&'r R>> = BTreeMap::new();
    for (index, record) in records.into_iter().enumerate() {
        let key = derive(record).map_err(|source| EvaluationError {
            index,
            record: format!("{:?}", record),
            source,
        })?;
        groups.entry(key).or_default().push(record);
    }

    Ok(groups
        .into_iter()
        .map(|(key, members)| Group { key, members })
        .collect())
}
