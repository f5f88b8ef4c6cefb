use std::{mem, rc::Rc};

use indexmap::IndexMap;

use crate::{
    executor::deferred::DeferredResult,
    value::{Object, Value},
};

/// Result tree built while walking a request
///
/// Same as [`Value`], except it may hold placeholders of deferred values that
/// are replaced once they've been resolved.
pub(crate) enum Output<'a> {
    Value(Value),
    List(Vec<Output<'a>>),
    Object(IndexMap<String, Output<'a>>),
    Deferred(Rc<DeferredResult<'a>>),
    /// Two results for the same response key, one of them not available yet.
    Merged(Box<Output<'a>>, Box<Output<'a>>),
}

impl Default for Output<'_> {
    fn default() -> Self {
        Self::Value(Value::Null)
    }
}

impl<'a> Output<'a> {
    /// Overlays `other` onto `self`.
    ///
    /// Objects are merged key by key. Anything else is replaced by `other`.
    /// The merge involving a placeholder is postponed until it's resolved.
    pub(crate) fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Object(mut left), Self::Object(right)) => {
                for (key, value) in right {
                    merge_entry(&mut left, key, value);
                }
                Self::Object(left)
            }
            (
                left @ (Self::Object(_) | Self::Deferred(_) | Self::Merged(..)),
                right @ (Self::Object(_) | Self::Deferred(_) | Self::Merged(..)),
            ) => Self::Merged(Box::new(left), Box::new(right)),
            (_, right) => right,
        }
    }

    /// Turns the tree into a plain value.
    ///
    /// Placeholders are replaced with the output they were resolved to, or
    /// null if that never happened.
    pub(crate) fn into_value(self) -> Value {
        match self {
            Self::Value(v) => v,
            Self::List(items) => Value::list(items.into_iter().map(Self::into_value).collect()),
            Self::Object(fields) => Value::object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, v.into_value()))
                    .collect::<Object>(),
            ),
            Self::Deferred(entry) => entry.take().map_or_else(Value::null, Self::into_value),
            Self::Merged(left, right) => left.into_value().merge(right.into_value()),
        }
    }
}

/// Adds `value` under `key`, merging it with a value already there.
pub(crate) fn merge_entry<'a>(
    map: &mut IndexMap<String, Output<'a>>,
    key: String,
    value: Output<'a>,
) {
    match map.get_mut(&key) {
        Some(existing) => {
            let previous = mem::take(existing);
            *existing = previous.merge(value);
        }
        None => {
            map.insert(key, value);
        }
    }
}
