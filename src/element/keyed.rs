//! Lists addressed by element key
//!
//! Keys are not unique structurally. Wire data occasionally carries the same
//! key twice; both entries are kept and lookups return the first match.

use super::list::{ElementCollection, ElementList, ListItem};
use super::{ElementTree, SifElement, SimpleField};
use crate::error::Result;
use crate::schema::DefHandle;
use crate::value::converter::{primitive_text, value_text};
use crate::value::{formatter_for, Primitive, SifValue};
use crate::version::SifVersion;
use tracing::trace;

/// Candidate key for a keyed lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKey {
    /// A native value, coerced to the key field's datatype before comparing
    Native(Primitive),
    /// A wrapped value, compared value-to-value
    Value(SifValue),
    /// Text in the latest-version lexical form
    Text(String),
}

impl ElementKey {
    /// Latest-version text of the candidate
    pub fn text(&self) -> Option<String> {
        let formatter = formatter_for(SifVersion::LATEST);
        match self {
            ElementKey::Native(p) => Some(primitive_text(formatter, p)),
            ElementKey::Value(v) => value_text(formatter, v),
            ElementKey::Text(t) => Some(t.clone()),
        }
    }
}

impl From<Primitive> for ElementKey {
    fn from(value: Primitive) -> Self {
        ElementKey::Native(value)
    }
}

impl From<SifValue> for ElementKey {
    fn from(value: SifValue) -> Self {
        ElementKey::Value(value)
    }
}

impl From<&str> for ElementKey {
    fn from(value: &str) -> Self {
        ElementKey::Text(value.to_string())
    }
}

impl From<String> for ElementKey {
    fn from(value: String) -> Self {
        ElementKey::Text(value)
    }
}

impl From<i32> for ElementKey {
    fn from(value: i32) -> Self {
        ElementKey::Native(Primitive::Int(value))
    }
}

impl From<i64> for ElementKey {
    fn from(value: i64) -> Self {
        ElementKey::Native(Primitive::Long(value))
    }
}

/// Items that can be matched against an [`ElementKey`]
pub trait KeyedItem: ListItem {
    fn key_equals(&self, key: &ElementKey) -> bool;
}

fn field_key_equals(field: &SimpleField, key: &ElementKey) -> bool {
    let value = field.value();
    match key {
        ElementKey::Native(p) => field
            .converter()
            .get_wrapped(p.clone())
            .map(|candidate| candidate == value)
            .unwrap_or(false),
        ElementKey::Value(v) => *v == value,
        ElementKey::Text(t) => field.text_value().as_deref() == Some(t.as_str()),
    }
}

impl KeyedItem for SimpleField {
    fn key_equals(&self, key: &ElementKey) -> bool {
        field_key_equals(self, key)
    }
}

impl KeyedItem for ElementTree {
    fn key_equals(&self, key: &ElementKey) -> bool {
        let def = self.definition();
        match def.key_fields() {
            [] => false,
            [single] => self
                .field(single)
                .map_or(false, |field| field_key_equals(&field, key)),
            _ => match (self.key(), key.text()) {
                (Some(own), Some(candidate)) => own == candidate,
                _ => false,
            },
        }
    }
}

/// [`ElementList`] with key-based lookup and removal
#[derive(Clone)]
pub struct KeyedElementList<T> {
    list: ElementList<T>,
}

impl<T: KeyedItem> KeyedElementList<T> {
    pub fn new(container: ElementTree, item_def: DefHandle) -> Self {
        Self {
            list: ElementList::new(container, item_def),
        }
    }

    pub fn container(&self) -> &ElementTree {
        self.list.container()
    }

    /// First item whose key matches
    pub fn get_key(&self, key: impl Into<ElementKey>) -> Option<T> {
        let key = key.into();
        self.items().into_iter().find(|item| item.key_equals(&key))
    }

    pub fn contains_key(&self, key: impl Into<ElementKey>) -> bool {
        self.get_key(key).is_some()
    }

    /// Remove the first item whose key matches. Returns whether one was found.
    pub fn remove_key(&self, key: impl Into<ElementKey>) -> bool {
        let key = key.into();
        match self.get_key(key.clone()) {
            Some(item) => {
                trace!(?key, "removing keyed element");
                self.list.container().remove_child(&item.to_element())
            }
            None => false,
        }
    }

    pub fn as_list(&self) -> &ElementList<T> {
        &self.list
    }
}

impl<T: KeyedItem> ElementCollection<T> for KeyedElementList<T> {
    fn items(&self) -> Vec<T> {
        self.list.items()
    }

    fn add(&self, item: T) -> Result<()> {
        self.list.add(item)
    }

    fn remove(&self, item: &T) -> Result<bool> {
        self.list.remove(item)
    }

    fn clear(&self) -> Result<()> {
        self.list.clear()
    }
}
