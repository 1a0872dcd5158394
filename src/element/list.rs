//! Homogeneous lists of child elements

use super::{Element, ElementTree, SifElement, SimpleField};
use crate::error::{AdkError, Result};
use crate::schema::DefHandle;
use std::marker::PhantomData;

/// Node types a list can hold
pub trait ListItem: SifElement + Clone {
    /// Narrow an untyped element, `None` when it is another kind.
    fn from_element(element: &Element) -> Option<Self>;

    fn kind_name() -> &'static str;
}

impl ListItem for ElementTree {
    fn from_element(element: &Element) -> Option<Self> {
        element.as_tree().cloned()
    }

    fn kind_name() -> &'static str {
        "ElementTree"
    }
}

impl ListItem for SimpleField {
    fn from_element(element: &Element) -> Option<Self> {
        element.as_field().cloned()
    }

    fn kind_name() -> &'static str {
        "SimpleField"
    }
}

impl ListItem for Element {
    fn from_element(element: &Element) -> Option<Self> {
        Some(element.clone())
    }

    fn kind_name() -> &'static str {
        "Element"
    }
}

/// Common list surface
pub trait ElementCollection<T: ListItem> {
    /// Snapshot of the items in insertion order
    fn items(&self) -> Vec<T>;

    fn len(&self) -> usize {
        self.items().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items().into_iter().nth(index)
    }

    fn add(&self, item: T) -> Result<()>;

    fn remove(&self, item: &T) -> Result<bool>;

    fn clear(&self) -> Result<()>;
}

/// List element whose children all share one declared item definition,
/// e.g. `AddressList` holding `Address` entries.
#[derive(Clone)]
pub struct ElementList<T> {
    container: ElementTree,
    item_def: DefHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ListItem> ElementList<T> {
    pub fn new(container: ElementTree, item_def: DefHandle) -> Self {
        Self {
            container,
            item_def,
            _marker: PhantomData,
        }
    }

    /// The element owning the items
    pub fn container(&self) -> &ElementTree {
        &self.container
    }

    pub fn item_definition(&self) -> &DefHandle {
        &self.item_def
    }

    /// Add an untyped element, checking its kind at runtime.
    pub fn add_element(&self, element: Element) -> Result<()> {
        match T::from_element(&element) {
            Some(item) => self.add(item),
            None => Err(AdkError::invalid_cast(T::kind_name(), element.kind_name())),
        }
    }

    pub fn as_read_only(&self) -> TypedElementList<T> {
        TypedElementList::new(self.items())
    }
}

impl<T: ListItem> ElementCollection<T> for ElementList<T> {
    fn items(&self) -> Vec<T> {
        self.container
            .children_named(self.item_def.name())
            .iter()
            .filter_map(T::from_element)
            .collect()
    }

    fn add(&self, item: T) -> Result<()> {
        let name = item.name();
        if name != self.item_def.name() {
            return Err(AdkError::invalid_cast(self.item_def.name(), name));
        }
        self.container.add_child(item.to_element())
    }

    fn remove(&self, item: &T) -> Result<bool> {
        Ok(self.container.remove_child(&item.to_element()))
    }

    fn clear(&self) -> Result<()> {
        self.container.remove_children_named(self.item_def.name());
        Ok(())
    }
}

/// Read-only snapshot of same-typed children
#[derive(Clone)]
pub struct TypedElementList<T> {
    items: Vec<T>,
}

impl<T: ListItem> TypedElementList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: ListItem> ElementCollection<T> for TypedElementList<T> {
    fn items(&self) -> Vec<T> {
        self.items.clone()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<T> {
        self.items.get(index).cloned()
    }

    fn add(&self, _item: T) -> Result<()> {
        Err(AdkError::Unsupported("add on a read-only list".to_string()))
    }

    fn remove(&self, _item: &T) -> Result<bool> {
        Err(AdkError::Unsupported("remove on a read-only list".to_string()))
    }

    fn clear(&self) -> Result<()> {
        Err(AdkError::Unsupported("clear on a read-only list".to_string()))
    }
}
