//! Composite elements

use super::list::{ListItem, TypedElementList};
use super::{Element, ElementCore, SifElement, SimpleField};
use crate::error::{AdkError, Result};
use crate::schema::{DefHandle, SchemaRegistry};
use crate::value::converter::value_text;
use crate::value::{formatter_for, SifValue};
use crate::version::SifVersion;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

pub(crate) struct TreeNode {
    pub(super) core: ElementCore,
    value: RwLock<Option<SifValue>>,
    children: RwLock<Vec<Element>>,
}

/// An element that owns an ordered list of child elements
#[derive(Clone)]
pub struct ElementTree {
    node: Arc<TreeNode>,
}

impl ElementTree {
    /// Create an element for a composite definition.
    pub fn new(def: DefHandle) -> Result<Self> {
        if !def.kind().is_composite() {
            return Err(AdkError::invalid_cast(
                "composite element definition",
                format!("{} '{}'", def.kind().label(), def.path()),
            ));
        }
        Ok(Self::from_node(Arc::new(TreeNode {
            core: ElementCore::new(def),
            value: RwLock::new(None),
            children: RwLock::new(Vec::new()),
        })))
    }

    /// Create an element from a schema path, failing when the path is not part
    /// of `version`.
    pub fn from_path(registry: &SchemaRegistry, path: &str, version: SifVersion) -> Result<Self> {
        let def = registry.resolve(path, version).map_err(|err| match err {
            AdkError::SchemaMismatch { name, version, .. } => AdkError::SchemaMismatch {
                name,
                version,
                kind: "ElementTree",
            },
            other => other,
        })?;
        Self::new(def)
    }

    pub(crate) fn from_node(node: Arc<TreeNode>) -> Self {
        Self { node }
    }

    pub fn ptr_eq(&self, other: &ElementTree) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    fn is_self_or_ancestor(&self, candidate: &ElementTree) -> bool {
        let mut current = Some(self.clone());
        while let Some(tree) = current {
            if tree.ptr_eq(candidate) {
                return true;
            }
            current = tree.parent();
        }
        false
    }

    /// Append a child and mark this element changed.
    ///
    /// A node can only belong to one tree; adding a node that already has a
    /// parent, or one of this element's own ancestors, fails.
    pub fn add_child(&self, child: impl Into<Element>) -> Result<()> {
        let child = child.into();
        if let Element::Tree(tree) = &child {
            if self.is_self_or_ancestor(tree) {
                return Err(AdkError::InvalidOperation(format!(
                    "'{}' cannot be added beneath itself",
                    tree.name()
                )));
            }
        }
        {
            let mut children = self.node.children.write();
            if !child.core().try_set_parent(&self.node) {
                return Err(AdkError::InvalidOperation(format!(
                    "'{}' already belongs to another element",
                    child.name()
                )));
            }
            children.push(child);
        }
        self.set_changed(true);
        Ok(())
    }

    /// Detach a child. Returns whether it was found.
    pub fn remove_child(&self, child: &Element) -> bool {
        let removed = {
            let mut children = self.node.children.write();
            match children.iter().position(|c| c.ptr_eq(child)) {
                Some(pos) => Some(children.remove(pos)),
                None => None,
            }
        };
        match removed {
            Some(removed) => {
                removed.core().clear_parent();
                self.set_changed(true);
                true
            }
            None => false,
        }
    }

    /// Remove every child with the given element name; returns how many.
    pub fn remove_children_named(&self, name: &str) -> usize {
        let removed: Vec<Element> = {
            let mut children = self.node.children.write();
            let (matching, kept): (Vec<Element>, Vec<Element>) = children
                .drain(..)
                .partition(|c| c.definition().name() == name);
            *children = kept;
            matching
        };
        for child in &removed {
            child.core().clear_parent();
        }
        if !removed.is_empty() {
            self.set_changed(true);
        }
        removed.len()
    }

    /// Snapshot of the children in order
    pub fn children(&self) -> Vec<Element> {
        self.node.children.read().clone()
    }

    pub fn child_count(&self) -> usize {
        self.node.children.read().len()
    }

    /// First child with the given element name
    pub fn child(&self, name: &str) -> Option<Element> {
        self.node
            .children
            .read()
            .iter()
            .find(|c| c.definition().name() == name)
            .cloned()
    }

    pub fn children_named(&self, name: &str) -> Vec<Element> {
        self.node
            .children
            .read()
            .iter()
            .filter(|c| c.definition().name() == name)
            .cloned()
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<SimpleField> {
        self.node
            .children
            .read()
            .iter()
            .filter_map(Element::as_field)
            .find(|f| f.definition().name() == name)
            .cloned()
    }

    pub fn field_value(&self, name: &str) -> Option<SifValue> {
        self.field(name).map(|f| f.value())
    }

    /// Replace the value of the named field, adding the field when missing.
    pub fn set_field(&self, def: DefHandle, value: SifValue) -> Result<SimpleField> {
        if let Some(existing) = self.field(def.name()) {
            existing.set_value(value)?;
            return Ok(existing);
        }
        let field = SimpleField::new(def, value)?;
        self.add_child(field.clone())?;
        Ok(field)
    }

    /// Text content carried by this element itself, if any
    pub fn value(&self) -> Option<SifValue> {
        self.node.value.read().clone()
    }

    pub fn set_value(&self, value: Option<SifValue>) -> Result<()> {
        if let Some(v) = &value {
            let expected = self.definition().data_type();
            if expected != Some(v.category()) {
                return Err(AdkError::invalid_cast(
                    format!("{:?}", expected),
                    format!("{:?}", v.category()),
                ));
            }
        }
        *self.node.value.write() = value;
        self.set_changed(true);
        Ok(())
    }

    /// Key fields named by the definition, in definition order. Missing
    /// fields are skipped.
    pub fn key_fields(&self) -> Vec<SimpleField> {
        let def = self.definition();
        def.key_fields()
            .iter()
            .filter_map(|name| self.field(name))
            .collect()
    }

    /// Dot-joined latest-version text of the key fields
    pub fn key(&self) -> Option<String> {
        let def = self.definition();
        if def.key_fields().is_empty() {
            return None;
        }
        let parts: Vec<String> = def
            .key_fields()
            .iter()
            .map(|name| {
                self.field(name)
                    .and_then(|f| f.text_value())
                    .unwrap_or_default()
            })
            .collect();
        Some(parts.join("."))
    }

    /// Read-only view over the children named `name` that are `T`s.
    pub fn typed_children<T: ListItem>(&self, name: &str) -> TypedElementList<T> {
        TypedElementList::new(
            self.children_named(name)
                .iter()
                .filter_map(T::from_element)
                .collect(),
        )
    }

    /// Detached copy of this subtree. Definitions, values and flags are kept;
    /// the copy has no parent.
    pub fn deep_clone(&self) -> ElementTree {
        let copy = ElementTree::from_node(Arc::new(TreeNode {
            core: ElementCore::with_state(self.definition(), self.state()),
            value: RwLock::new(self.value()),
            children: RwLock::new(Vec::new()),
        }));
        {
            let mut children = copy.node.children.write();
            for child in self.children() {
                let child = child.deep_clone();
                child.core().set_parent(&copy.node);
                children.push(child);
            }
        }
        trace!(element = %copy.name(), "cloned element tree");
        copy
    }
}

impl SifElement for ElementTree {
    fn core(&self) -> &ElementCore {
        &self.node.core
    }

    fn text_value(&self) -> Option<String> {
        self.node
            .value
            .read()
            .as_ref()
            .and_then(|v| value_text(formatter_for(SifVersion::LATEST), v))
    }

    fn to_element(&self) -> Element {
        Element::Tree(self.clone())
    }
}

impl fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementTree")
            .field("name", &self.name())
            .field("value", &self.value())
            .field("children", &self.children())
            .finish()
    }
}
