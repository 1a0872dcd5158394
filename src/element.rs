//! Element Tree
//!
//! In-memory model of SIF data objects. Composite nodes ([`ElementTree`])
//! own their children; every node keeps a weak back-reference to its parent
//! that is only used for change propagation and root lookup, so detached
//! subtrees are freed as soon as nothing else holds them.
//!
//! Nodes are shared handles. Structural changes and enumeration on a tree
//! take that tree's child lock; sequences of calls are not atomic, so callers
//! that need read-then-write consistency hold their own lock around them.

mod field;
mod keyed;
mod list;
mod render;
mod tree;

pub use field::SimpleField;
pub use keyed::{ElementKey, KeyedElementList, KeyedItem};
pub use list::{ElementCollection, ElementList, ListItem, TypedElementList};
pub use render::RenderedElement;
pub use tree::ElementTree;

use crate::error::{AdkError, Result};
use crate::schema::DefHandle;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::{Arc, Weak};
use tree::TreeNode;

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Per-node change tracking flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    pub changed: bool,
    pub empty: bool,
    pub do_not_encode: bool,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            changed: true,
            empty: false,
            do_not_encode: false,
        }
    }
}

/// State shared by every node kind
pub struct ElementCore {
    def: RwLock<DefHandle>,
    parent: Mutex<Weak<TreeNode>>,
    state: Mutex<ElementState>,
    #[cfg(test)]
    propagated: AtomicUsize,
}

impl ElementCore {
    fn new(def: DefHandle) -> Self {
        Self {
            def: RwLock::new(def),
            parent: Mutex::new(Weak::new()),
            state: Mutex::new(ElementState::default()),
            #[cfg(test)]
            propagated: AtomicUsize::new(0),
        }
    }

    fn with_state(def: DefHandle, state: ElementState) -> Self {
        let core = Self::new(def);
        *core.state.lock() = state;
        core
    }

    fn parent_node(&self) -> Option<Arc<TreeNode>> {
        self.parent.lock().upgrade()
    }

    fn set_parent(&self, parent: &Arc<TreeNode>) {
        *self.parent.lock() = Arc::downgrade(parent);
    }

    fn clear_parent(&self) {
        *self.parent.lock() = Weak::new();
    }

    /// Link to `parent` unless a live parent is already set. The check and the
    /// write happen under one lock.
    fn try_set_parent(&self, parent: &Arc<TreeNode>) -> bool {
        let mut current = self.parent.lock();
        if current.strong_count() > 0 {
            return false;
        }
        *current = Arc::downgrade(parent);
        true
    }

    fn mark_changed(&self, changed: bool) {
        self.state.lock().changed = changed;
        if !changed {
            return;
        }
        let mut next = self.parent_node();
        while let Some(node) = next {
            {
                let mut state = node.core.state.lock();
                if state.changed {
                    break;
                }
                state.changed = true;
            }
            #[cfg(test)]
            node.core.propagated.fetch_add(1, AtomicOrdering::SeqCst);
            next = node.core.parent_node();
        }
    }
}

/// Behaviour common to fields, trees and the [`Element`] enum.
pub trait SifElement {
    fn core(&self) -> &ElementCore;

    /// Text rendering of this node's own value with the latest formatter.
    fn text_value(&self) -> Option<String>;

    fn to_element(&self) -> Element;

    fn definition(&self) -> DefHandle {
        self.core().def.read().clone()
    }

    fn name(&self) -> String {
        self.core().def.read().name().to_string()
    }

    /// Swap in a more specific definition for the same element.
    fn set_definition(&self, def: DefHandle) -> Result<()> {
        let mut current = self.core().def.write();
        if current.name() != def.name() {
            return Err(AdkError::DefinitionConflict {
                current: current.name().to_string(),
                replacement: def.name().to_string(),
            });
        }
        *current = def;
        Ok(())
    }

    fn parent(&self) -> Option<ElementTree> {
        self.core().parent_node().map(ElementTree::from_node)
    }

    /// Topmost ancestor, or this node when it has no parent.
    fn root(&self) -> Element {
        let mut current = self.to_element();
        while let Some(parent) = current.parent() {
            current = Element::Tree(parent);
        }
        current
    }

    fn state(&self) -> ElementState {
        *self.core().state.lock()
    }

    fn is_changed(&self) -> bool {
        self.core().state.lock().changed
    }

    /// Setting `true` also marks every ancestor up to the first one that is
    /// already changed.
    fn set_changed(&self, changed: bool) {
        self.core().mark_changed(changed);
    }

    fn is_empty(&self) -> bool {
        self.core().state.lock().empty
    }

    fn set_empty(&self, empty: bool) {
        self.core().state.lock().empty = empty;
    }

    fn do_not_encode(&self) -> bool {
        self.core().state.lock().do_not_encode
    }

    fn set_do_not_encode(&self, do_not_encode: bool) {
        self.core().state.lock().do_not_encode = do_not_encode;
    }

    /// Compare text values.
    ///
    /// Two absent values are equal. When exactly one side is absent the
    /// result is `Less` whichever side that is.
    fn compare_text(&self, other: &dyn SifElement) -> Ordering {
        match (self.text_value(), other.text_value()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) | (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(&b),
        }
    }
}

/// Any node of an element tree
#[derive(Clone)]
pub enum Element {
    Field(SimpleField),
    Tree(ElementTree),
}

impl Element {
    pub fn as_field(&self) -> Option<&SimpleField> {
        match self {
            Element::Field(f) => Some(f),
            Element::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ElementTree> {
        match self {
            Element::Tree(t) => Some(t),
            Element::Field(_) => None,
        }
    }

    /// Same underlying node
    pub fn ptr_eq(&self, other: &Element) -> bool {
        match (self, other) {
            (Element::Field(a), Element::Field(b)) => a.ptr_eq(b),
            (Element::Tree(a), Element::Tree(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Detached copy; see [`SimpleField::deep_clone`] and
    /// [`ElementTree::deep_clone`].
    pub fn deep_clone(&self) -> Element {
        match self {
            Element::Field(f) => Element::Field(f.deep_clone()),
            Element::Tree(t) => Element::Tree(t.deep_clone()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Field(_) => "SimpleField",
            Element::Tree(_) => "ElementTree",
        }
    }
}

impl SifElement for Element {
    fn core(&self) -> &ElementCore {
        match self {
            Element::Field(f) => f.core(),
            Element::Tree(t) => t.core(),
        }
    }

    fn text_value(&self) -> Option<String> {
        match self {
            Element::Field(f) => f.text_value(),
            Element::Tree(t) => t.text_value(),
        }
    }

    fn to_element(&self) -> Element {
        self.clone()
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Field(field) => std::fmt::Debug::fmt(field, f),
            Element::Tree(tree) => std::fmt::Debug::fmt(tree, f),
        }
    }
}

impl From<SimpleField> for Element {
    fn from(field: SimpleField) -> Self {
        Element::Field(field)
    }
}

impl From<ElementTree> for Element {
    fn from(tree: ElementTree) -> Self {
        Element::Tree(tree)
    }
}
