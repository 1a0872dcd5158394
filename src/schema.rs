//! Schema Definitions
//!
//! Metadata describing SIF elements and attributes: names per version,
//! sequence, repeatability and datatype. Element trees only hold a
//! [`DefHandle`]; they never inspect the registry internals.
//!
//! The registry is an explicit object. An agent builds one at startup (or
//! loads a generated one) and passes it by reference to whatever constructs
//! elements from wire data.

use crate::error::{AdkError, Result};
use crate::value::SifDataType;
use crate::version::SifVersion;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Shared, non-null reference to element metadata
pub type DefHandle = Arc<ElementDef>;

/// What kind of node a definition describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    /// A top-level data object such as `StudentPersonal`
    Object,
    /// An element with child elements
    Complex,
    /// A simple element carrying a single value
    Field(SifDataType),
    /// An XML attribute
    Attribute(SifDataType),
}

impl DefKind {
    pub fn label(&self) -> &'static str {
        match self {
            DefKind::Object => "object",
            DefKind::Complex => "element",
            DefKind::Field(_) => "field",
            DefKind::Attribute(_) => "attribute",
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, DefKind::Object | DefKind::Complex)
    }
}

/// Metadata for one element or attribute
#[derive(Debug, Clone)]
pub struct ElementDef {
    name: String,
    path: String,
    parent_path: Option<String>,
    kind: DefKind,
    sequence: u32,
    repeatable: bool,
    collapsed: bool,
    earliest: SifVersion,
    latest: Option<SifVersion>,
    renames: BTreeMap<SifVersion, String>,
    key_fields: Vec<String>,
    value_type: Option<SifDataType>,
}

impl ElementDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the object root, e.g. `StudentPersonal.Name.LastName`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent_path(&self) -> Option<&str> {
        self.parent_path.as_deref()
    }

    pub fn kind(&self) -> DefKind {
        self.kind
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// List containers that are omitted from the wire in some versions
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, DefKind::Attribute(_))
    }

    /// Datatype of the value this node carries, if any.
    pub fn data_type(&self) -> Option<SifDataType> {
        match self.kind {
            DefKind::Field(t) | DefKind::Attribute(t) => Some(t),
            DefKind::Object | DefKind::Complex => self.value_type,
        }
    }

    pub fn key_fields(&self) -> &[String] {
        &self.key_fields
    }

    pub fn is_supported(&self, version: SifVersion) -> bool {
        version >= self.earliest && self.latest.map_or(true, |latest| version <= latest)
    }

    /// Tag name used on the wire for `version`.
    pub fn tag(&self, version: SifVersion) -> &str {
        self.renames
            .range(..=version)
            .next_back()
            .map(|(_, tag)| tag.as_str())
            .unwrap_or(&self.name)
    }
}

/// Builder for [`ElementDef`]
#[derive(Debug, Clone)]
pub struct ElementDefBuilder {
    name: String,
    kind: DefKind,
    sequence: u32,
    repeatable: bool,
    collapsed: bool,
    earliest: SifVersion,
    latest: Option<SifVersion>,
    renames: BTreeMap<SifVersion, String>,
    key_fields: Vec<String>,
    value_type: Option<SifDataType>,
}

impl ElementDefBuilder {
    fn new(name: &str, kind: DefKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            sequence: 0,
            repeatable: false,
            collapsed: false,
            earliest: SifVersion::EARLIEST,
            latest: None,
            renames: BTreeMap::new(),
            key_fields: Vec::new(),
            value_type: None,
        }
    }

    pub fn object(name: &str) -> Self {
        Self::new(name, DefKind::Object)
    }

    pub fn complex(name: &str) -> Self {
        Self::new(name, DefKind::Complex)
    }

    pub fn field(name: &str, data_type: SifDataType) -> Self {
        Self::new(name, DefKind::Field(data_type))
    }

    pub fn attribute(name: &str, data_type: SifDataType) -> Self {
        Self::new(name, DefKind::Attribute(data_type))
    }

    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn collapsed(mut self) -> Self {
        self.collapsed = true;
        self
    }

    pub fn since(mut self, version: SifVersion) -> Self {
        self.earliest = version;
        self
    }

    pub fn until(mut self, version: SifVersion) -> Self {
        self.latest = Some(version);
        self
    }

    /// Use `tag` on the wire from `version` onward.
    pub fn renamed(mut self, version: SifVersion, tag: &str) -> Self {
        self.renames.insert(version, tag.to_string());
        self
    }

    pub fn keys<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Complex elements that also carry text content
    pub fn with_value(mut self, data_type: SifDataType) -> Self {
        self.value_type = Some(data_type);
        self
    }

    fn build(self, parent_path: Option<String>) -> ElementDef {
        let path = match &parent_path {
            Some(parent) => format!("{}.{}", parent, self.name),
            None => self.name.clone(),
        };
        ElementDef {
            name: self.name,
            path,
            parent_path,
            kind: self.kind,
            sequence: self.sequence,
            repeatable: self.repeatable,
            collapsed: self.collapsed,
            earliest: self.earliest,
            latest: self.latest,
            renames: self.renames,
            key_fields: self.key_fields,
            value_type: self.value_type,
        }
    }
}

/// Lookup table of element definitions keyed by dotted path
#[derive(Default)]
pub struct SchemaRegistry {
    defs: RwLock<HashMap<String, DefHandle>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under `parent_path` (or as a root object when
    /// `None`).
    pub fn define(&self, parent_path: Option<&str>, builder: ElementDefBuilder) -> Result<DefHandle> {
        let mut defs = self.defs.write();
        if let Some(parent) = parent_path {
            match defs.get(parent) {
                Some(p) if p.kind().is_composite() => {}
                Some(_) => {
                    return Err(AdkError::InvalidOperation(format!(
                        "'{}' cannot have children",
                        parent
                    )))
                }
                None => {
                    return Err(AdkError::InvalidOperation(format!(
                        "parent '{}' is not defined",
                        parent
                    )))
                }
            }
        }
        let def = Arc::new(builder.build(parent_path.map(str::to_string)));
        if defs.contains_key(def.path()) {
            return Err(AdkError::InvalidOperation(format!(
                "'{}' is already defined",
                def.path()
            )));
        }
        defs.insert(def.path().to_string(), def.clone());
        Ok(def)
    }

    pub fn lookup(&self, path: &str) -> Option<DefHandle> {
        self.defs.read().get(path).cloned()
    }

    /// Resolve a path for `version`, failing with a schema mismatch when it is
    /// unknown or not part of that version.
    pub fn resolve(&self, path: &str, version: SifVersion) -> Result<DefHandle> {
        match self.lookup(path) {
            Some(def) if def.is_supported(version) => Ok(def),
            Some(def) => {
                debug!(path, %version, "definition not supported in version");
                Err(AdkError::SchemaMismatch {
                    name: path.to_string(),
                    version,
                    kind: def.kind().label(),
                })
            }
            None => {
                debug!(path, %version, "definition not found");
                Err(AdkError::SchemaMismatch {
                    name: path.to_string(),
                    version,
                    kind: "element",
                })
            }
        }
    }

    /// Resolve a child of `parent` by its wire tag in `version`.
    pub fn lookup_child(&self, parent: &ElementDef, tag: &str, version: SifVersion) -> Option<DefHandle> {
        self.children_of(parent)
            .into_iter()
            .find(|def| def.is_supported(version) && def.tag(version) == tag)
    }

    /// Children of `parent` in sequence order.
    pub fn children_of(&self, parent: &ElementDef) -> Vec<DefHandle> {
        let mut children: Vec<DefHandle> = self
            .defs
            .read()
            .values()
            .filter(|def| def.parent_path() == Some(parent.path()))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.sequence().cmp(&b.sequence()).then_with(|| a.name().cmp(b.name())));
        children
    }

    pub fn len(&self) -> usize {
        self.defs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.read().is_empty()
    }
}
