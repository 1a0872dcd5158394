//! Leaf elements holding a single typed value

use super::{Element, ElementCore, SifElement};
use crate::error::{AdkError, Result};
use crate::schema::{DefHandle, SchemaRegistry};
use crate::value::{converter_for, formatter_for, SifDataType, SifValue, TypeConverter};
use crate::version::SifVersion;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

struct FieldNode {
    core: ElementCore,
    value: RwLock<SifValue>,
}

/// A simple element or attribute and its value
#[derive(Clone)]
pub struct SimpleField {
    node: Arc<FieldNode>,
}

fn declared_type(def: &DefHandle) -> Result<SifDataType> {
    if def.kind().is_composite() {
        return Err(AdkError::invalid_cast(
            "field or attribute definition",
            format!("{} '{}'", def.kind().label(), def.path()),
        ));
    }
    def.data_type().ok_or_else(|| {
        AdkError::invalid_cast("typed definition", format!("untyped '{}'", def.path()))
    })
}

fn check_category(expected: SifDataType, value: &SifValue) -> Result<()> {
    if value.category() != expected {
        return Err(AdkError::invalid_cast(
            format!("{:?}", expected),
            format!("{:?}", value.category()),
        ));
    }
    Ok(())
}

impl SimpleField {
    /// Bind a value to a field definition. The value's category must match
    /// the declared datatype; absence is expressed by an absent value.
    pub fn new(def: DefHandle, value: SifValue) -> Result<Self> {
        check_category(declared_type(&def)?, &value)?;
        Ok(Self {
            node: Arc::new(FieldNode {
                core: ElementCore::new(def),
                value: RwLock::new(value),
            }),
        })
    }

    pub fn from_path(
        registry: &SchemaRegistry,
        path: &str,
        version: SifVersion,
        value: SifValue,
    ) -> Result<Self> {
        let def = registry.resolve(path, version).map_err(|err| match err {
            AdkError::SchemaMismatch { name, version, .. } => AdkError::SchemaMismatch {
                name,
                version,
                kind: "SimpleField",
            },
            other => other,
        })?;
        Self::new(def, value)
    }

    pub fn ptr_eq(&self, other: &SimpleField) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Converter for the declared datatype
    pub fn converter(&self) -> &'static dyn TypeConverter {
        converter_for(self.value().category())
    }

    pub fn value(&self) -> SifValue {
        self.node.value.read().clone()
    }

    /// Replace the value and mark the field changed.
    pub fn set_value(&self, value: SifValue) -> Result<()> {
        check_category(declared_type(&self.definition())?, &value)?;
        *self.node.value.write() = value;
        self.set_changed(true);
        Ok(())
    }

    /// Wire text for `version`; `None` when the value is absent.
    pub fn text_value_for(&self, version: SifVersion) -> Result<Option<String>> {
        self.converter()
            .to_text(formatter_for(version), &self.node.value.read())
    }

    /// Parse wire text for `version` through the field's converter.
    pub fn set_text_value(&self, text: Option<&str>, version: SifVersion) -> Result<()> {
        let data_type = declared_type(&self.definition())?;
        let value = converter_for(data_type).parse(formatter_for(version), text)?;
        self.set_value(value)
    }

    /// Detached copy with the same definition, value and flags.
    pub fn deep_clone(&self) -> SimpleField {
        Self {
            node: Arc::new(FieldNode {
                core: ElementCore::with_state(self.definition(), self.state()),
                value: RwLock::new(self.value()),
            }),
        }
    }
}

impl SifElement for SimpleField {
    fn core(&self) -> &ElementCore {
        &self.node.core
    }

    fn text_value(&self) -> Option<String> {
        self.text_value_for(SifVersion::LATEST).ok().flatten()
    }

    fn to_element(&self) -> Element {
        Element::Field(self.clone())
    }
}

impl fmt::Debug for SimpleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleField")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}
