//! Structural snapshots of element trees
//!
//! A [`RenderedElement`] is a version-specific view of a tree: wire tags and
//! formatted text, no definitions. Collapsed list containers are omitted in
//! SIF 1.x and their entries appear directly under the parent.

use super::{ElementTree, SifElement, SimpleField};
use crate::error::{AdkError, Result};
use crate::schema::{DefHandle, ElementDef, SchemaRegistry};
use crate::value::converter::value_text;
use crate::value::{converter_for, formatter_for};
use crate::version::SifVersion;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedElement {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedElement>,
}

impl RenderedElement {
    pub fn new(tag: impl Into<String>, text: Option<String>) -> Self {
        Self {
            tag: tag.into(),
            text,
            children: Vec::new(),
        }
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&RenderedElement> {
        self.children.iter().find(|c| c.tag == tag)
    }
}

fn collapses(def: &ElementDef, version: SifVersion) -> bool {
    def.is_collapsed() && version.is_sif1x()
}

impl ElementTree {
    /// Render this subtree for `version`. Children not defined in `version`
    /// are left out.
    pub fn render(&self, version: SifVersion) -> Result<RenderedElement> {
        let def = self.definition();
        let formatter = formatter_for(version);
        let mut rendered = RenderedElement::new(
            def.tag(version),
            self.value().and_then(|v| value_text(formatter, &v)),
        );
        self.render_children(version, &mut rendered.children)?;
        Ok(rendered)
    }

    fn render_children(&self, version: SifVersion, out: &mut Vec<RenderedElement>) -> Result<()> {
        for child in self.children() {
            let def = child.definition();
            if let Some(tree) = child.as_tree() {
                if collapses(&def, version) {
                    tree.render_children(version, out)?;
                    continue;
                }
            }
            if !def.is_supported(version) {
                continue;
            }
            match child.as_field() {
                Some(field) => out.push(RenderedElement::new(
                    def.tag(version),
                    field.text_value_for(version)?,
                )),
                None => {
                    if let Some(tree) = child.as_tree() {
                        out.push(tree.render(version)?);
                    }
                }
            }
        }
        Ok(())
    }

    /// Rebuild a data object from a snapshot, resolving the root by its tag.
    pub fn parse_rendered(
        registry: &SchemaRegistry,
        rendered: &RenderedElement,
        version: SifVersion,
    ) -> Result<ElementTree> {
        let def = registry.resolve(&rendered.tag, version)?;
        Self::parse_rendered_as(registry, def, rendered, version)
    }

    /// Rebuild a subtree from a snapshot using an already resolved definition.
    pub fn parse_rendered_as(
        registry: &SchemaRegistry,
        def: DefHandle,
        rendered: &RenderedElement,
        version: SifVersion,
    ) -> Result<ElementTree> {
        let tree = ElementTree::new(def)?;
        tree.parse_into(registry, rendered, version)?;
        Ok(tree)
    }

    fn parse_into(
        &self,
        registry: &SchemaRegistry,
        rendered: &RenderedElement,
        version: SifVersion,
    ) -> Result<()> {
        let def = self.definition();
        if let (Some(data_type), Some(text)) = (def.data_type(), rendered.text.as_deref()) {
            let value = converter_for(data_type).parse(formatter_for(version), Some(text))?;
            self.set_value(Some(value))?;
        }
        for child in &rendered.children {
            if let Some(child_def) = registry.lookup_child(&def, &child.tag, version) {
                self.attach(registry, child_def, child, version)?;
                continue;
            }
            match collapsed_host(registry, &def, &child.tag, version) {
                Some((container_def, child_def)) => {
                    let container = match self.child(container_def.name()).and_then(|c| c.as_tree().cloned()) {
                        Some(existing) => existing,
                        None => {
                            let created = ElementTree::new(container_def)?;
                            self.add_child(created.clone())?;
                            created
                        }
                    };
                    container.attach(registry, child_def, child, version)?;
                }
                None => {
                    debug!(parent = def.path(), tag = %child.tag, %version, "unknown child tag");
                    return Err(AdkError::SchemaMismatch {
                        name: format!("{}.{}", def.path(), child.tag),
                        version,
                        kind: "element",
                    });
                }
            }
        }
        Ok(())
    }

    fn attach(
        &self,
        registry: &SchemaRegistry,
        def: DefHandle,
        rendered: &RenderedElement,
        version: SifVersion,
    ) -> Result<()> {
        if def.kind().is_composite() {
            let tree = Self::parse_rendered_as(registry, def, rendered, version)?;
            return self.add_child(tree);
        }
        let data_type = def.data_type().ok_or_else(|| {
            AdkError::invalid_cast("typed definition", format!("untyped '{}'", def.path()))
        })?;
        let value = converter_for(data_type).parse(formatter_for(version), rendered.text.as_deref())?;
        self.add_child(SimpleField::new(def, value)?)
    }
}

/// Collapsed container under `parent` that defines a child tagged `tag`.
fn collapsed_host(
    registry: &SchemaRegistry,
    parent: &ElementDef,
    tag: &str,
    version: SifVersion,
) -> Option<(DefHandle, DefHandle)> {
    registry
        .children_of(parent)
        .into_iter()
        .filter(|def| collapses(def, version) && def.kind().is_composite())
        .find_map(|container| {
            registry
                .lookup_child(&container, tag, version)
                .map(|child| (container, child))
        })
}
