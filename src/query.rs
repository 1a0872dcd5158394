//! Queries
//!
//! SIF_Query conditions over a data object, with optional field
//! restrictions. Queries can be evaluated against an in-memory
//! [`ElementTree`]; condition values are parsed with the converter of the
//! field they test, so comparisons follow the field's datatype rather than
//! its text.

use crate::element::{Element, ElementTree, SifElement};
use crate::error::AdkError;
use crate::value::{compare_values, converter_for, formatter_for, SifValue};
use crate::version::SifVersion;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessOrEquals,
    GreaterOrEquals,
}

impl ComparisonOperator {
    /// SIF_Operator token
    pub fn sif_name(self) -> &'static str {
        match self {
            ComparisonOperator::Equals => "EQ",
            ComparisonOperator::NotEquals => "NE",
            ComparisonOperator::LessThan => "LT",
            ComparisonOperator::GreaterThan => "GT",
            ComparisonOperator::LessOrEquals => "LE",
            ComparisonOperator::GreaterOrEquals => "GE",
        }
    }

    fn accepts(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (ComparisonOperator::NotEquals, None) => true,
            (_, None) => false,
            (ComparisonOperator::Equals, Some(o)) => o == Ordering::Equal,
            (ComparisonOperator::NotEquals, Some(o)) => o != Ordering::Equal,
            (ComparisonOperator::LessThan, Some(o)) => o == Ordering::Less,
            (ComparisonOperator::GreaterThan, Some(o)) => o == Ordering::Greater,
            (ComparisonOperator::LessOrEquals, Some(o)) => o != Ordering::Greater,
            (ComparisonOperator::GreaterOrEquals, Some(o)) => o != Ordering::Less,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sif_name())
    }
}

impl FromStr for ComparisonOperator {
    type Err = AdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EQ" => Ok(ComparisonOperator::Equals),
            "NE" => Ok(ComparisonOperator::NotEquals),
            "LT" => Ok(ComparisonOperator::LessThan),
            "GT" => Ok(ComparisonOperator::GreaterThan),
            "LE" => Ok(ComparisonOperator::LessOrEquals),
            "GE" => Ok(ComparisonOperator::GreaterOrEquals),
            other => Err(AdkError::Unsupported(format!("query operator '{}'", other))),
        }
    }
}

/// How the members of a condition group combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupOperator {
    #[default]
    And,
    Or,
    /// A group holding a single condition
    None,
}

/// `field op value`, where `field` is a dotted path relative to the object
/// (`Name.LastName`); a leading object name is accepted and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: ComparisonOperator,
    pub value: String,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: ComparisonOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Test the condition against `object`. Unknown fields and values that
    /// do not parse as the field's datatype never match.
    pub fn evaluate(&self, object: &ElementTree) -> bool {
        let Some(actual) = resolve_value(object, &self.field) else {
            debug!(field = %self.field, "query field not present");
            return false;
        };
        let formatter = formatter_for(SifVersion::LATEST);
        let expected = match converter_for(actual.category()).parse(formatter, Some(self.value.as_str())) {
            Ok(value) => value,
            Err(err) => {
                debug!(field = %self.field, error = %err, "query value does not parse");
                return false;
            }
        };
        self.operator.accepts(compare_values(&actual, &expected))
    }
}

/// Element path relative to an object named `object`: a leading object name
/// is skipped and attribute `@` markers are dropped.
pub(crate) fn relative_path(object: &str, path: &str) -> String {
    let mut segments: Vec<&str> = path
        .split('.')
        .map(|segment| segment.trim_start_matches('@'))
        .collect();
    if segments.len() > 1 && segments[0] == object {
        segments.remove(0);
    }
    segments.join(".")
}

fn resolve_value(object: &ElementTree, path: &str) -> Option<SifValue> {
    let path = relative_path(&object.name(), path);
    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = segments.split_last()?;
    let mut current = object.clone();
    for segment in parents {
        current = current.child(segment)?.as_tree()?.clone();
    }
    match current.child(last)? {
        Element::Field(field) => Some(field.value()),
        Element::Tree(tree) => tree.value(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
    pub groups: Vec<ConditionGroup>,
}

impl ConditionGroup {
    pub fn new(operator: GroupOperator) -> Self {
        Self {
            operator,
            ..Self::default()
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_group(mut self, group: ConditionGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.groups.iter().all(ConditionGroup::is_empty)
    }

    /// An empty group matches everything.
    pub fn evaluate(&self, object: &ElementTree) -> bool {
        let mut results = self
            .conditions
            .iter()
            .map(|c| c.evaluate(object))
            .chain(self.groups.iter().map(|g| g.evaluate(object)));
        match self.operator {
            GroupOperator::Or if !self.is_empty() => results.any(|r| r),
            _ => results.all(|r| r),
        }
    }
}

/// A SIF_Query for one object type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    object: String,
    root: Option<ConditionGroup>,
    field_restrictions: Vec<String>,
    versions: Vec<SifVersion>,
}

impl Query {
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            root: None,
            field_restrictions: Vec::new(),
            versions: Vec::new(),
        }
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    /// Add a condition to the root group, creating an `And` group first.
    pub fn add_condition(&mut self, field: &str, operator: ComparisonOperator, value: &str) {
        self.root
            .get_or_insert_with(|| ConditionGroup::new(GroupOperator::And))
            .conditions
            .push(Condition::new(field, operator, value));
    }

    pub fn set_conditions(&mut self, root: ConditionGroup) {
        self.root = Some(root);
    }

    pub fn conditions(&self) -> Option<&ConditionGroup> {
        self.root.as_ref()
    }

    pub fn has_conditions(&self) -> bool {
        self.root.as_ref().map_or(false, |root| !root.is_empty())
    }

    /// Limit returned objects to these element paths.
    pub fn add_field_restriction(&mut self, path: &str) {
        if !self.field_restrictions.iter().any(|p| p == path) {
            self.field_restrictions.push(path.to_string());
        }
    }

    pub fn field_restrictions(&self) -> &[String] {
        &self.field_restrictions
    }

    pub fn has_field_restrictions(&self) -> bool {
        !self.field_restrictions.is_empty()
    }

    /// Versions the response may be rendered in; empty means any.
    pub fn with_versions(mut self, versions: impl IntoIterator<Item = SifVersion>) -> Self {
        self.versions = versions.into_iter().collect();
        self
    }

    pub fn versions(&self) -> &[SifVersion] {
        &self.versions
    }

    pub fn accepts_version(&self, version: SifVersion) -> bool {
        self.versions.is_empty() || self.versions.contains(&version)
    }

    /// Whether `object` is of the queried type and satisfies the conditions.
    pub fn evaluate(&self, object: &ElementTree) -> bool {
        if object.name() != self.object {
            return false;
        }
        self.root.as_ref().map_or(true, |root| root.evaluate(object))
    }
}
