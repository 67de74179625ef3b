//! # Update Expressions
//!
//! A partial-update statement: a list of `field = :placeholder` assignments
//! with their values. Rendered as `SET a = :x, b = :y` for stores that take
//! expressions, or applied directly to an in-memory item.

use std::collections::BTreeMap;

use crate::codec::{Attribute, Item};

/// One `field = :placeholder` assignment
#[derive(Debug, Clone, PartialEq)]
struct Assignment {
    field: String,
    placeholder: String,
    value: Attribute,
}

/// Sparse merge of client-supplied fields into an existing record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExpression {
    assignments: Vec<Assignment>,
}

impl UpdateExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `field`. Setting the same field twice keeps the
    /// last value.
    pub fn set(
        &mut self,
        field: impl Into<String>,
        placeholder: impl Into<String>,
        value: Attribute,
    ) -> &mut Self {
        let field = field.into();
        let mut placeholder = placeholder.into();
        if !placeholder.starts_with(':') {
            placeholder.insert(0, ':');
        }

        let assignment = Assignment {
            field,
            placeholder,
            value,
        };
        match self
            .assignments
            .iter_mut()
            .find(|a| a.field == assignment.field)
        {
            Some(existing) => *existing = assignment,
            None => self.assignments.push(assignment),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Render the `SET` clause
    pub fn expression(&self) -> String {
        let clauses: Vec<String> = self
            .assignments
            .iter()
            .map(|a| format!("{} = {}", a.field, a.placeholder))
            .collect();
        format!("SET {}", clauses.join(", "))
    }

    /// Placeholder -> value bindings for the rendered clause
    pub fn values(&self) -> BTreeMap<String, Attribute> {
        self.assignments
            .iter()
            .map(|a| (a.placeholder.clone(), a.value.clone()))
            .collect()
    }

    /// Merge the assignments into `item`, leaving other fields untouched
    pub fn apply(&self, item: &mut Item) {
        for a in &self.assignments {
            item.insert(a.field.clone(), a.value.clone());
        }
    }
}
