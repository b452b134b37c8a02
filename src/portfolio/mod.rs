//! Property collection owned by a session
//!
//! An ordered list of properties keyed by ids the portfolio hands out. Ids
//! increase monotonically and are never reused, so a removed property's id
//! cannot later point at a different record.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::error::{PropcalcError, Result};
use crate::investment::{
    compute_metrics, compute_summary, PortfolioSummary, PropertyField, PropertyInput,
    PropertyMetrics,
};

/// Stable identifier of a property within a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PropertyId(pub u64);

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A property record with its identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub id: PropertyId,
    #[serde(flatten)]
    pub input: PropertyInput,
}

#[derive(Debug, Clone, Default)]
pub struct Portfolio {
    properties: Vec<Property>,
    last_id: u64,
    template: PropertyInput,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Portfolio whose `add` starts new properties from `template`
    pub fn with_template(template: PropertyInput) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    /// Append a property initialized from the template
    pub fn add(&mut self) -> PropertyId {
        let input = self.template.clone();
        self.add_with(input)
    }

    pub fn add_with(&mut self, input: PropertyInput) -> PropertyId {
        self.last_id += 1;
        let id = PropertyId(self.last_id);
        self.properties.push(Property { id, input });
        info!(%id, count = self.properties.len(), "added property");
        id
    }

    pub fn remove(&mut self, id: PropertyId) -> Result<PropertyInput> {
        let index = self
            .properties
            .iter()
            .position(|p| p.id == id)
            .ok_or(PropcalcError::PropertyNotFound(id))?;

        let removed = self.properties.remove(index);
        info!(%id, count = self.properties.len(), "removed property");
        Ok(removed.input)
    }

    pub fn update(&mut self, id: PropertyId, field: PropertyField, value: Decimal) -> Result<()> {
        let property = self
            .properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PropcalcError::PropertyNotFound(id))?;

        property.input.set(field, value)?;
        Ok(())
    }

    pub fn get(&self, id: PropertyId) -> Option<&PropertyInput> {
        self.properties
            .iter()
            .find(|p| p.id == id)
            .map(|p| &p.input)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Metrics of every property, in insertion order
    pub fn metrics(&self) -> Vec<(PropertyId, PropertyMetrics)> {
        self.properties
            .iter()
            .map(|p| (p.id, compute_metrics(&p.input)))
            .collect()
    }

    pub fn summary(&self) -> PortfolioSummary {
        compute_summary(self.properties.iter().map(|p| &p.input))
    }
}
