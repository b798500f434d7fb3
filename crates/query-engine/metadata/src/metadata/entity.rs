//! The entity description handed to a query option parser.

use std::collections::BTreeMap;

use super::{Metadata, ScalarType};

/// An entity set backed by one table or SQL fragment.
///
/// Entities are always open: properties that are not declared are still accepted,
/// they are just not typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityModel {
    pub name: String,
    pub properties: BTreeMap<String, ScalarType>,
}

impl EntityModel {
    /// An entity with no declared properties.
    pub fn open(name: impl Into<String>) -> Self {
        EntityModel {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// The declared type of a property, if it is declared.
    pub fn property_type(&self, name: &str) -> Option<ScalarType> {
        self.properties.get(name).copied()
    }
}

impl Metadata {
    /// Build the entity model of a table, with whatever columns are declared for it.
    pub fn entity_model(&self, table_name: &str) -> EntityModel {
        match self.tables.0.get(table_name) {
            None => EntityModel::open(table_name),
            Some(table) => EntityModel {
                name: table_name.to_string(),
                properties: table
                    .columns
                    .values()
                    .map(|column| (column.name.clone(), column.r#type))
                    .collect(),
            },
        }
    }
}
