//! Table layout shared by the criteria translation and the query renderer

use crate::criteria::{Column, Join};

/// How an entity is read: base table, selected columns, joins needed to
/// materialise its DTO, and the properties clients may sort on.
#[derive(Debug)]
pub struct EntityTable {
    pub table: &'static str,
    pub id: Column,
    pub select: &'static [&'static str],
    pub eager_joins: &'static [Join],
    pub sortable: &'static [(&'static str, Column)],
}

impl EntityTable {
    pub fn sort_column(&self, property: &str) -> Option<Column> {
        self.sortable
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, column)| *column)
    }

    pub fn sort_properties(&self) -> Vec<&'static str> {
        self.sortable.iter().map(|(name, _)| *name).collect()
    }
}

pub mod company {
    use super::*;

    pub const TABLE: &str = "company";
    pub const ID: Column = Column::new(TABLE, "id");
    pub const NAME: Column = Column::new(TABLE, "name");

    pub const ENTITY: EntityTable = EntityTable {
        table: TABLE,
        id: ID,
        select: &["company.id", "company.name"],
        eager_joins: &[],
        sortable: &[("id", ID), ("name", NAME)],
    };
}

pub mod computer {
    use super::*;

    pub const TABLE: &str = "computer";
    pub const ID: Column = Column::new(TABLE, "id");
    pub const NAME: Column = Column::new(TABLE, "name");
    pub const INTRODUCED: Column = Column::new(TABLE, "introduced");
    pub const REMOVED: Column = Column::new(TABLE, "removed");
    pub const HARDWARE: Column = Column::new(TABLE, "hardware");
    pub const SOFTWARE: Column = Column::new(TABLE, "software");
    pub const COMPANY_ID: Column = Column::new(TABLE, "company_id");

    /// computer.company_id -> company.id
    pub const COMPANY_JOIN: Join = Join {
        table: super::company::TABLE,
        alias: "company",
        owner: COMPANY_ID,
        key: super::company::ID,
    };

    pub const ENTITY: EntityTable = EntityTable {
        table: TABLE,
        id: ID,
        select: &[
            "computer.id",
            "computer.name",
            "computer.introduced",
            "computer.removed",
            "computer.hardware",
            "computer.software",
            "computer.company_id",
            "company.name AS company_name",
        ],
        eager_joins: &[COMPANY_JOIN],
        sortable: &[
            ("id", ID),
            ("name", NAME),
            ("introduced", INTRODUCED),
            ("removed", REMOVED),
            ("hardware", HARDWARE),
            ("software", SOFTWARE),
            ("company.id", super::company::ID),
            ("company.name", super::company::NAME),
        ],
    };
}
