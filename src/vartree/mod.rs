pub mod insert;
pub mod qname;
pub mod resolve;
pub mod scope;
pub mod store;
pub mod update;

use store::{ColumnKind, Schema};

/// Column names shared by every variable panel's store
pub mod columns {
    pub const NAME: &str = "name";
    pub const VALUE: &str = "value";
    pub const TYPE: &str = "type";
    pub const CHANGED: &str = "changed";
    pub const QNAME: &str = "qname";
    pub const INTERNAL: &str = "internal";
}

/// The schema every variable panel hands to its own store instance
pub fn variable_schema() -> Schema {
    Schema::new()
        .column(columns::NAME, ColumnKind::Text)
        .column(columns::VALUE, ColumnKind::Text)
        .column(columns::TYPE, ColumnKind::Text)
        .column(columns::CHANGED, ColumnKind::Flag)
        .column(columns::QNAME, ColumnKind::Text)
        .column(columns::INTERNAL, ColumnKind::Text)
}
