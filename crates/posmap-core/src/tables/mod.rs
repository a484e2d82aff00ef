//! Delimited text I/O for reference tables and results.

mod reader;
mod writer;

pub use reader::{
    read_document_entries, read_document_entries_from, read_lookup_table,
    read_lookup_table_from, read_product_map, read_product_map_from,
};
pub use writer::{
    write_document_entries, write_document_entries_to, write_groups, write_groups_to,
    write_unified, write_unified_to, PRODUCT_SEPARATOR,
};
