pub mod list_parser;
pub mod numbering;
pub mod reconciliation_plan;
pub mod table_parser;
