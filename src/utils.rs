pub mod common_affix;
pub mod string_builder;
pub mod whitespace;
