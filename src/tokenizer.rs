pub mod symbol_table;
pub mod token;
pub mod word_tokenizer;
