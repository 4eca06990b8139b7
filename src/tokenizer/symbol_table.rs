use std::collections::HashMap;

use super::token::Token;

/// Dense identifier standing in for a distinct token, so that the diff only
/// has to compare integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

/// Interns tokens into symbols in order of first appearance. A table is
/// shared between the two sides of a diff so that equal tokens map to the
/// same symbol.
#[derive(Debug, Default)]
pub struct SymbolTable {
    ids: HashMap<String, Symbol>,
    texts: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self { Self::default() }

    pub fn intern(&mut self, token: &Token) -> Symbol {
        if let Some(symbol) = self.ids.get(token.text()) {
            return *symbol;
        }

        let symbol = Symbol(u32::try_from(self.texts.len()).unwrap_or(u32::MAX));
        self.ids.insert(token.text().to_owned(), symbol);
        self.texts.push(token.text().to_owned());

        symbol
    }

    pub fn intern_all(&mut self, tokens: &[Token]) -> Vec<Symbol> {
        tokens.iter().map(|token| self.intern(token)).collect()
    }

    /// The token text a symbol was created from.
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.texts
            .get(symbol.0 as usize)
            .map_or("", String::as_str)
    }

    pub fn len(&self) -> usize { self.texts.len() }
}
