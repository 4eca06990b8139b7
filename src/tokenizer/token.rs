/// A word or a whitespace run of a text. Concatenating the tokens of a text
/// gives back the text itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    text: String,
}

impl From<&str> for Token {
    fn from(text: &str) -> Self { Token::new(text.to_owned()) }
}

impl Token {
    pub fn new(text: String) -> Self { Token { text } }

    pub fn text(&self) -> &str { &self.text }
}
