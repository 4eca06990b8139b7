use super::token::Token;

/// Splits text on word boundaries, creating tokens of alternating words and
/// whitespace runs.
///
/// ## Example
///
/// ```not_rust
/// "Hi  there!" -> ["Hi", "  ", "there!"]
/// ```
pub fn word_tokenizer(text: &str) -> Vec<Token> {
    let mut result = Vec::new();

    let mut previous_boundary_index = 0;
    let mut previous_char_is_whitespace = text.chars().next().is_none_or(char::is_whitespace);

    for (i, c) in text.char_indices() {
        let is_current_char_whitespace = c.is_whitespace();
        if previous_char_is_whitespace != is_current_char_whitespace {
            result.push(text[previous_boundary_index..i].into());
            previous_boundary_index = i;
        }

        previous_char_is_whitespace = is_current_char_whitespace;
    }

    if previous_boundary_index < text.len() {
        result.push(text[previous_boundary_index..].into());
    }

    result
}

#[cfg(test)]
mod tests {
    use insta::assert_debug_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;

    fn texts(text: &str) -> Vec<String> {
        word_tokenizer(text)
            .iter()
            .map(|token| token.text().to_owned())
            .collect()
    }

    #[test]
    fn test_alternating_tokens() {
        assert_eq!(texts("Hi there!"), vec!["Hi", " ", "there!"]);
        assert_eq!(texts(" what? "), vec![" ", "what?", " "]);
        assert_eq!(
            texts("The NROFR\n\tclause"),
            vec!["The", " ", "NROFR", "\n\t", "clause"]
        );
        assert!(texts("").is_empty());
    }

    #[test]
    fn test_tokens_concatenate_to_input() {
        let text = " hello, \nwhere  are you? ";
        assert_eq!(texts(text).concat(), text);
    }

    #[test]
    fn test_token_debug() {
        assert_debug_snapshot!(word_tokenizer("a b"), @r#"
        [
            Token {
                text: "a",
            },
            Token {
                text: " ",
            },
            Token {
                text: "b",
            },
        ]
        "#);
    }
}
