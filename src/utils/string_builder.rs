use std::str::Chars;

/// Rebuilds a text from its original by replaying retained, deleted and
/// inserted runs front to back. Lengths count `char`s, never bytes.
#[derive(Debug)]
pub struct StringBuilder<'a> {
    remaining: Chars<'a>,
    output: String,
}

impl<'a> StringBuilder<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            remaining: original.chars(),
            output: String::with_capacity(original.len()),
        }
    }

    /// Appends text that is not part of the original.
    pub fn insert(&mut self, text: &str) { self.output.push_str(text); }

    /// Drops the next `length` characters of the original.
    pub fn delete(&mut self, length: usize) {
        if let Some(last) = length.checked_sub(1) {
            self.remaining.nth(last);
        }
    }

    /// Copies the next `length` characters of the original.
    pub fn retain(&mut self, length: usize) {
        self.output.extend(self.remaining.by_ref().take(length));
    }

    /// Hands out everything built so far and starts over with an empty
    /// output.
    pub fn take(&mut self) -> String { std::mem::take(&mut self.output) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_string_builder() {
        let mut builder = StringBuilder::new("Tenant shall pay rent.");

        builder.retain(13);
        builder.insert("promptly ");
        builder.retain(4);
        builder.delete(5);
        builder.insert("the rent.");

        assert_eq!(builder.take(), "Tenant shall promptly pay the rent.");
    }

    #[test]
    fn test_empty_original() {
        let mut builder = StringBuilder::new("");

        builder.insert("clause");
        builder.retain(3);
        assert_eq!(builder.take(), "clause");
    }

    #[test]
    fn test_unicode_characters() {
        let mut builder = StringBuilder::new("Straße über");

        builder.retain(6);
        builder.delete(1);
        builder.insert("—");
        builder.retain(4);

        assert_eq!(builder.take(), "Straße—über");
    }

    #[test]
    fn test_take_is_incremental() {
        let mut builder = StringBuilder::new("abcdef");

        builder.retain(2);
        assert_eq!(builder.take(), "ab");

        builder.delete(2);
        builder.retain(2);
        assert_eq!(builder.take(), "ef");
    }
}
