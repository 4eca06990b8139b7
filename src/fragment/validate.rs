use quick_xml::{Reader, events::Event};

use crate::errors::ReconcileError;

/// Checks generated markup before it leaves the engine: it has to be
/// well-formed, every element has to be closed, and deleted runs have to
/// carry their text in `w:delText` while live runs use `w:t`.
///
/// # Errors
///
/// * `InvalidMarkup` for syntax errors and stray closing tags.
/// * `UnbalancedMarkup` when elements are left open.
/// * `SchemaViolation` for text elements inside the wrong kind of run.
pub fn validate_markup(markup: &str) -> Result<(), ReconcileError> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().check_end_names = false;

    let mut buf = Vec::new();
    let mut open_elements: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(event)) => {
                let name = event.name().as_ref().to_vec();
                check_placement(&name, &open_elements)?;
                open_elements.push(name);
            }
            Ok(Event::Empty(event)) => check_placement(event.name().as_ref(), &open_elements)?,
            Ok(Event::End(event)) => {
                let name = event.name();
                match open_elements.pop() {
                    Some(open) if open == name.as_ref() => {}
                    _ => {
                        return Err(ReconcileError::InvalidMarkup(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(name.as_ref())
                        )));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(error) => return Err(ReconcileError::InvalidMarkup(error.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if open_elements.is_empty() {
        Ok(())
    } else {
        Err(ReconcileError::UnbalancedMarkup {
            open: open_elements.len(),
        })
    }
}

fn check_placement(name: &[u8], open_elements: &[Vec<u8>]) -> Result<(), ReconcileError> {
    let inside_deletion = open_elements.iter().any(|open| open == b"w:del");

    match name {
        b"w:t" if inside_deletion => Err(ReconcileError::SchemaViolation(
            "w:t inside a deleted run".to_owned(),
        )),
        b"w:delText" if !inside_deletion => Err(ReconcileError::SchemaViolation(
            "w:delText outside of a deletion".to_owned(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_valid_markup() {
        assert_eq!(
            validate_markup(
                r#"<w:p><w:del w:id="1"><w:r><w:delText>a</w:delText></w:r></w:del><w:r><w:t>b</w:t></w:r></w:p>"#
            ),
            Ok(())
        );
        assert_eq!(validate_markup(""), Ok(()));
    }

    #[test]
    fn test_unclosed_elements() {
        assert_eq!(
            validate_markup("<w:p><w:r>"),
            Err(ReconcileError::UnbalancedMarkup { open: 2 })
        );
    }

    #[test]
    fn test_stray_closing_tag() {
        assert!(matches!(
            validate_markup("<w:p></w:r>"),
            Err(ReconcileError::InvalidMarkup(_))
        ));
    }

    #[test]
    fn test_live_text_inside_deletion() {
        assert!(matches!(
            validate_markup("<w:del><w:r><w:t>x</w:t></w:r></w:del>"),
            Err(ReconcileError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_deleted_text_outside_deletion() {
        assert!(matches!(
            validate_markup("<w:r><w:delText>x</w:delText></w:r>"),
            Err(ReconcileError::SchemaViolation(_))
        ));
    }

    #[test]
    fn test_deleted_paragraph_mark_is_allowed() {
        assert_eq!(
            validate_markup(r#"<w:p><w:pPr><w:rPr><w:del w:id="3"/></w:rPr></w:pPr></w:p>"#),
            Ok(())
        );
    }
}
