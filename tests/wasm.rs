#![cfg(feature = "wasm")]

use redline_text::wasm::*;
use wasm_bindgen_test::*;

#[wasm_bindgen_test(unsupported = test)]
fn test_reconcile_change() {
    let fragment = reconcile_change(
        r#"{"anchorId": "p1", "originalText": "The NROFR clause applies.", "proposedContent": "The ROFN clause applies."}"#,
        Some(r#"{"author": "Counsel", "timestamp": "2024-01-02T03:04:05Z"}"#.to_owned()),
        None,
    )
    .unwrap();

    assert!(fragment.contains(r#""strategyUsed":"TextPatch""#));
    assert!(fragment.contains(r#"w:author=\"Counsel\""#));
    assert!(fragment.contains(r#"w:date=\"2024-01-02T03:04:05Z\""#));
}

#[wasm_bindgen_test(unsupported = test)]
fn test_reconcile_change_with_context_and_policy() {
    let fragment = reconcile_change(
        r#"{"anchorId": "p2", "originalText": "", "proposedContent": "- a\n  - b", "context": {"isListItem": true, "numberingId": 12}}"#,
        None,
        Some("indentWidth: 2".to_owned()),
    )
    .unwrap();

    assert!(fragment.contains(r#""strategyUsed":"ListFragment""#));
    assert!(fragment.contains(r#"<w:ilvl w:val=\"1\"/><w:numId w:val=\"12\"/>"#));
}

#[wasm_bindgen_test(unsupported = test)]
fn test_identical_texts_have_no_changes() {
    let fragment = reconcile_change(
        r#"{"anchorId": "p3", "originalText": "Same.", "proposedContent": "Same."}"#,
        None,
        None,
    )
    .unwrap();

    assert!(fragment.contains(r#""hasChanges":false"#));
}

#[wasm_bindgen_test(unsupported = test)]
fn test_preprocess_markdown() {
    let text = preprocess_markdown("# Fees\n- **Late** fee", None).unwrap();

    assert!(text.contains(r#""cleanText":"Fees\n• Late fee""#));
}

#[wasm_bindgen_test(unsupported = test)]
fn test_validate_markup() {
    assert_eq!(validate_markup("<w:p></w:p>"), None);
    assert!(validate_markup("<w:p>").is_some());
}
