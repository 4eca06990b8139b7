//! Expose the reconciliation engine to WebAssembly. Every value crosses the
//! boundary as JSON with camelCase keys.

use wasm_bindgen::prelude::*;

use crate::{BuildOptions, ChangeRequest, ReconcilePolicy};

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc<'_> = wee_alloc::WeeAlloc::INIT;

fn parse_json<T: serde::de::DeserializeOwned>(what: &str, json: &str) -> Result<T, JsError> {
    serde_json::from_str(json).map_err(|error| JsError::new(&format!("Invalid {what}: {error}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|error| JsError::new(&error.to_string()))
}

fn policy_from(policy_yaml: Option<String>) -> Result<ReconcilePolicy, JsError> {
    policy_yaml.map_or_else(
        || Ok(ReconcilePolicy::default()),
        |yaml| ReconcilePolicy::from_yaml_str(&yaml).map_err(|error| JsError::new(&error.to_string())),
    )
}

/// WASM wrapper around `crate::reconcile_change`.
///
/// # Arguments
///
/// - `request`: A JSON `ChangeRequest`.
/// - `options`: JSON `BuildOptions`, defaults when omitted.
/// - `policy`: A YAML `ReconcilePolicy`, defaults when omitted.
///
/// # Returns
///
/// The JSON `Fragment`.
///
/// # Errors
///
/// If any argument cannot be parsed.
#[wasm_bindgen(js_name = reconcileChange)]
pub fn reconcile_change(request: &str, options: Option<String>, policy: Option<String>) -> Result<String, JsError> {
    set_panic_hook();

    let request: ChangeRequest = parse_json("change request", request)?;
    let options: BuildOptions = match options {
        Some(options) => parse_json("build options", &options)?,
        None => BuildOptions::default(),
    };
    let policy = policy_from(policy)?;

    to_json(&crate::reconcile_change(&request, &options, &policy))
}

/// WASM wrapper around `crate::preprocess`, for hosts that only accept plain
/// text plus range formatting.
///
/// # Errors
///
/// If the policy cannot be parsed.
#[wasm_bindgen(js_name = preprocessMarkdown)]
pub fn preprocess_markdown(content: &str, policy: Option<String>) -> Result<String, JsError> {
    set_panic_hook();

    to_json(&crate::preprocess(content, &policy_from(policy)?))
}

/// Returns the validation error of `markup`, or nothing when it is valid.
#[wasm_bindgen(js_name = validateMarkup)]
#[must_use]
pub fn validate_markup(markup: &str) -> Option<String> {
    set_panic_hook();

    crate::validate_markup(markup).err().map(|error| error.to_string())
}

fn set_panic_hook() {
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
