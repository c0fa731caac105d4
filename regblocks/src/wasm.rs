//! WebAssembly bindings for the block editor
//!
//! Trees cross the boundary as JSON in the editor's vocabulary. Enable with
//! the "wasm" feature flag.

use wasm_bindgen::prelude::*;

use crate::node::{Node, validate};

/// Render a JSON array of blocks as pattern text
///
/// Trees that break a block invariant, such as a named non-capturing group,
/// are rejected rather than normalized.
#[wasm_bindgen(js_name = serializeNodes)]
pub fn serialize_nodes(json: &str) -> Result<String, JsValue> {
    serialize_json(json).map_err(|e| JsValue::from_str(&e))
}

/// Parse pattern text into `{ nodes, flags }` JSON
///
/// Rejections carry the diagnostic message as a string.
#[wasm_bindgen(js_name = parseRegex)]
pub fn parse_regex(pattern: &str, flags: &str) -> Result<String, JsValue> {
    parse_json(pattern, flags).map_err(|e| JsValue::from_str(&e))
}

/// Decompose a bracket body into a char class payload, as JSON
#[wasm_bindgen(js_name = decomposeCharClass)]
pub fn decompose_char_class(body: &str) -> Result<String, JsValue> {
    decompose_json(body).map_err(|e| JsValue::from_str(&e))
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn serialize_json(json: &str) -> Result<String, String> {
    let nodes: Vec<Node> = serde_json::from_str(json).map_err(|e| e.to_string())?;
    validate(&nodes).map_err(|e| e.to_string())?;
    Ok(crate::serialize(&nodes))
}

fn parse_json(pattern: &str, flags: &str) -> Result<String, String> {
    let parsed = crate::parse(pattern, flags).map_err(|e| e.message)?;
    serde_json::to_string(&parsed).map_err(|e| e.to_string())
}

fn decompose_json(body: &str) -> Result<String, String> {
    serde_json::to_string(&crate::decompose_char_class(body)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_serialize_editor_json() {
        let json = r#"[
            { "type": "group", "capturing": true, "nodes": [
                { "type": "charclass", "payload": { "sets": { "AZ": true } } }
            ] },
            { "type": "predef", "which": "word", "quant": { "kind": "oneOrMore", "greedy": true } }
        ]"#;
        assert_eq!(serialize_json(json).unwrap(), r"([A-Z])\w+");
    }

    #[test]
    fn test_serialize_rejects_bad_json() {
        assert!(serialize_json(r#"[{ "type": "nonsense" }]"#).is_err());
    }

    #[test]
    fn test_serialize_rejects_named_non_capturing_group() {
        let json = r#"[{ "type": "group", "capturing": false, "name": "x", "nodes": [] }]"#;
        assert_eq!(
            serialize_json(json).unwrap_err(),
            "non-capturing group cannot be named 'x'"
        );
    }

    #[test]
    fn test_parse_to_json() {
        let value: Value = serde_json::from_str(&parse_json("abc", "gi").unwrap()).unwrap();
        assert_eq!(
            value["nodes"],
            json!([{ "type": "literal", "text": "abc", "quant": { "kind": "one" } }])
        );
        assert_eq!(value["flags"]["global"], json!(true));
        assert_eq!(value["flags"]["ignoreCase"], json!(true));
    }

    #[test]
    fn test_parse_error_message() {
        assert_eq!(
            parse_json("(", "").unwrap_err(),
            "Invalid regular expression: /(/: Unterminated group"
        );
    }

    #[test]
    fn test_decompose_to_json() {
        let value: Value = serde_json::from_str(&decompose_json("a-z_.").unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "negate": false,
                "sets": {
                    "az": true, "AZ": false, "d09": false, "underscore": true, "whitespace": false
                },
                "custom": ".",
                "raw": "a-z_."
            })
        );
    }
}
