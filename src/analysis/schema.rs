//! Structured-output schema declared to Gemini.

use serde_json::{json, Value};

/// Response schema requiring `isCompliant`, `reason` and `detectedPhrases`.
///
/// Uses Gemini's OpenAPI subset (upper-case type names).
pub fn compliance_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isCompliant": {
                "type": "BOOLEAN",
                "description": "コンテンツが表示義務に準拠しているか"
            },
            "reason": {
                "type": "STRING",
                "description": "判断理由（日本語）"
            },
            "detectedPhrases": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "コンプライアンスの根拠として検出されたフレーズ"
            }
        },
        "required": ["isCompliant", "reason", "detectedPhrases"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fields_required() {
        let schema = compliance_response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required, vec!["isCompliant", "reason", "detectedPhrases"]);
    }

    #[test]
    fn declares_field_types() {
        let schema = compliance_response_schema();
        let props = &schema["properties"];
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(props["isCompliant"]["type"], "BOOLEAN");
        assert_eq!(props["reason"]["type"], "STRING");
        assert_eq!(props["detectedPhrases"]["type"], "ARRAY");
        assert_eq!(props["detectedPhrases"]["items"]["type"], "STRING");
    }
}
