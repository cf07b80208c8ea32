//! Prompt template for the disclosure compliance check.

/// Instruction sent to the model. `{text}` is replaced with the user's text.
pub const COMPLIANCE_PROMPT: &str = r#"あなたは台湾のAIコンテンツ規制に関するコンプライアンスチェッカーです。提供されたテキストを分析し、コンテンツがAIによって生成された、またはディープフェイク技術を使用していることを明確に示しているかどうかを判断してください。

規制では、「AI生成」、「AIによる作成」、「ディープフェイク技術使用」などの明確な文言が必要です。

以下のテキストを分析し、指定されたJSON形式で結果を返してください。
- isCompliant: 規制に準拠している場合はtrue、していない場合はfalse。
- reason: あなたの判断の理由を簡潔に日本語で説明してください。
- detectedPhrases: 準拠の根拠となった具体的な文言を配列でリストアップしてください。準拠していない場合は空の配列にしてください。

テキスト:
---
{text}
---
"#;

/// Embed `text` verbatim into the compliance prompt.
///
/// The template is scanned once, so placeholder-like sequences inside `text`
/// are left untouched.
pub fn render_compliance_prompt(text: &str) -> String {
    COMPLIANCE_PROMPT.replacen("{text}", text, 1)
}
