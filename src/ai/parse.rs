//! Chat completion envelope and classifier payload decoding

use serde::Deserialize;
use serde_json::Value;
use crate::{
    errors::{OracleError, OracleResult},
    network::truncate,
    types::{ClassifierOpinion, RiskMask},
};

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

fn malformed(model: &str, reason: impl Into<String>) -> OracleError {
    OracleError::MalformedClassifierResponse {
        model: model.to_string(),
        reason: reason.into(),
    }
}

/// Text of `choices[0].message.content`.
pub fn extract_content(model: &str, body: Value) -> OracleResult<String> {
    let completion: ChatCompletion = serde_json::from_value(body)
        .map_err(|e| malformed(model, format!("invalid completion envelope: {}", e)))?;

    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| malformed(model, "response did not include choices"))?;

    let text = match choice.message.content {
        Value::String(text) => text,
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    };

    if text.trim().is_empty() {
        return Err(malformed(model, "empty message content"));
    }
    Ok(text)
}

/// Validates `{"flags": [int], "reasoning": string}` and folds the flags.
pub fn parse_opinion(model: &str, content: &str) -> OracleResult<ClassifierOpinion> {
    let payload: Value = serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        malformed(
            model,
            format!("content is not JSON ({}): {}", e, truncate(content, 120)),
        )
    })?;

    let Value::Object(fields) = payload else {
        return Err(malformed(model, "content is not a JSON object"));
    };

    let raw_flags = match fields.get("flags") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_u64().ok_or_else(|| malformed(model, format!("flag {} is not a non-negative integer", item))))
            .collect::<OracleResult<Vec<u64>>>()?,
        Some(other) => return Err(malformed(model, format!("flags must be an array, got {}", other))),
        None => return Err(malformed(model, "missing flags")),
    };

    let reasoning = match fields.get("reasoning") {
        Some(Value::String(text)) => text.clone(),
        Some(_) => return Err(malformed(model, "reasoning must be a string")),
        None => return Err(malformed(model, "missing reasoning")),
    };

    let mask = RiskMask::fold_raw(&raw_flags)
        .map_err(|raw| malformed(model, format!("unknown risk flag value {}", raw)))?;

    // fold_raw already bounded every value to the known bits
    let flags = raw_flags.into_iter().map(|raw| raw as u32).collect();

    Ok(ClassifierOpinion {
        flags,
        mask,
        reasoning,
    })
}

// Some backends wrap JSON mode output in a markdown fence
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_choice_content() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "{\"flags\":[],\"reasoning\":\"ok\"}" } }]
        });
        let content = extract_content("gpt-4o-mini", body).unwrap();
        let opinion = parse_opinion("gpt-4o-mini", &content).unwrap();
        assert!(opinion.mask.is_empty());
        assert_eq!(opinion.reasoning, "ok");
    }

    #[test]
    fn folds_flags_into_mask() {
        let opinion = parse_opinion("m", r#"{"flags":[32,128],"reasoning":"fake USDC"}"#).unwrap();
        assert_eq!(opinion.flags, vec![32, 128]);
        assert_eq!(opinion.mask.bits(), 160);
    }

    #[test]
    fn accepts_fenced_json() {
        let opinion = parse_opinion("m", "```json\n{\"flags\":[16],\"reasoning\":\"trap\"}\n```").unwrap();
        assert_eq!(opinion.mask.bits(), 16);
    }

    #[test]
    fn rejects_malformed_payloads() {
        let cases = [
            "not json",
            "[1, 2]",
            r#"{"reasoning":"no flags"}"#,
            r#"{"flags":"16","reasoning":"x"}"#,
            r#"{"flags":[1.5],"reasoning":"x"}"#,
            r#"{"flags":[-1],"reasoning":"x"}"#,
            r#"{"flags":[2048],"reasoning":"x"}"#,
            r#"{"flags":[1]}"#,
            r#"{"flags":[1],"reasoning":42}"#,
        ];
        for content in cases {
            assert!(
                matches!(parse_opinion("m", content), Err(OracleError::MalformedClassifierResponse { .. })),
                "accepted {}",
                content
            );
        }
    }

    #[test]
    fn empty_choices_is_malformed() {
        assert!(extract_content("m", json!({ "choices": [] })).is_err());
        assert!(extract_content("m", json!({ "error": "rate limited" })).is_err());
    }
}
