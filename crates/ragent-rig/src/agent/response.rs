//! Recovery of the JSON object in a model reply.

use serde_json::Value;

use crate::{Error, Result};

/// Returns the JSON object carried by a model reply.
///
/// Structured-output deployments reply with a bare object, which is accepted
/// as-is even when its strings contain backticks or braces. Anything else is
/// searched for an object inside a markdown fence, then between the outermost
/// braces.
pub(crate) fn parse_object(reply: &str) -> Result<Value> {
    let reply = reply.trim();

    let direct = match serde_json::from_str::<Value>(reply) {
        Ok(value @ Value::Object(_)) => return Ok(value),
        Ok(other) => format!("expected a JSON object, got {}", kind(&other)),
        Err(e) => format!("invalid JSON: {e}"),
    };

    fenced_blocks(reply)
        .chain(outer_braces(reply))
        .find_map(|candidate| match serde_json::from_str(candidate) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        })
        .ok_or_else(|| Error::parse(direct))
}

/// Contents of each ``` fence, minus a leading language tag.
fn fenced_blocks(reply: &str) -> impl Iterator<Item = &str> {
    reply
        .split("```")
        .skip(1)
        .step_by(2)
        .map(|block| match block.split_once('\n') {
            Some((tag, body)) if !tag.trim_start().starts_with('{') => body.trim(),
            _ => block.trim(),
        })
}

fn outer_braces(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (start < end).then(|| &reply[start..=end])
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_object() {
        let value = parse_object(r#" {"answer": "yes"} "#).unwrap();
        assert_eq!(value, json!({ "answer": "yes" }));
    }

    #[test]
    fn bare_object_with_backticks_in_strings() {
        let reply = r#"{"answer": "Use ```json``` blocks and {braces} freely", "confidence": 1}"#;
        let value = parse_object(reply).unwrap();
        assert_eq!(value["answer"], "Use ```json``` blocks and {braces} freely");
    }

    #[test]
    fn json_fence() {
        let reply = "Here you go:\n```json\n{\"answer\": \"yes\"}\n```";
        assert_eq!(parse_object(reply).unwrap()["answer"], "yes");
    }

    #[test]
    fn untagged_fence() {
        assert_eq!(
            parse_object("```\n{\"answer\": \"yes\"}\n```").unwrap()["answer"],
            "yes"
        );
        assert_eq!(
            parse_object("```{\"answer\": \"inline\"}```").unwrap()["answer"],
            "inline"
        );
    }

    #[test]
    fn skips_fences_without_an_object() {
        let reply = "Run ```az login``` first.\n```json\n{\"answer\": \"yes\"}\n```";
        assert_eq!(parse_object(reply).unwrap()["answer"], "yes");
    }

    #[test]
    fn object_inside_prose() {
        let reply = r#"The result is {"answer": "yes"} as requested."#;
        assert_eq!(parse_object(reply).unwrap()["answer"], "yes");
    }

    #[test]
    fn prose_is_a_parse_error() {
        assert!(matches!(
            parse_object("I cannot help with that."),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn non_object_json_is_a_parse_error() {
        let result = parse_object(r#"["answer", 0.5]"#);
        assert!(matches!(result, Err(Error::Parse(message)) if message.contains("an array")));
    }
}
