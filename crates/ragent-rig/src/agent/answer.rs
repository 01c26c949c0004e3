//! The structured answer contract.

use jsonschema::Validator;
use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::config::REFUSAL;
use super::response::parse_object;
use crate::{Error, Result};

/// Final output of the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct StructuredAnswer {
    /// Answer grounded in the retrieved policy text.
    pub answer: String,
    /// Self-reported confidence between 0 and 1.
    #[schemars(range(min = 0.0, max = 1.0))]
    pub confidence: f32,
}

impl StructuredAnswer {
    /// Creates an answer.
    pub fn new(answer: impl Into<String>, confidence: f32) -> Self {
        Self {
            answer: answer.into(),
            confidence,
        }
    }

    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::validation(format!(
                "confidence {} is outside [0, 1]",
                self.confidence
            )));
        }
        Ok(())
    }

    /// Returns whether the model declined to answer.
    pub fn is_refusal(&self) -> bool {
        self.answer.trim() == REFUSAL
    }
}

/// JSON schema for [`StructuredAnswer`] plus its compiled validator.
pub struct AnswerSchema {
    schema: Value,
    validator: Validator,
}

impl AnswerSchema {
    /// Name advertised in the response format.
    pub const NAME: &'static str = "StructuredAnswer";

    /// Generates and compiles the schema.
    pub fn new() -> Result<Self> {
        let mut generator = SchemaSettings::draft07().into_generator();
        let schema = serde_json::to_value(generator.root_schema_for::<StructuredAnswer>())?;
        let validator = Validator::new(&schema)
            .map_err(|e| Error::config(format!("invalid answer schema: {e}")))?;

        Ok(Self { schema, validator })
    }

    /// Returns the schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Builds the `response_format` request parameter.
    ///
    /// Validation happens locally, so the service is not asked for strict mode.
    pub fn response_format(&self) -> Value {
        let mut schema = self.schema.clone();
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
        }

        json!({
            "type": "json_schema",
            "json_schema": {
                "name": Self::NAME,
                "schema": schema,
                "strict": false,
            }
        })
    }

    /// Parses and validates a final reply.
    pub fn parse(&self, content: &str) -> Result<StructuredAnswer> {
        let value = parse_object(content)?;

        let errors: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|e| e.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(Error::validation(errors.join("; ")));
        }

        let answer: StructuredAnswer = serde_json::from_value(value)
            .map_err(|e| Error::validation(format!("unexpected answer shape: {e}")))?;
        answer.validate()?;
        Ok(answer)
    }
}

impl std::fmt::Debug for AnswerSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerSchema")
            .field("name", &Self::NAME)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> AnswerSchema {
        AnswerSchema::new().unwrap()
    }

    #[test]
    fn schema_requires_both_fields() {
        let schema = schema();
        let required = schema.schema()["required"].as_array().unwrap();
        assert!(required.contains(&json!("answer")));
        assert!(required.contains(&json!("confidence")));
        assert_eq!(schema.schema()["additionalProperties"], json!(false));
    }

    #[test]
    fn response_format_drops_meta_schema() {
        let format = schema().response_format();
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "StructuredAnswer");
        assert_eq!(format["json_schema"]["strict"], false);
        assert!(format["json_schema"]["schema"].get("$schema").is_none());
        assert_eq!(
            format["json_schema"]["schema"]["required"],
            schema().schema()["required"]
        );
    }

    #[test]
    fn parses_valid_answer() {
        let answer = schema()
            .parse(r#"{"answer": "Health checks are mandatory.", "confidence": 0.9}"#)
            .unwrap();
        assert_eq!(answer, StructuredAnswer::new("Health checks are mandatory.", 0.9));
    }

    #[test]
    fn parses_answer_quoting_backticks() {
        let answer = schema()
            .parse(r#"{"answer": "Submit the form titled ```Medical Fitness``` to HR.", "confidence": 0.9}"#)
            .unwrap();
        assert_eq!(answer.answer, "Submit the form titled ```Medical Fitness``` to HR.");
        assert_eq!(answer.confidence, 0.9);
    }

    #[test]
    fn parses_fenced_answer() {
        let answer = schema()
            .parse("```json\n{\"answer\": \"Yes.\", \"confidence\": 0.5}\n```")
            .unwrap();
        assert_eq!(answer, StructuredAnswer::new("Yes.", 0.5));
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let result = schema().parse(r#"{"answer": "x", "confidence": 1.5}"#);
        assert!(matches!(result, Err(Error::Validation(_))));

        let result = schema().parse(r#"{"answer": "x", "confidence": -0.1}"#);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn rejects_missing_and_extra_fields() {
        assert!(schema().parse(r#"{"answer": "x"}"#).is_err());
        assert!(
            schema()
                .parse(r#"{"answer": "x", "confidence": 0.5, "sources": []}"#)
                .is_err()
        );
    }

    #[test]
    fn rejects_prose() {
        assert!(matches!(
            schema().parse("The policy says yes."),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn detects_refusal() {
        assert!(StructuredAnswer::new(REFUSAL, 0.0).is_refusal());
        assert!(!StructuredAnswer::new("Yes.", 0.8).is_refusal());
    }

    #[test]
    fn validate_rejects_nan() {
        assert!(StructuredAnswer::new("x", f32::NAN).validate().is_err());
        assert!(StructuredAnswer::new("x", 1.0).validate().is_ok());
    }
}
