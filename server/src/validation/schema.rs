use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use std::collections::HashSet;

use super::error::FieldViolation;

const ROOT_FIELD: &str = "(root)";

/// A schema definition together with its compiled validator
pub struct CompiledSchema {
    definition: Value,
    validator: jsonschema::Validator,
}

impl CompiledSchema {
    /// Compile a JSON Schema definition. The definition is checked against
    /// the draft meta-schema, so structurally invalid schemas are rejected.
    pub fn compile(definition: Value) -> Result<Self, String> {
        let validator = jsonschema::validator_for(&definition).map_err(|e| e.to_string())?;
        Ok(Self {
            definition,
            validator,
        })
    }

    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// Check a document and report every violation, not just the first.
    ///
    /// Fields declared `"integer"` additionally reject numbers that carry a
    /// floating-point representation, even when integral (`1000.0`).
    pub fn check(&self, document: &Value) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        // Fields already rejected for their type; a float there is not reported twice
        let mut type_errors = HashSet::new();

        for err in self.validator.iter_errors(document) {
            let field = field_label(&err.instance_path.to_string());
            if matches!(err.kind, ValidationErrorKind::Type { .. }) {
                type_errors.insert(field.clone());
            }
            violations.push(FieldViolation::new(field, err.to_string()));
        }

        let mut float_integers = Vec::new();
        collect_float_integers(&self.definition, document, &mut Vec::new(), &mut float_integers);
        violations.extend(
            float_integers
                .into_iter()
                .filter(|violation| !type_errors.contains(&violation.field)),
        );

        violations
    }
}

/// Turn a JSON pointer (`/a/0/b`) into the dotted field label (`a.0.b`)
fn field_label(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        ROOT_FIELD.to_string()
    } else {
        trimmed.replace('/', ".")
    }
}

fn declares_strict_integer(schema: &Value) -> bool {
    match schema.get("type") {
        Some(Value::String(kind)) => kind == "integer",
        Some(Value::Array(kinds)) => {
            kinds.iter().any(|k| k.as_str() == Some("integer"))
                && !kinds.iter().any(|k| k.as_str() == Some("number"))
        }
        _ => false,
    }
}

fn collect_float_integers(
    schema: &Value,
    instance: &Value,
    path: &mut Vec<String>,
    out: &mut Vec<FieldViolation>,
) {
    if declares_strict_integer(schema) && matches!(instance, Value::Number(n) if n.is_f64()) {
        let field = if path.is_empty() {
            ROOT_FIELD.to_string()
        } else {
            path.join(".")
        };
        out.push(FieldViolation::new(
            field,
            format!("{instance} is not of type \"integer\" (floating-point representation)"),
        ));
    }

    if let (Some(properties), Value::Object(fields)) =
        (schema.get("properties").and_then(Value::as_object), instance)
    {
        for (key, property_schema) in properties {
            if let Some(child) = fields.get(key) {
                path.push(key.clone());
                collect_float_integers(property_schema, child, path, out);
                path.pop();
            }
        }
    }

    if let (Some(items), Value::Array(elements)) =
        (schema.get("items").filter(|items| items.is_object()), instance)
    {
        for (index, child) in elements.iter().enumerate() {
            path.push(index.to_string());
            collect_float_integers(items, child, path, out);
            path.pop();
        }
    }
}
