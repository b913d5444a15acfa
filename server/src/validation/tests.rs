use super::{PAYMENT_CONFIG, SchemaRegistry, ValidationError};
use serde_json::json;
use tempfile::TempDir;

fn registry() -> SchemaRegistry {
    SchemaRegistry::with_builtin_schemas().unwrap()
}

fn violations(result: Result<(), ValidationError>) -> super::SchemaViolations {
    match result {
        Err(ValidationError::Schema(violations)) => violations,
        other => panic!("expected schema violations, got {other:?}"),
    }
}

#[tokio::test]
async fn test_builtin_payment_config_registered() {
    let registry = registry();
    assert!(registry.has_schema(PAYMENT_CONFIG).await);
    assert!(!registry.has_schema("unknown_type").await);
    assert_eq!(registry.types().await, vec![PAYMENT_CONFIG.to_string()]);
}

#[tokio::test]
async fn test_validate_payment_config_accepts_valid_document() {
    let registry = registry();
    let result = registry
        .validate(PAYMENT_CONFIG, &json!({"max_limit": 1000, "enabled": true}))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_validate_payment_config_wrong_type() {
    let registry = registry();
    let violations = violations(
        registry
            .validate(PAYMENT_CONFIG, &json!({"max_limit": "x", "enabled": true}))
            .await,
    );
    assert!(violations.contains_field("max_limit"));
}

#[tokio::test]
async fn test_validate_payment_config_missing_field() {
    let registry = registry();
    let violations = violations(
        registry
            .validate(PAYMENT_CONFIG, &json!({"max_limit": 1000}))
            .await,
    );
    assert!(violations.to_string().contains("enabled"));
}

#[tokio::test]
async fn test_validate_payment_config_additional_property() {
    let registry = registry();
    let violations = violations(
        registry
            .validate(
                PAYMENT_CONFIG,
                &json!({"max_limit": 1000, "enabled": true, "extra": 1}),
            )
            .await,
    );
    assert!(violations.to_string().contains("extra"));
}

#[tokio::test]
async fn test_validate_payment_config_rejects_float_limits() {
    let registry = registry();

    let fractional = violations(
        registry
            .validate(PAYMENT_CONFIG, &json!({"max_limit": 1000.5, "enabled": true}))
            .await,
    );
    assert!(fractional.contains_field("max_limit"));

    let integral = violations(
        registry
            .validate(PAYMENT_CONFIG, &json!({"max_limit": 1000.0, "enabled": true}))
            .await,
    );
    assert!(integral.contains_field("max_limit"));
}

#[tokio::test]
async fn test_validate_aggregates_every_violation() {
    let registry = registry();
    let violations = violations(
        registry
            .validate(
                PAYMENT_CONFIG,
                &json!({"max_limit": "x", "enabled": "yes", "extra": 1}),
            )
            .await,
    );

    assert!(violations.len() >= 3);
    assert!(violations.contains_field("max_limit"));
    assert!(violations.contains_field("enabled"));
    assert!(violations.to_string().contains("; "));
}

#[tokio::test]
async fn test_validate_unknown_type() {
    let registry = registry();
    let result = registry.validate("unknown_type", &json!({"some": "data"})).await;
    assert_eq!(
        result,
        Err(ValidationError::UnknownType("unknown_type".to_string()))
    );
}

#[tokio::test]
async fn test_register_schema_and_validate() {
    let registry = registry();
    registry
        .register_schema(
            "feature_flags",
            json!({
                "type": "object",
                "properties": {"dark_mode": {"type": "boolean"}},
                "required": ["dark_mode"]
            }),
        )
        .await
        .unwrap();

    assert!(registry.has_schema("feature_flags").await);
    assert!(
        registry
            .validate("feature_flags", &json!({"dark_mode": true}))
            .await
            .is_ok()
    );
    assert!(
        registry
            .validate("feature_flags", &json!({"dark_mode": 1}))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_register_schema_replaces_previous() {
    let registry = registry();
    let document = json!({"max_limit": 1000, "enabled": true, "currency": "EUR"});
    assert!(registry.validate(PAYMENT_CONFIG, &document).await.is_err());

    let relaxed = json!({
        "type": "object",
        "properties": {
            "max_limit": {"type": "integer"},
            "enabled": {"type": "boolean"},
            "currency": {"type": "string"}
        },
        "required": ["max_limit", "enabled"]
    });
    registry
        .register_schema(PAYMENT_CONFIG, relaxed.clone())
        .await
        .unwrap();

    assert!(registry.validate(PAYMENT_CONFIG, &document).await.is_ok());
    assert_eq!(registry.schema_definition(PAYMENT_CONFIG).await, Some(relaxed));
}

#[tokio::test]
async fn test_register_invalid_schema_keeps_previous() {
    let registry = registry();
    let result = registry
        .register_schema(PAYMENT_CONFIG, json!({"type": 12}))
        .await;

    assert!(matches!(
        result,
        Err(ValidationError::SchemaCompile { ref config_type, .. }) if config_type == PAYMENT_CONFIG
    ));
    assert!(
        registry
            .validate(PAYMENT_CONFIG, &json!({"max_limit": 1, "enabled": false}))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_register_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("rate_limits.json"),
        r#"{"type": "object", "properties": {"rps": {"type": "integer"}}, "required": ["rps"]}"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();

    let registry = registry();
    let registered = registry.register_dir(dir.path()).await.unwrap();

    assert_eq!(registered, vec!["rate_limits".to_string()]);
    assert!(registry.has_schema("rate_limits").await);
    assert!(registry.validate("rate_limits", &json!({"rps": 50})).await.is_ok());
}

#[tokio::test]
async fn test_register_dir_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();

    let registry = registry();
    let err = registry.register_dir(dir.path()).await.unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}
