use serde::Serialize;
use structured_yaml::{
    check, process, structured, validate, Constraint, PipelineError, Schema, StructuredValue,
    ValidationError,
};

#[derive(Serialize)]
struct User {
    name: String,
    age: i64,
    email: Option<String>,
    roles: Vec<String>,
}

fn user() -> User {
    User {
        name: "Alice".to_string(),
        age: 34,
        email: None,
        roles: vec!["admin".to_string()],
    }
}

fn user_schema() -> Schema {
    Schema::mapping()
        .required("name", Schema::string().min_length(1).max_length(64))
        .required("age", Schema::integer().non_negative().maximum(150.0))
        .optional("email", Schema::nullable(Schema::string()))
        .required(
            "roles",
            Schema::sequence(Schema::string().one_of(["admin", "user", "guest"])).min_items(1),
        )
        .deny_unknown()
}

fn violation(value: &StructuredValue, schema: &Schema) -> (String, String) {
    match validate(value, Some(schema)).unwrap_err() {
        ValidationError::ConstraintViolated { path, rule } => (path.to_string(), rule),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_valid_user() {
    assert!(check(&user(), Some(&user_schema())).is_ok());
}

#[test]
fn test_each_rule_reports_its_name() {
    let schema = user_schema();
    let cases = [
        (structured!({ "name": "", "age": 1, "roles": ["user"] }), "name", "min-length: 1"),
        (structured!({ "name": "a", "age": (-1), "roles": ["user"] }), "age", "non-negative"),
        (structured!({ "name": "a", "age": 151, "roles": ["user"] }), "age", "maximum: 150"),
        (structured!({ "name": "a", "age": 1.5, "roles": ["user"] }), "age", "type: integer"),
        (structured!({ "name": "a", "age": 1, "roles": [] }), "roles", "min-items: 1"),
        (structured!({ "name": "a", "age": 1, "roles": ["root"] }), "roles[0]", "one-of: [admin, user, guest]"),
        (structured!({ "name": "a", "age": 1, "roles": ["user"], "extra": 1 }), "extra", "unknown-field"),
        (structured!({ "name": "a", "roles": ["user"] }), "age", "required"),
        (structured!({ "name": "a", "age": 1, "roles": ["user"], "email": 5 }), "email", "type: string"),
    ];

    for (value, path, rule) in cases {
        assert_eq!(violation(&value, &schema), (path.to_string(), rule.to_string()));
    }
}

#[test]
fn test_length_counts_characters() {
    let schema = Schema::string().max_length(3);
    assert!(validate(&structured!("äöü"), Some(&schema)).is_ok());
    assert!(validate(&structured!("äöüß"), Some(&schema)).is_err());
}

#[test]
fn test_number_bounds() {
    let schema = Schema::number().minimum(0.5).maximum(1.5);
    assert!(validate(&structured!(0.5), Some(&schema)).is_ok());
    assert!(validate(&structured!(1), Some(&schema)).is_ok());
    assert_eq!(violation(&structured!(0.25), &schema).1, "minimum: 0.5");

    let positive = Schema::integer().positive();
    assert_eq!(violation(&structured!(0), &positive).1, "positive");
    assert!(validate(&StructuredValue::from(u64::MAX), Some(&positive)).is_ok());
}

#[test]
fn test_any_accepts_everything() {
    let schema = Schema::mapping().required("payload", Schema::any());
    for payload in [structured!(null), structured!([1, [2]]), structured!({ "x": "y" })] {
        let mut value = structured_yaml::StructuredMap::new();
        value.insert("payload".to_string(), payload);
        assert!(validate(&StructuredValue::Mapping(value), Some(&schema)).is_ok());
    }
}

#[test]
fn test_schema_from_yaml() {
    let schema: Schema = serde_yaml::from_str(
        "\
type: mapping
deny_unknown: true
fields:
  age:
    required: true
    schema:
      type: integer
      rules:
        - non-negative
        - maximum: 150
  tags:
    schema:
      type: sequence
      items:
        type: string
      rules:
        - max-items: 2
",
    )
    .unwrap();

    assert_eq!(
        schema,
        Schema::mapping()
            .required("age", Schema::integer().non_negative().maximum(150.0))
            .optional("tags", Schema::sequence(Schema::string()).max_items(2))
            .deny_unknown()
    );

    let err = process(&structured!({ "age": (-5) }), Some(&schema)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Validate(ValidationError::ConstraintViolated { .. })
    ));
}

#[test]
fn test_schema_serializes_compactly() {
    let schema = Schema::sequence(Schema::integer()).with_rule(Constraint::MaxItems(3));
    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "type": "sequence",
            "items": { "type": "integer" },
            "rules": [{ "max-items": 3 }]
        })
    );
}
