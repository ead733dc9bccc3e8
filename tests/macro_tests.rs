use structured_yaml::{render, structured, Number, StructuredMap, StructuredValue};

#[test]
fn test_structured_macro_null() {
    assert_eq!(structured!(null), StructuredValue::Null);
}

#[test]
fn test_structured_macro_booleans() {
    assert_eq!(structured!(true), StructuredValue::Bool(true));
    assert_eq!(structured!(false), StructuredValue::Bool(false));
}

#[test]
fn test_structured_macro_numbers() {
    assert_eq!(structured!(42), StructuredValue::Number(Number::Integer(42)));
    assert_eq!(structured!(3.5), StructuredValue::Number(Number::Float(3.5)));
    assert_eq!(structured!(-123), StructuredValue::Number(Number::Integer(-123)));
    assert_eq!(
        structured!(u64::MAX),
        StructuredValue::Number(Number::BigInt(u64::MAX.into()))
    );
}

#[test]
fn test_structured_macro_strings() {
    assert_eq!(structured!("hello"), StructuredValue::String("hello".to_string()));

    let owned = String::from("owned");
    assert_eq!(structured!(owned), StructuredValue::from("owned"));
}

#[test]
fn test_structured_macro_sequences() {
    assert_eq!(structured!([]), StructuredValue::Sequence(vec![]));
    assert_eq!(
        structured!([1, "two", null, [true]]),
        StructuredValue::Sequence(vec![
            StructuredValue::from(1),
            StructuredValue::from("two"),
            StructuredValue::Null,
            StructuredValue::Sequence(vec![StructuredValue::Bool(true)]),
        ])
    );
}

#[test]
fn test_structured_macro_mappings() {
    let value = structured!({
        "name": "Alice",
        "age": 30,
        "delta": (-2),
        "tags": ["a", "b"],
        "meta": {}
    });

    let mut expected = StructuredMap::new();
    expected.insert("name".to_string(), StructuredValue::from("Alice"));
    expected.insert("age".to_string(), StructuredValue::from(30));
    expected.insert("delta".to_string(), StructuredValue::from(-2));
    expected.insert(
        "tags".to_string(),
        StructuredValue::Sequence(vec![StructuredValue::from("a"), StructuredValue::from("b")]),
    );
    expected.insert("meta".to_string(), StructuredValue::Mapping(StructuredMap::new()));

    assert_eq!(value, StructuredValue::Mapping(expected));
}

#[test]
fn test_structured_macro_trailing_commas() {
    let value = structured!({ "a": [1, 2,], });
    assert_eq!(render(&value).unwrap(), "a:\n  - 1\n  - 2\n");
}

#[test]
fn test_structured_macro_expressions() {
    let count = 3;
    let maybe: Option<&str> = None;
    let value = structured!({ "count": count, "maybe": maybe });
    assert_eq!(value.get("count").and_then(StructuredValue::as_i64), Some(3));
    assert_eq!(value.get("maybe"), Some(&StructuredValue::Null));
}
