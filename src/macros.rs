/// Builds a [`StructuredValue`](crate::StructuredValue) from a JSON-like literal.
///
/// Mapping keys keep the order they are written in.
///
/// ```rust
/// use structured_yaml::{structured, StructuredValue};
///
/// let value = structured!({
///     "name": "John Doe",
///     "hobbies": ["reading", "coding"],
///     "manager": null
/// });
/// assert_eq!(value.get("manager"), Some(&StructuredValue::Null));
/// ```
#[macro_export]
macro_rules! structured {
    (null) => {
        $crate::StructuredValue::Null
    };

    (true) => {
        $crate::StructuredValue::Bool(true)
    };

    (false) => {
        $crate::StructuredValue::Bool(false)
    };

    ([]) => {
        $crate::StructuredValue::Sequence(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::StructuredValue::Sequence(vec![$($crate::structured!($elem)),*])
    };

    ({}) => {
        $crate::StructuredValue::Mapping($crate::StructuredMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut mapping = $crate::StructuredMap::new();
        $(
            mapping.insert($key.to_string(), $crate::structured!($value));
        )*
        $crate::StructuredValue::Mapping(mapping)
    }};

    // Scalars and any expression with a `From` conversion
    ($other:expr) => {
        $crate::StructuredValue::from($other)
    };
}
