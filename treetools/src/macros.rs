/// Build a [`Value`](crate::Value) tree from a literal-like syntax.
///
/// - `[a, b]` builds a `List`
/// - `(a, b)` builds a `Tuple`
/// - `{k: v}` builds a `Map`; keys go through [`Key::from`](crate::Key)
/// - `null` builds `Null`
/// - anything else goes through `Value::from`
///
/// Elements and map entries must be single token trees; wrap other
/// expressions in braces, e.g. `[{-1}, {x + 1}]`.
///
/// ```
/// use treetools::{Value, tree};
///
/// let t = tree!({1: {"foo": "bar"}, 2: [null, (true, 1.5)]});
/// assert_eq!(t.to_string(), r#"{1: {"foo": "bar"}, 2: [null, (true, 1.5)]}"#);
/// assert_eq!(tree!([{-1}]), Value::List(vec![Value::Int(-1)]));
/// ```
#[macro_export]
macro_rules! tree {
    (null) => {
        $crate::Value::Null
    };
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(::std::vec![$($crate::tree!($elem)),*])
    };
    (( $($elem:tt),* $(,)? )) => {
        $crate::Value::Tuple(::std::vec![$($crate::tree!($elem)),*])
    };
    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::Map::new();
        $(
            map.insert($crate::Key::from($key), $crate::tree!($value));
        )*
        $crate::Value::Map(map)
    }};
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
