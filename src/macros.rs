/// Builds a [`Qoid`](crate::Qoid) from a tag and `tag => value` pairs.
///
/// # Examples
///
/// ```rust
/// use qoid::{qoid, Container, Qoid};
///
/// let empty = qoid!("empty");
/// assert!(empty.is_empty());
///
/// let point = qoid!("point"; "x" => "1", "y" => "2", "x" => "3");
/// assert_eq!(point.len(), 3);
/// assert_eq!(point.all_of("x"), vec!["1", "3"]);
/// ```
#[macro_export]
macro_rules! qoid {
    // Tag only
    ($tag:expr) => {
        $crate::Qoid::new($tag)
    };

    // Tag with properties, duplicates kept in order
    ($tag:expr; $($key:expr => $value:expr),+ $(,)?) => {
        $crate::Qoid::with_properties(
            $tag,
            [$($crate::Property::new($key, $value)),+],
        )
    };
}
