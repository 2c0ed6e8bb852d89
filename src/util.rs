//! Shared utility functions
//!
//! Common utilities used across multiple modules to avoid duplication.

/// Prefix for methods named by count (`method1`, `method2`, ...)
pub const COUNTED_METHOD_PREFIX: &str = "method";

/// Convert snake_case to PascalCase
///
/// # Examples
/// ```
/// use stubgen::util::to_pascal_case;
/// assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
/// assert_eq!(to_pascal_case("foo"), "Foo");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Check that `s` can name a method: a letter or underscore, then word
/// characters, with an optional trailing `?`, `!` or `=`
///
/// # Examples
/// ```
/// use stubgen::util::is_identifier;
/// assert!(is_identifier("find_user"));
/// assert!(is_identifier("valid?"));
/// assert!(!is_identifier("1st"));
/// assert!(!is_identifier(""));
/// ```
pub fn is_identifier(s: &str) -> bool {
    let body = s.strip_suffix(['?', '!', '=']).unwrap_or(s);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Name of the `index`-th (1-based) counted method
///
/// # Examples
/// ```
/// use stubgen::util::counted_method_name;
/// assert_eq!(counted_method_name(3), "method3");
/// ```
pub fn counted_method_name(index: usize) -> String {
    format!("{}{}", COUNTED_METHOD_PREFIX, index)
}
