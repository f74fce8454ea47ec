//! Identifier-grammar parsing
//!
//! The upstream analysis tool serializes variables and heap objects as
//! delimited strings. This grammar is a stable wire format, not an
//! implementation detail:
//!
//! - Variable: `<EnclosingClass: ReturnType method(args)>/varName`, i.e.
//!   the enclosing method between `<` and `>`, with the declaring class as
//!   the prefix before the first `:`.
//! - Heap object: one of
//!   - `<<marker>>`: synthetic objects, kept verbatim
//!   - `<Type>`: the type between the angle brackets
//!   - `.../(Tamiflex)/...>`: reflection-log objects, type between the
//!     last `/` and the last `>`
//!   - `ctx/new Type/0`: allocation sites, slash-delimited
//!
//! Inputs that do not match the grammar are returned unchanged.

/// Substring before the first `:`, the type tag embedded in variable and
/// method identifiers (`com.Foo: void bar()` → `com.Foo`).
pub fn type_tag(identifier: &str) -> &str {
    match identifier.find(':') {
        Some(pos) => &identifier[..pos],
        None => identifier,
    }
}

/// Declared type of a variable: the span between `<` and the first `:`
/// (`<com.Foo: void bar()>/v0` → `com.Foo`).
pub fn declared_type(variable: &str) -> &str {
    match (variable.find('<'), variable.find(':')) {
        (Some(open), Some(colon)) if open + 1 <= colon => &variable[open + 1..colon],
        _ => variable,
    }
}

/// Enclosing method of a variable: the span between `<` and `>`
/// (`<com.Foo: void bar()>/v0` → `com.Foo: void bar()`).
pub fn enclosing_method(variable: &str) -> &str {
    match (variable.find('<'), variable.find('>')) {
        (Some(open), Some(close)) if open + 1 <= close => &variable[open + 1..close],
        _ => variable,
    }
}

/// Heap-object type extraction over the bracket/slash grammar above.
pub fn heap_type(heap_object: &str) -> &str {
    if heap_object.starts_with("<<") {
        return heap_object;
    }
    if heap_object.starts_with('<') && heap_object.ends_with('>') {
        return enclosing_method(heap_object);
    }
    if heap_object.contains("(Tamiflex)") {
        if let (Some(slash), Some(close)) = (heap_object.rfind('/'), heap_object.rfind('>')) {
            if slash + 1 <= close {
                return &heap_object[slash + 1..close];
            }
        }
        return heap_object;
    }
    // Allocation-site form: skip the context prefix plus the "new " marker,
    // take everything up to the trailing slash-delimited counter.
    if let (Some(first), Some(last)) = (heap_object.find('/'), heap_object.rfind('/')) {
        let start = first + 5; // '/' + "new "
        if start <= last && heap_object.is_char_boundary(start) {
            return &heap_object[start..last];
        }
    }
    heap_object
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag() {
        assert_eq!(type_tag("com.Foo: void bar()"), "com.Foo");
        assert_eq!(type_tag("no-colon-here"), "no-colon-here");
        assert_eq!(type_tag(":leading"), "");
    }

    #[test]
    fn test_declared_type() {
        assert_eq!(declared_type("<com.Foo: void bar()>/v0"), "com.Foo");
        assert_eq!(declared_type("plain"), "plain");
    }

    #[test]
    fn test_enclosing_method() {
        assert_eq!(
            enclosing_method("<com.Foo: void bar(int)>/$r3"),
            "com.Foo: void bar(int)"
        );
        assert_eq!(enclosing_method("no-brackets"), "no-brackets");
    }

    #[test]
    fn test_heap_type_synthetic_marker() {
        assert_eq!(heap_type("<<string-constant>>"), "<<string-constant>>");
    }

    #[test]
    fn test_heap_type_bracketed() {
        assert_eq!(heap_type("<java.lang.String>"), "java.lang.String");
    }

    #[test]
    fn test_heap_type_tamiflex() {
        assert_eq!(
            heap_type("com.Foo: void bar()(Tamiflex)/java.util.HashMap>"),
            "java.util.HashMap"
        );
    }

    // A reflection-log object wrapped in one bracket pair reads as a
    // bracketed type, not a Tamiflex entry.
    #[test]
    fn test_heap_type_bracketed_wins_over_tamiflex() {
        assert_eq!(
            heap_type("<com.Foo: void bar()(Tamiflex)/java.util.HashMap>"),
            "com.Foo: void bar()(Tamiflex)/java.util.HashMap"
        );
    }

    #[test]
    fn test_heap_type_allocation_site() {
        assert_eq!(
            heap_type("<com.Foo: void bar()>/new java.lang.Object/0"),
            "java.lang.Object"
        );
    }

    #[test]
    fn test_heap_type_out_of_grammar() {
        assert_eq!(heap_type("garbage"), "garbage");
    }
}
