use proptest::prelude::*;
use scopeview::vartree::qname::{parse_qualified_name, NameElement, QNameError};
use test_case::test_case;

#[test]
fn test_arrow_chain_marks_pointers() {
    // "a.b->c": b is a pointer (c was reached from it with ->), and c is a
    // pointer member; nothing else is marked.
    let elements = parse_qualified_name("a.b->c").unwrap();
    assert_eq!(elements.len(), 3);

    assert_eq!(elements[0].name(), "a");
    assert!(!elements[0].is_pointer());
    assert!(!elements[0].is_pointer_member());

    assert_eq!(elements[1].name(), "b");
    assert!(elements[1].is_pointer());
    assert!(!elements[1].is_pointer_member());

    assert_eq!(elements[2].name(), "c");
    assert!(!elements[2].is_pointer());
    assert!(elements[2].is_pointer_member());
}

#[test_case("count", &["count"] ; "flat name")]
#[test_case("order.total", &["order", "total"] ; "dot access")]
#[test_case("order.customer.name", &["order", "customer", "name"] ; "deep dot access")]
#[test_case("req->id", &["req", "id"] ; "arrow access")]
#[test_case("a.b->c.d", &["a", "b", "c", "d"] ; "mixed separators")]
#[test_case(" a . b ", &["a", "b"] ; "whitespace trimmed")]
fn test_element_texts(input: &str, expected: &[&str]) {
    let elements = parse_qualified_name(input).unwrap();
    let names: Vec<&str> = elements.iter().map(NameElement::name).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_leading_star_marks_final_element() {
    let elements = parse_qualified_name("*cursor").unwrap();
    assert_eq!(elements.len(), 1);
    assert!(elements[0].is_pointer());

    let elements = parse_qualified_name("*list.head").unwrap();
    assert_eq!(elements.len(), 2);
    assert!(!elements[0].is_pointer());
    assert!(elements[1].is_pointer());
}

#[test]
fn test_template_and_scope_characters_accepted() {
    let elements = parse_qualified_name("map<std::string, int>.size").unwrap();
    assert_eq!(elements[0].name(), "map<std::string, int>");
    assert_eq!(elements[1].name(), "size");
}

#[test_case("a[0]" ; "brackets")]
#[test_case("a.b = c" ; "assignment")]
#[test_case("a;b" ; "semicolon")]
#[test_case("a&b" ; "ampersand")]
fn test_foreign_characters_are_parse_failures(input: &str) {
    assert!(matches!(
        parse_qualified_name(input),
        Err(QNameError::UnexpectedCharacter { .. })
    ));
}

#[test]
fn test_degenerate_inputs_fail_without_panicking() {
    assert!(matches!(parse_qualified_name(""), Err(QNameError::EmptyInput)));
    assert!(matches!(
        parse_qualified_name("   "),
        Err(QNameError::EmptyInput)
    ));
    assert!(matches!(
        parse_qualified_name(".a"),
        Err(QNameError::EmptyElement { .. })
    ));
    assert!(matches!(
        parse_qualified_name("a..b"),
        Err(QNameError::EmptyElement { .. })
    ));
    assert!(matches!(
        parse_qualified_name("a->"),
        Err(QNameError::EmptyElement { .. })
    ));
    assert!(matches!(
        parse_qualified_name("*"),
        Err(QNameError::EmptyElement { .. })
    ));
}

/// Re-join parsed elements with the separators implied by their pointer
/// flags; for well-formed names this must reproduce the input.
fn rejoin(elements: &[NameElement]) -> String {
    let mut out = String::new();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            out.push_str(if elements[i - 1].is_pointer() { "->" } else { "." });
        }
        out.push_str(element.name());
    }
    out
}

proptest! {
    /// Parse/re-join round trip over names built from alphanumeric and
    /// underscore segments joined by '.' and '->'.
    #[test]
    fn prop_round_trip(segments in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..6),
                       arrows in prop::collection::vec(any::<bool>(), 5)) {
        let mut input = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                input.push_str(if arrows[i - 1] { "->" } else { "." });
            }
            input.push_str(segment);
        }

        let elements = parse_qualified_name(&input).unwrap();
        prop_assert_eq!(elements.len(), segments.len());
        prop_assert_eq!(rejoin(&elements), input);
    }

    /// The parser never panics, whatever the input.
    #[test]
    fn prop_no_panic(input in "\\PC{0,40}") {
        let _ = parse_qualified_name(&input);
    }
}
