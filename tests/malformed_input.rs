use rstest::rstest;
use spanjson::{parse, parse_reverse, parse_with_options, Anomaly, Error, Kind, ParseOptions};

#[test_log::test]
fn unclosed_containers_keep_partial_tree() {
    let doc = parse(r#"{"a":[1,2"#).unwrap();
    assert!(!doc.is_well_formed());
    assert_eq!(doc.anomalies(), [Anomaly::UnclosedContainers { open: 2 }]);

    let a = doc.get("a").unwrap();
    assert_eq!(a.count(), 2);
    let texts: Vec<_> = a.children().map(|n| n.text()).collect();
    assert_eq!(texts, [Some("1"), Some("2")]);
}

#[test_log::test]
fn unclosed_containers_in_reverse_mode() {
    let doc = parse_reverse(r#"{"a":[1,2"#).unwrap();
    assert_eq!(doc.anomalies(), [Anomaly::UnclosedContainers { open: 2 }]);
    let texts: Vec<_> = doc.get("a").unwrap().children().map(|n| n.text()).collect();
    assert_eq!(texts, [Some("2"), Some("1")]);
}

#[test_log::test]
fn stray_close_stops_the_scan() {
    let doc = parse("[1]][2]").unwrap();
    assert_eq!(doc.anomalies(), [Anomaly::UnexpectedClose { offset: 3 }]);
    let root = doc.root().unwrap();
    assert_eq!(root.count(), 1);
    assert!(root.next_sibling().is_none());
    assert_eq!(doc.node_count(), 2);
}

#[rstest]
fn close_without_open_has_no_root() {
    let doc = parse("]").unwrap();
    assert!(doc.root().is_none());
    assert_eq!(doc.anomalies(), [Anomaly::UnexpectedClose { offset: 0 }]);
}

#[rstest]
fn mismatched_close_is_reported_but_tolerated() {
    let doc = parse(r#"{"a":1]"#).unwrap();
    assert_eq!(doc.anomalies(), [Anomaly::MismatchedClose { offset: 6 }]);
    assert_eq!(doc.get("a").and_then(|n| n.text()), Some("1"));
}

#[rstest]
fn truncated_key_stops_the_scan() {
    let doc = parse(r#"{"ok":1,"abc"#).unwrap();
    assert_eq!(
        doc.anomalies(),
        [
            Anomaly::TruncatedKey { offset: 9 },
            Anomaly::UnclosedContainers { open: 1 },
        ]
    );
    let root = doc.root().unwrap();
    assert_eq!(root.children().count(), 1);
    assert_eq!(root.get("ok").and_then(|n| n.text()), Some("1"));
}

#[rstest]
#[case("42", "42", 0)]
#[case("\"hello\"", "hello", 1)]
#[case("  true", "true", 2)]
fn bare_scalar_is_missing_root_container(
    #[case] input: &str,
    #[case] text: &str,
    #[case] offset: usize,
) {
    let doc = parse(input).unwrap();
    assert_eq!(doc.anomalies(), [Anomaly::MissingRootContainer { offset }]);
    let root = doc.root().unwrap();
    assert_eq!(root.kind(), Kind::String);
    assert_eq!(root.text(), Some(text));
    assert!(root.parent().is_none());
}

#[rstest]
fn several_bare_scalars_are_reported_once() {
    let doc = parse(r#""a" "b""#).unwrap();
    assert_eq!(doc.anomalies(), [Anomaly::MissingRootContainer { offset: 1 }]);
    let root = doc.root().unwrap();
    assert_eq!(root.text(), Some("a"));
    assert_eq!(root.next_sibling().and_then(|n| n.text()), Some("b"));
}

#[rstest]
fn trailing_comma_is_not_an_anomaly() {
    let doc = parse(r#"{"a":[1,2,],}"#).unwrap();
    assert!(doc.is_well_formed());
    assert_eq!(doc.get("a").map(|n| n.count()), Some(2));
}

#[rstest]
#[case("")]
#[case("\0")]
fn empty_input_produces_no_document(#[case] input: &str) {
    assert!(parse(input).unwrap_err().is_empty_input());
}

#[rstest]
fn arena_limit_is_fatal() {
    let options = ParseOptions::new()
        .with_page_bytes(1)
        .with_max_pages(Some(3));
    let err = parse_with_options("[1,2,3,4]", &options).unwrap_err();
    assert!(matches!(err, Error::AllocationFailure { .. }));

    let doc = parse_with_options("[1,2]", &options).unwrap();
    assert_eq!(doc.stats().pages, 3);
}

#[rstest]
fn escaped_quote_does_not_start_an_empty_string() {
    let doc = parse(r#"["a\"", 1]"#).unwrap();
    assert!(doc.is_well_formed());
    let root = doc.root().unwrap();
    assert_eq!(root.count(), 2);
    let texts: Vec<_> = root.children().map(|n| n.text()).collect();
    assert_eq!(texts, [Some(r"a\"), Some("1")]);

    let doc = parse(r#"{"k":"a\"", "n":1}"#).unwrap();
    let keys: Vec<_> = doc.root().unwrap().children().map(|n| n.key()).collect();
    assert_eq!(keys, [Some("k"), Some("n")]);
}

#[rstest]
#[case(r#"{"a":1, [2]}"#, 8)]
#[case(r#"{"a:b":1}"#, 6)]
fn object_member_without_name_is_reported(#[case] input: &str, #[case] offset: usize) {
    let doc = parse(input).unwrap();
    assert!(!doc.is_well_formed());
    assert_eq!(doc.anomalies(), [Anomaly::MissingKey { offset }]);
    let keys: Vec<_> = doc.root().unwrap().children().map(|n| n.key()).collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0], Some("a"));
    assert_eq!(keys[1], None);
}

#[rstest]
fn arrays_and_top_level_values_need_no_key() {
    let doc = parse(r#"[{"a":[1,""]}, 2]"#).unwrap();
    assert!(doc.is_well_formed());
}
