use rstest::rstest;
use serde_json::Value;
use spanjson::{parse, parse_reverse, NodeRef};

fn assert_matches(node: NodeRef<'_, '_>, value: &Value) {
    match value {
        Value::Object(map) => {
            assert!(node.is_object(), "expected object at {node:?}");
            let keys: Vec<_> = node.children().filter_map(|n| n.key()).collect();
            let expected: Vec<_> = map.keys().map(String::as_str).collect();
            assert_eq!(keys, expected);
            for (child, (_, inner)) in node.children().zip(map) {
                assert_matches(child, inner);
            }
        }
        Value::Array(items) => {
            assert!(node.is_array(), "expected array at {node:?}");
            assert_eq!(node.count(), items.len());
            for (child, inner) in node.children().zip(items) {
                assert_matches(child, inner);
            }
        }
        Value::String(text) => assert_eq!(node.text(), Some(text.as_str())),
        Value::Number(number) => assert_eq!(node.as_f64(), number.as_f64()),
        Value::Bool(flag) => assert_eq!(node.as_bool(), Some(*flag)),
        Value::Null => assert!(node.is_null()),
    }
}

#[rstest]
#[case(r#"{"a":1,"b":[2,3,4]}"#)]
#[case(r#"{"z":1,"y":2,"x":3}"#)]
#[case(r#"[true,false,null,"s",-1.5e2]"#)]
#[case(r#"{"deep":{"er":{"est":[[1],[2,[3]]]}}}"#)]
#[case(r#"{"empty":{},"none":[],"blank":""}"#)]
#[case(
    r#"{
    "name": "probe",
    "samples": [0.25, 0.5, 0.75],
    "meta": {"ok": true, "note": null}
}"#
)]
fn forward_tree_matches_serde_json(#[case] input: &str) {
    let expected: Value = serde_json::from_str(input).unwrap();
    let doc = parse(input).unwrap();
    assert!(doc.is_well_formed());
    assert_matches(doc.root().unwrap(), &expected);
}

#[rstest]
#[case(r#"[1,2,3,4,5,6,7,8]"#)]
#[case(r#"{"xs":[0.5,1.5,2.5],"ys":[]}"#)]
fn reverse_extraction_matches_serde_json(#[case] input: &str) {
    let expected: Value = serde_json::from_str(input).unwrap();
    let doc = parse_reverse(input).unwrap();

    let mut stack = vec![(doc.root().unwrap(), &expected)];
    while let Some((node, value)) = stack.pop() {
        match value {
            Value::Array(items) => {
                let array = node.as_array().unwrap();
                let mut dest = vec![f32::NAN; items.len()];
                assert_eq!(array.extract_f32(&mut dest, f32::NAN, None, true), items.len());
                let want: Vec<f32> = items
                    .iter()
                    .map(|item| item.as_f64().unwrap() as f32)
                    .collect();
                assert_eq!(dest, want);
            }
            Value::Object(map) => {
                for (key, inner) in map {
                    stack.push((node.get_exact(key).unwrap(), inner));
                }
            }
            _ => {}
        }
    }
}
