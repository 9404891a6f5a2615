use qoid::{
    from_json, parse_collection, parse_qoid, parse_register, qoid, to_json, to_string, Collection,
    Container, Entry, Error, Key, Node, NodeKind, Property, Qoid, Register, Tagged,
};

fn inventory() -> Register {
    let mut tools = Collection::new("tools");
    tools.append(qoid!("hammer"; "weight" => "1kg", "color" => "red"));
    tools.append(qoid!("saw"; "teeth" => "24"));

    let mut archive = Register::new("archive.cxr");
    archive.append(Collection::with_qoids("2019", [qoid!("q1"; "sold" => "12")]));

    let mut root = Register::new("inventory.cxr");
    root.append(tools);
    root.append(archive);
    root
}

#[test]
fn test_duplicate_property_tags_preserved() {
    let mut qoid = Qoid::new("tag");
    qoid.append(Property::new("tag1", "val1"));
    qoid.append(Property::new("tag1", "val2"));

    let text = to_string(&qoid);
    println!("Qoid markup:\n{}", text);
    assert_eq!(text.matches("tag1:").count(), 2);
    assert!(text.find("val1").unwrap() < text.find("val2").unwrap());

    let back = parse_qoid(&text).unwrap();
    assert_eq!(back, qoid);
    assert_eq!(back.all_of("tag1"), vec!["val1", "val2"]);
}

#[test]
fn test_combine_and_subtract() {
    let c = qoid!("c"; "a" => "1", "b" => "2");
    let d = qoid!("d"; "b" => "2");

    let minus = c.clone() - &d;
    assert_eq!(minus.iter().cloned().collect::<Vec<_>>(), vec![Property::new("a", "1")]);

    let plus = c.combined(&d);
    assert_eq!(
        plus.iter().cloned().collect::<Vec<_>>(),
        vec![
            Property::new("a", "1"),
            Property::new("b", "2"),
            Property::new("b", "2"),
        ]
    );

    let mut in_place = c.clone();
    in_place += &d;
    assert_eq!(in_place, plus);
    in_place -= &d;
    in_place -= &d;
    in_place -= &d;
    assert_eq!(in_place.tags(), vec!["a"]);
}

#[test]
fn test_parent_links_follow_ownership() {
    let mut collection = Collection::new("c");
    let standalone = qoid!("q"; "k" => "v");
    assert!(standalone.parent().is_none());

    collection.append(standalone);
    collection.append(qoid!("r"));
    let link = collection.get("r").unwrap().parent().unwrap();
    assert_eq!(link.kind(), NodeKind::Collection);
    assert_eq!(link.position(), 1);

    let replaced = collection.set(0, qoid!("new")).unwrap();
    assert!(!replaced.has_parent());
    assert_eq!(collection.get(0).unwrap().position(), Some(0));

    let removed = collection.delete("new").unwrap();
    assert!(removed.parent().is_none());
    assert_eq!(collection.get("r").unwrap().position(), Some(0));
}

#[test]
fn test_mutable_access_keeps_link() {
    let mut root = inventory();
    {
        let mut entry = root.get_mut("tools").unwrap();
        let tools = entry.as_collection_mut().unwrap();
        tools.append(qoid!("drill"));
        let mut saw = tools.get_mut("saw").unwrap();
        saw.append(Property::new("teeth", "32"));
    }
    let tools = root.get("tools").unwrap().as_collection().unwrap();
    assert_eq!(tools.position(), Some(0));
    assert_eq!(tools.len(), 3);
    assert_eq!(tools.get("saw").unwrap().all_of("teeth"), vec!["24", "32"]);
}

#[test]
fn test_key_errors() {
    let root = inventory();
    assert!(matches!(root.get(9), Err(Error::OutOfRange { index: 9, len: 2 })));
    assert!(matches!(root.get("nope"), Err(Error::KeyNotFound(_))));
    assert!(matches!(root.slice(1..5), Err(Error::OutOfRange { .. })));
    assert_eq!(root.slice(..1).unwrap().len(), 1);
    assert_eq!(root.locate(Key::Tag("archive.cxr")).unwrap(), 1);
}

#[test]
fn test_contains_is_tag_or_value() {
    let root = inventory();
    let tools = root.get(0).unwrap().as_collection().unwrap().clone();
    assert!(root.contains("tools"));
    assert!(root.contains(&tools));
    assert!(!root.contains(&Collection::new("tools")));
    assert!(!root.contains("hammer"));
}

#[test]
fn test_ordering_is_tag_only() {
    let a = qoid!("apple"; "z" => "26");
    let b = qoid!("banana");
    assert!(a < b);
    assert_eq!(Node::from(a).compare(&Node::from(b)), std::cmp::Ordering::Less);
}

#[test]
fn test_dynamic_type_mismatch() {
    let mut qoid = Node::from(qoid!("q"));
    let err = qoid.combine(&Node::from(Collection::new("c"))).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let mut collection = Node::from(Collection::new("c"));
    collection.combine(&Node::from(qoid!("q"))).unwrap();
    assert!(collection.contains_tag("q"));
    assert!(collection.subtract(&Node::from(Property::new("a", "b"))).is_err());
}

#[test]
fn test_register_text_and_json() {
    let root = inventory();

    let text = root.to_text();
    println!("Register markup:\n{}", text);
    assert!(text.starts_with("/ inventory.cxr\n\n% tools\n#hammer\n"));
    assert!(text.ends_with("/\n\n/\n"));
    assert_eq!(parse_register(&text).unwrap(), root);

    let json = to_json(&root).unwrap();
    println!("Register JSON: {}", json);
    let back: Register = from_json(&json).unwrap();
    assert_eq!(back, root);
    match back.get(1).unwrap() {
        Entry::Register(archive) => assert_eq!(archive.tags(), vec!["2019"]),
        Entry::Collection(_) => panic!("archive should stay a register"),
    }
}

#[test]
fn test_collection_parse_errors_report_lines() {
    let text = "#ok\na: 1\n\nstray: property\n";
    match parse_collection("c", text) {
        Err(Error::Format { line, context, .. }) => {
            assert_eq!(line, 4);
            assert_eq!(context, "stray: property");
        }
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn test_glossary_and_grouping() {
    let root = inventory();
    let tools = root.get("tools").unwrap().as_collection().unwrap();
    assert_eq!(tools.glossary().tags(), vec!["hammer", "saw"]);

    let hammer = tools.get("hammer").unwrap();
    let grouped = hammer.grouped();
    assert_eq!(grouped.first("color"), Some("red"));
}

#[test]
fn test_sorting_relinks() {
    let mut collection = Collection::with_qoids("c", [qoid!("b"), qoid!("C"), qoid!("a")]);
    collection.sort_by_tag(true);
    assert_eq!(collection.tags(), vec!["a", "b", "C"]);
    for (index, qoid) in collection.iter().enumerate() {
        assert_eq!(qoid.position(), Some(index));
    }
}
