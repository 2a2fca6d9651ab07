mod common;

use common::*;
use declgraph_core::model::Annotations;
use declgraph_core::{AttributeArgument, DiagnosticKind, FileParser, SourceUnit, Structure, TypeKind};
use std::collections::HashMap;

const DIRECTION: &str = r#"enum Direction: String {
    case north = "N"
    case move(a: Int, String)
    case jump(height: Double)
    case stop
    case weird: Int
}
"#;

fn direction_structure() -> Structure {
    let s = DIRECTION;
    let element = |name: &str, text: &str| decl(s, "enumelement", name, exact(s, text), name);
    root(vec![children(
        inherits(
            decl(s, "enum", "Direction", span(s, "enum Direction", "\n}"), "Direction"),
            &["String"],
        ),
        vec![
            case_group(vec![element("north", "north = \"N\"")]),
            case_group(vec![element("move", "move(a: Int, String)")]),
            case_group(vec![element("jump", "jump(height: Double)")]),
            case_group(vec![element("stop", "stop")]),
            case_group(vec![element("weird", "weird: Int")]),
        ],
    )])
}

#[test]
fn test_enum_cases() {
    let file = parse_verbose(DIRECTION, direction_structure());
    let direction = file.find_type("Direction").unwrap();

    assert!(direction.is_enum());
    assert!(direction.has_associated_values());
    let names: Vec<_> = direction.cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["north", "move", "jump", "stop", "weird"]);

    assert_eq!(direction.cases[0].raw_value.as_deref(), Some("N"));
    assert!(direction.cases[0].associated_values.is_empty());

    let values = &direction.cases[1].associated_values;
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].local_name.as_deref(), Some("a"));
    assert_eq!(values[0].external_name.as_deref(), Some("a"));
    assert_eq!(values[0].type_name.name, "Int");
    assert_eq!(values[1].local_name, None);
    assert_eq!(values[1].external_name.as_deref(), Some("1"));
    assert_eq!(values[1].type_name.name, "String");

    // a single labeled value has no external name
    let jump = &direction.cases[2].associated_values;
    assert_eq!(jump.len(), 1);
    assert_eq!(jump[0].local_name.as_deref(), Some("height"));
    assert_eq!(jump[0].external_name, None);
    assert_eq!(jump[0].type_name.name, "Double");

    assert!(direction.cases[3].raw_value.is_none());
    assert!(direction.cases[3].associated_values.is_empty());

    let weird = &direction.cases[4];
    assert!(weird.raw_value.is_none() && weird.associated_values.is_empty());
    assert_eq!(
        file.diagnostics
            .of_kind(DiagnosticKind::MalformedEnumCaseBody)
            .count(),
        1
    );
}

#[test]
fn test_diagnostics_only_when_verbose() {
    let quiet = parse(DIRECTION, direction_structure());
    assert!(quiet.diagnostics.is_empty());
    assert_eq!(quiet.find_type("Direction").unwrap().cases.len(), 5);
}

#[test]
fn test_enum_case_outside_enum_is_dropped() {
    let source = "struct Box {\n    case lid\n}\n";
    let structure = root(vec![children(
        decl(source, "struct", "Box", span(source, "struct Box", "\n}"), "Box"),
        vec![case_group(vec![decl(source, "enumelement", "lid", exact(source, "lid"), "lid")])],
    )]);
    let file = parse(source, structure);
    assert!(file.find_type("Box").unwrap().cases.is_empty());
}

#[test]
fn test_unresolvable_enum_case_is_kept_without_payload() {
    let source = "enum E {\n    case a\n}\n";
    let mut element = decl(source, "enumelement", "a", exact(source, "a\n"), "a");
    element.length = Some(source.len() + 10);
    let structure = root(vec![children(
        decl(source, "enum", "E", span(source, "enum E", "\n}"), "E"),
        vec![case_group(vec![element])],
    )]);

    let file = parse_verbose(source, structure);
    assert_eq!(file.find_type("E").unwrap().cases[0].name, "a");
    assert_eq!(
        file.diagnostics
            .of_kind(DiagnosticKind::UnresolvableEnumCaseBody)
            .count(),
        1
    );
}

const SERVICE: &str = r#"protocol Service {
    func fetch(id: Int) throws -> String; func ping()
    static func make() -> Self
    func load(_ handler: @escaping () -> Void) rethrows
}
"#;

#[test]
fn test_protocol_methods_without_bodies() {
    let s = SERVICE;
    let method = |kind: &str, selector: &str, text: &str, name_text: &str| {
        decl(s, kind, selector, exact(s, text), name_text)
    };
    let load_range = exact(s, "func load(_ handler: @escaping () -> Void) rethrows");
    let structure = root(vec![children(
        decl(s, "protocol", "Service", span(s, "protocol Service", "\n}"), "Service"),
        vec![
            method(
                "function.method.instance",
                "fetch(id:)",
                "func fetch(id: Int) throws -> String",
                "fetch(id: Int)",
            ),
            method("function.method.instance", "ping()", "func ping()", "ping()"),
            method("function.method.static", "make()", "func make() -> Self", "make()"),
            children(
                decl(s, "function.method.instance", "load(_:)", load_range, "load(_ handler: @escaping () -> Void)"),
                vec![typed(
                    decl(s, "var.parameter", "handler", exact(s, "_ handler: @escaping () -> Void"), "handler"),
                    "@escaping () -> Void",
                )],
            ),
        ],
    )]);

    let file = parse(s, structure);
    let service = file.find_type("Service").unwrap();
    assert_eq!(service.kind, TypeKind::Protocol);

    let fetch = &service.methods[0];
    assert!(fetch.throws);
    assert_eq!(fetch.return_type.name, "String");

    let ping = &service.methods[1];
    assert!(!ping.throws);
    assert!(ping.return_type.is_void());

    let make = &service.methods[2];
    assert!(make.is_static);
    assert!(!make.is_class);
    assert_eq!(make.return_type.name, "Self");

    let load = &service.methods[3];
    assert!(load.throws);
    assert!(load.return_type.is_void());
    let handler = &load.parameters[0];
    assert_eq!(handler.argument_label, None);
    assert_eq!(handler.type_name.name, "() -> Void");
    assert!(handler.type_name.attributes.contains_key("escaping"));
}

#[test]
fn test_parameter_outside_signature_is_ignored() {
    let source = "class A {\n    func run(x: Int) {}\n}\n";
    let mut param = typed(decl(source, "var.parameter", "x", exact(source, "x: Int"), "x"), "Int");
    param.offset = Some(source.len() - 2);
    let structure = root(vec![children(
        decl(source, "class", "A", span(source, "class A", "\n}"), "A"),
        vec![children(
            decl(source, "function.method.instance", "run(x:)", exact(source, "func run(x: Int) {}"), "run(x: Int)"),
            vec![param],
        )],
    )]);

    let file = parse(source, structure);
    assert!(file.find_type("A").unwrap().methods[0].parameters.is_empty());
}

#[test]
fn test_failable_initializer() {
    let source = "struct P {\n    init?(raw: String) throws {}\n}\n";
    let structure = root(vec![children(
        decl(source, "struct", "P", span(source, "struct P", "\n}"), "P"),
        vec![decl(
            source,
            "function.method.instance",
            "init(raw:)",
            exact(source, "init?(raw: String) throws {}"),
            "init?(raw: String)",
        )],
    )]);

    let file = parse(source, structure);
    let init = &file.find_type("P").unwrap().methods[0];
    assert!(init.is_failable_initializer);
    assert!(init.throws);
    assert_eq!(init.return_type.name, "P");
}

#[test]
fn test_untyped_variable_gets_unknown_placeholder() {
    let source = "struct S {\n    var value = makeValue()\n    var items = [1, 2, nil]\n}\n";
    let structure = root(vec![children(
        decl(source, "struct", "S", span(source, "struct S", "\n}"), "S"),
        vec![
            decl(source, "var.instance", "value", exact(source, "var value = makeValue()"), "value"),
            decl(source, "var.instance", "items", exact(source, "var items = [1, 2, nil]"), "items"),
        ],
    )]);

    let file = parse(source, structure);
    let s = file.find_type("S").unwrap();

    // `makeValue()` looks like a constructor call
    assert_eq!(s.variables[0].type_name.name, "makeValue");
    assert_eq!(s.variables[1].type_name.name, "[Int?]");
    assert!(s.variables[1].type_name.is_array());

    let source = "struct T {\n    var value = compute\n}\n";
    let structure = root(vec![children(
        decl(source, "struct", "T", span(source, "struct T", "\n}"), "T"),
        vec![decl(source, "var.instance", "value", exact(source, "var value = compute"), "value")],
    )]);
    let file = parse(source, structure);
    let value = &file.find_type("T").unwrap().variables[0];
    assert!(value.type_name.is_unknown());
    assert!(value.type_name.name.contains("'var value = compute'"));
}

#[test]
fn test_declaration_attributes_with_arguments() {
    let source = "@available(iOS 10.0, *) @objc(Widget) final class Widget {\n}\n";
    let structure = root(vec![attributed(
        decl(source, "class", "Widget", span(source, "class Widget", "\n}"), "Widget"),
        &["available", "objc.name", "final"],
    )]);

    let file = parse(source, structure);
    let widget = file.find_type("Widget").unwrap();

    let available = &widget.attributes["available"];
    assert_eq!(available.description, "@available(iOS 10.0, *)");
    assert_eq!(available.arguments.get("iOS_10.0"), Some(&AttributeArgument::Flag(true)));
    assert_eq!(available.arguments.len(), 1);

    let objc = &widget.attributes["objc"];
    assert_eq!(objc.description, "@objc(Widget)");
    assert!(widget.attributes.contains_key("final"));
}

#[test]
fn test_extensions() {
    let source = "extension Widget: Codable {\n    var id: Int { 1 }\n}\n";
    let structure = root(vec![children(
        inherits(
            decl(source, "extension", "Widget", span(source, "extension Widget", "\n}"), "Widget"),
            &["Codable"],
        ),
        vec![typed(
            decl(source, "var.instance", "id", exact(source, "var id: Int { 1 }"), "id"),
            "Int",
        )],
    )]);

    let file = parse(source, structure);
    let widget = file.find_type("Widget").unwrap();
    assert!(widget.is_extension);
    assert_eq!(widget.kind, TypeKind::Unknown);
    assert!(widget.variables[0].is_computed);
}

#[test]
fn test_unsupported_kinds_are_reported() {
    let source = "func helper() {}\nstruct S {}\n";
    let structure = root(vec![
        decl(source, "function.free", "helper()", exact(source, "func helper() {}"), "helper()"),
        decl(source, "struct", "S", exact(source, "struct S {}"), "S"),
    ]);

    let file = parse_verbose(source, structure);
    assert_eq!(file.types.len(), 1);
    let unsupported: Vec<_> = file
        .diagnostics
        .of_kind(DiagnosticKind::UnsupportedDeclaration)
        .collect();
    assert_eq!(unsupported.len(), 1);
    assert!(unsupported[0].message.contains("helper()"));
    assert_eq!(unsupported[0].offset, Some(0));
}

#[test]
fn test_annotations_are_attached_by_offset() {
    let source = "/// sourcery: skip\nstruct S {\n    var x: Int\n}\n";
    let struct_range = span(source, "struct S", "\n}");
    let structure = root(vec![children(
        decl(source, "struct", "S", struct_range, "S"),
        vec![typed(decl(source, "var.instance", "x", exact(source, "var x: Int"), "x"), "Int")],
    )]);

    let mut skip = Annotations::new();
    skip.insert("skip".to_string(), serde_json::Value::Bool(true));
    let mut by_offset = HashMap::new();
    by_offset.insert(struct_range.0, skip);

    let file = FileParser::default()
        .with_annotations(by_offset)
        .parse(&SourceUnit::new(source, structure));
    let s = file.find_type("S").unwrap();
    assert_eq!(s.annotations.get("skip"), Some(&serde_json::Value::Bool(true)));
    assert!(s.variables[0].annotations.is_empty());
}

#[test]
fn test_setter_forces_stored_variable() {
    let source = "struct S {\n    var x: Int = 0 { didSet { } }\n}\n";
    let structure = root(vec![children(
        decl(source, "struct", "S", span(source, "struct S", "\n}"), "S"),
        vec![setter(
            typed(
                decl(source, "var.instance", "x", exact(source, "var x: Int = 0 { didSet { } }"), "x"),
                "Int",
            ),
            "internal",
        )],
    )]);

    let file = parse(source, structure);
    let x = &file.find_type("S").unwrap().variables[0];
    assert!(!x.is_computed);
    assert_eq!(x.write_access, declgraph_core::AccessLevel::Internal);
}

#[test]
fn test_attribute_text_arguments() {
    let source = "class K {\n    @available(*, deprecated, message: \"use b, c\")\n    func old() {}\n}\n";
    let structure = root(vec![children(
        decl(source, "class", "K", span(source, "class K", "\n}"), "K"),
        vec![attributed(
            decl(source, "function.method.instance", "old()", exact(source, "func old() {}"), "old()"),
            &["available"],
        )],
    )]);

    let file = parse(source, structure);
    let available = &file.find_type("K").unwrap().methods[0].attributes["available"];
    assert_eq!(available.arguments.len(), 2);
    assert_eq!(
        available.arguments.get("message"),
        Some(&AttributeArgument::Text("use b, c".to_string()))
    );
    assert_eq!(available.arguments.get("deprecated"), Some(&AttributeArgument::Flag(true)));
    assert!(!available.arguments.contains_key("*"));
}

#[test]
fn test_selector_form_enum_case_name() {
    let source = "enum E {\n    case move(a: Int, String)\n}\n";
    let structure = root(vec![children(
        decl(source, "enum", "E", span(source, "enum E", "\n}"), "E"),
        vec![case_group(vec![decl(
            source,
            "enumelement",
            "move(a:_:)",
            exact(source, "move(a: Int, String)"),
            "move",
        )])],
    )]);

    let file = parse_verbose(source, structure);
    let case = &file.find_type("E").unwrap().cases[0];
    assert_eq!(case.name, "move");
    assert_eq!(case.associated_values.len(), 2);
    assert_eq!(case.associated_values[1].type_name.name, "String");
    assert!(file.diagnostics.is_empty());
}

#[test]
fn test_overflowing_offsets_do_not_panic() {
    let broken = |kind: &str, name: &str| Structure {
        kind: Some(format!("source.lang.swift.decl.{}", kind)),
        name: Some(name.to_string()),
        offset: Some(usize::MAX),
        length: Some(1),
        name_offset: Some(usize::MAX),
        name_length: Some(1),
        body_offset: Some(usize::MAX),
        body_length: Some(1),
        ..Default::default()
    };
    let structure = root(vec![children(
        attributed(broken("class", "Broken"), &["final"]),
        vec![
            broken("var.instance", "x"),
            children(
                broken("function.method.instance", "run(x:)"),
                vec![typed(broken("var.parameter", "x"), "Int")],
            ),
            case_group(vec![broken("enumelement", "a")]),
        ],
    )]);

    let file = parse_verbose("class Broken {}\n", structure);
    let ty = file.find_type("Broken").unwrap();
    assert!(!ty.is_generic);
    assert!(ty.attributes.is_empty());
    assert!(ty.variables[0].type_name.is_unknown());
    assert!(ty.methods.is_empty());
    assert!(ty.typealiases.is_empty());
}
