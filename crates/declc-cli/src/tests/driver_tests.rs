use crate::driver::{compile_document, compile_to_header};
use crate::model::ModuleDoc;
use declc_graph::{DeclKind, ResolverOptions, State};

fn parse(json: &str) -> ModuleDoc {
    serde_json::from_str(json).expect("document parses")
}

fn strict() -> ResolverOptions {
    ResolverOptions {
        ignore_errors: false,
    }
}

#[test]
fn test_compile_document_builds_tree_and_targets() {
    let doc = parse(
        r#"{
            "declarations": [
                {
                    "kind": "namespace",
                    "name": "client",
                    "declarations": [
                        {
                            "kind": "class",
                            "name": "Object",
                            "members": [
                                {"kind": "variable", "name": "length", "type": {"named": "double"}}
                            ]
                        },
                        {"kind": "variable", "name": "window", "type": {"pointer": {"ref": "client.Object"}}}
                    ]
                }
            ]
        }"#,
    );

    let module = compile_document(&doc);
    let names: Vec<String> = module
        .arena
        .ids()
        .map(|id| module.arena.qualified_name(module.types.atoms(), id))
        .collect();
    assert_eq!(
        names,
        vec![
            "client",
            "client::Object",
            "client::Object::length",
            "client::window",
        ]
    );

    // Class members are reached through their class's body; only the
    // namespace, the class and the namespace-scope variable are targets.
    let target_names: Vec<String> = module
        .targets
        .iter()
        .map(|target| module.arena.qualified_name(module.types.atoms(), target.decl))
        .collect();
    assert_eq!(target_names, vec!["client", "client::Object", "client::window"]);

    // Namespaces and classes target Complete, variables Partial.
    let states: Vec<State> = module.targets.iter().map(|target| target.state).collect();
    assert_eq!(states, vec![State::Complete, State::Complete, State::Partial]);
}

#[test]
fn test_namespace_scope_variables_are_extern() {
    let doc = parse(
        r#"{
            "declarations": [
                {
                    "kind": "namespace",
                    "name": "client",
                    "declarations": [
                        {"kind": "variable", "name": "window", "type": {"named": "double"}},
                        {"kind": "variable", "name": "counter", "static": true, "type": {"named": "double"}}
                    ]
                }
            ]
        }"#,
    );

    let header = compile_to_header(&doc, strict()).expect("compiles");
    assert!(header.contains("\textern double window;\n"), "{header}");
    assert!(header.contains("\tstatic double counter;\n"), "{header}");
}

#[test]
fn test_end_to_end_pointer_cycle_header() {
    let doc = parse(
        r#"{
            "declarations": [
                {
                    "kind": "namespace",
                    "name": "client",
                    "declarations": [
                        {
                            "kind": "class",
                            "name": "A",
                            "members": [
                                {"kind": "variable", "name": "b", "type": {"pointer": {"ref": "client.B"}}}
                            ]
                        },
                        {
                            "kind": "class",
                            "name": "B",
                            "members": [
                                {"kind": "variable", "name": "a", "type": {"pointer": {"ref": "client.A"}}}
                            ]
                        }
                    ]
                }
            ]
        }"#,
    );

    let header = compile_to_header(&doc, strict()).expect("pointer cycle compiles");

    // Exact output: forward-declaration block, then both definitions, all
    // inside one namespace block, with the members appearing only inline.
    assert_eq!(
        header,
        "namespace client {\n\
         \tclass A;\n\
         \tclass B;\n\
         \tclass A {\n\
         \tpublic:\n\
         \t\tB* b;\n\
         \t};\n\
         \tclass B {\n\
         \tpublic:\n\
         \t\tA* a;\n\
         \t};\n\
         }\n"
    );
}

#[test]
fn test_nested_class_member_is_defined_out_of_line() {
    let doc = parse(
        r#"{
            "declarations": [
                {
                    "kind": "namespace",
                    "name": "client",
                    "declarations": [
                        {
                            "kind": "class",
                            "name": "O",
                            "members": [
                                {
                                    "kind": "class",
                                    "name": "I",
                                    "members": [
                                        {"kind": "variable", "name": "x", "type": {"named": "double"}}
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }"#,
    );

    // A nested class stays a target: its definition is emitted out of line.
    let module = compile_document(&doc);
    let target_names: Vec<String> = module
        .targets
        .iter()
        .map(|target| module.arena.qualified_name(module.types.atoms(), target.decl))
        .collect();
    assert_eq!(target_names, vec!["client", "client::O", "client::O::I"]);

    let header = compile_to_header(&doc, strict()).expect("compiles");
    assert_eq!(header.matches("\t\tclass I;").count(), 1, "{header}");
    assert_eq!(header.matches("class O::I {").count(), 1, "{header}");
    assert_eq!(
        header.matches("double x;").count(),
        1,
        "the member renders only inside the nested class body: {header}"
    );
}

#[test]
fn test_value_cycle_fails_without_ignore_errors() {
    let doc = parse(
        r#"{
            "declarations": [
                {
                    "kind": "class",
                    "name": "A",
                    "members": [{"kind": "variable", "name": "b", "type": {"ref": "B"}}]
                },
                {
                    "kind": "class",
                    "name": "B",
                    "members": [{"kind": "variable", "name": "a", "type": {"ref": "A"}}]
                }
            ]
        }"#,
    );

    let error = compile_to_header(&doc, strict()).expect_err("value cycle is fatal");
    let message = format!("{error:#}");
    assert!(
        message.contains("unresolvable dependency cycle"),
        "{message}"
    );

    let header = compile_to_header(
        &doc,
        ResolverOptions {
            ignore_errors: true,
        },
    )
    .expect("ignore_errors produces diagnostic output");
    assert!(header.contains("class A {"), "{header}");
    assert!(header.contains("class B {"), "{header}");
}

#[test]
fn test_unknown_ref_degrades_to_named_type() {
    let doc = parse(
        r#"{
            "declarations": [
                {"kind": "variable", "name": "out", "type": {"pointer": {"ref": "std.ostream"}}}
            ]
        }"#,
    );

    let module = compile_document(&doc);
    let id = module.arena.ids().next().expect("one declaration");
    let DeclKind::Variable(variable) = &module.arena.get(id).kind else {
        panic!("expected variable");
    };
    // Dotted external paths are spelled as plain qualified names.
    let mut deps = declc_graph::Dependencies::new();
    module.types.type_dependencies(
        variable.ty,
        declc_graph::Dependency::new(State::Partial, id, declc_graph::ReasonKind::VariableType),
        &mut deps,
    );
    assert!(deps.is_empty(), "external names demand nothing");

    let header = compile_to_header(&doc, strict()).expect("compiles");
    assert!(header.contains("extern std::ostream* out;"), "{header}");
}

#[test]
fn test_run_writes_output_file() {
    use crate::args::CliArgs;
    use std::path::PathBuf;

    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("module.json");
    let output = dir.path().join("module.h");
    std::fs::write(
        &input,
        r#"{"declarations": [{"kind": "class", "name": "Object"}]}"#,
    )
    .expect("write input");

    let args = CliArgs {
        input: input.clone(),
        output: Some(output.clone()),
        ignore_errors: false,
    };
    crate::driver::run(&args).expect("driver succeeds");

    let header = std::fs::read_to_string(&output).expect("output written");
    assert!(header.contains("class Object;"), "{header}");
    assert!(header.contains("class Object {"), "{header}");

    // A missing input is a readable error, not a panic.
    let args = CliArgs {
        input: PathBuf::from("/nonexistent/module.json"),
        output: None,
        ignore_errors: false,
    };
    let error = crate::driver::run(&args).expect_err("missing input fails");
    assert!(format!("{error:#}").contains("failed to read"));
}
