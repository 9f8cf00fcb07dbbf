use crate::model::{DeclDoc, ModuleDoc, TypeDoc, VisibilityDoc};

#[test]
fn test_parse_namespace_with_class_and_variable() {
    let doc: ModuleDoc = serde_json::from_str(
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
                                {"kind": "variable", "name": "length", "type": {"named": "double"}},
                                {
                                    "visibility": "private",
                                    "kind": "variable",
                                    "name": "impl",
                                    "type": {"pointer": {"ref": "client.Object"}}
                                }
                            ]
                        },
                        {"kind": "variable", "name": "window", "type": {"pointer": {"ref": "Object"}}}
                    ]
                }
            ]
        }"#,
    )
    .expect("document parses");

    assert_eq!(doc.declarations.len(), 1);
    let DeclDoc::Namespace { name, declarations } = &doc.declarations[0] else {
        panic!("expected namespace");
    };
    assert_eq!(name, "client");
    assert_eq!(declarations.len(), 2);
    let DeclDoc::Class { members, .. } = &declarations[0] else {
        panic!("expected class");
    };
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].visibility, VisibilityDoc::Public);
    assert_eq!(members[1].visibility, VisibilityDoc::Private);
}

#[test]
fn test_parse_function_and_compound_types() {
    let doc: ModuleDoc = serde_json::from_str(
        r#"{
            "declarations": [
                {
                    "kind": "function",
                    "name": "find",
                    "typeParams": ["_T0"],
                    "returns": {"member": {"inner": {"ref": "Container"}, "name": "iterator"}},
                    "params": [{"name": "needle", "type": {"constReference": {"generic": "_T0"}}}],
                    "constraint": {"allOf": [{"literal": "..."}]}
                }
            ]
        }"#,
    )
    .expect("document parses");

    let DeclDoc::Function {
        type_params,
        returns,
        params,
        constraint,
        ..
    } = &doc.declarations[0]
    else {
        panic!("expected function");
    };
    assert_eq!(type_params, &["_T0".to_string()]);
    assert!(matches!(returns, TypeDoc::Member { .. }));
    assert_eq!(params.len(), 1);
    assert!(matches!(params[0].ty, TypeDoc::ConstReference(_)));
    assert!(matches!(constraint, Some(TypeDoc::AllOf(_))));
}

#[test]
fn test_unknown_document_fields_are_rejected() {
    let result: Result<ModuleDoc, _> =
        serde_json::from_str(r#"{"declarations": [], "version": 2}"#);
    assert!(result.is_err());

    let result: Result<ModuleDoc, _> = serde_json::from_str(
        r#"{
            "declarations": [
                {
                    "kind": "function",
                    "name": "f",
                    "returns": {"named": "void"},
                    "params": [{"name": "a", "type": {"named": "double"}, "optional": true}]
                }
            ]
        }"#,
    );
    assert!(result.is_err(), "unknown parameter fields are rejected");
}

#[test]
fn test_static_variable_flag() {
    let doc: ModuleDoc = serde_json::from_str(
        r#"{
            "declarations": [
                {"kind": "variable", "name": "counter", "static": true, "type": {"named": "double"}}
            ]
        }"#,
    )
    .expect("document parses");

    let DeclDoc::Variable { r#static, .. } = &doc.declarations[0] else {
        panic!("expected variable");
    };
    assert!(r#static);
}
