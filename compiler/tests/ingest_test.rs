use jsonif_compiler::proto::field_descriptor_proto::{Label, Type};
use jsonif_compiler::proto::{
    DescriptorProto, FieldDescriptorProto, FieldOptions, FileDescriptorProto, MessageOptions,
    OneofDescriptorProto,
};
use jsonif_compiler::{ingest_files, prune_files, JsonifError};
use jsonif_schema::{FieldKind, Message, SchemaFile};

fn scalar_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

fn file(
    name: &str,
    deps: &[&str],
    weak: &[i32],
    messages: Vec<DescriptorProto>,
) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some("test".to_string()),
        dependency: deps.iter().map(|d| d.to_string()).collect(),
        weak_dependency: weak.to_vec(),
        message_type: messages,
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn point() -> DescriptorProto {
    message(
        "Point",
        vec![
            scalar_field("x", 1, Type::Int32),
            scalar_field("y", 2, Type::Int32),
        ],
    )
}

fn plain_schema_file(name: &str, deps: &[&str], weak: &[usize], with_defs: bool) -> SchemaFile {
    SchemaFile {
        name: name.to_string(),
        package: None,
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
        weak_dependencies: weak.to_vec(),
        syntax: "proto3".to_string(),
        messages: if with_defs {
            vec![Message {
                name: "M".to_string(),
                fields: Vec::new(),
                oneofs: Vec::new(),
                nested: Vec::new(),
                enums: Vec::new(),
                options: Default::default(),
            }]
        } else {
            Vec::new()
        },
        enums: Vec::new(),
    }
}

#[test]
fn proto2_file_is_rejected_before_anything_else() {
    let mut bad = file("old.proto", &[], &[], vec![point()]);
    bad.syntax = Some("proto2".to_string());
    // Even a file that pruning would drop must fail the syntax check.
    let err = ingest_files(&[file("a.proto", &["old.proto"], &[0], vec![point()]), bad])
        .expect_err("proto2 must be rejected");
    match err {
        JsonifError::UnsupportedSyntax { file, syntax } => {
            assert_eq!(file, "old.proto");
            assert_eq!(syntax, "proto2");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_syntax_is_rejected() {
    let mut bad = file("nosyntax.proto", &[], &[], vec![point()]);
    bad.syntax = None;
    assert!(matches!(
        ingest_files(&[bad]),
        Err(JsonifError::UnsupportedSyntax { .. })
    ));
}

#[test]
fn file_without_definitions_is_dropped_even_when_unreferenced() {
    let model = ingest_files(&[
        file("empty.proto", &[], &[], vec![]),
        file("a.proto", &[], &[], vec![point()]),
    ])
    .expect("ingest");
    assert_eq!(model.files.len(), 1);
    assert_eq!(model.files[0].name, "a.proto");
}

#[test]
fn weak_only_reference_is_excluded() {
    // a weakly imports b; b has definitions but nobody needs it.
    let model = ingest_files(&[
        file("a.proto", &["b.proto"], &[0], vec![point()]),
        file("b.proto", &[], &[], vec![point()]),
    ])
    .expect("ingest");
    assert_eq!(model.files.len(), 1);
    assert_eq!(model.files[0].name, "a.proto");
}

#[test]
fn strong_reference_is_retained() {
    let model = ingest_files(&[
        file("a.proto", &["b.proto"], &[], vec![point()]),
        file("b.proto", &[], &[], vec![point()]),
    ])
    .expect("ingest");
    assert_eq!(model.files.len(), 2);
}

#[test]
fn removal_cascades_through_strong_edges() {
    // a --weak--> b --strong--> c: dropping b releases c too.
    let model = ingest_files(&[
        file("a.proto", &["b.proto"], &[0], vec![point()]),
        file("b.proto", &["c.proto"], &[], vec![point()]),
        file("c.proto", &[], &[], vec![point()]),
    ])
    .expect("ingest");
    let names: Vec<&str> = model.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.proto"]);
}

#[test]
fn survivors_keep_their_relative_order() {
    let model = ingest_files(&[
        file("z.proto", &[], &[], vec![point()]),
        file("m.proto", &[], &[], vec![point()]),
        file("a.proto", &[], &[], vec![point()]),
    ])
    .expect("ingest");
    let names: Vec<&str> = model.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["z.proto", "m.proto", "a.proto"]);
}

#[test]
fn pruning_is_idempotent() {
    let files = vec![
        plain_schema_file("a.proto", &["b.proto"], &[0], true),
        plain_schema_file("b.proto", &[], &[], true),
        plain_schema_file("c.proto", &["a.proto"], &[], true),
        plain_schema_file("empty.proto", &[], &[], false),
    ];
    let once = prune_files(files);
    let twice = prune_files(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn integer_families_collapse_at_ingestion() {
    let model = ingest_files(&[file(
        "ints.proto",
        &[],
        &[],
        vec![message(
            "Ints",
            vec![
                scalar_field("a", 1, Type::Sint32),
                scalar_field("b", 2, Type::Sfixed32),
                scalar_field("c", 3, Type::Fixed64),
                scalar_field("d", 4, Type::Sint64),
            ],
        )],
    )])
    .expect("ingest");
    let fields = &model.files[0].messages[0].fields;
    assert_eq!(fields[0].kind, FieldKind::Int32);
    assert_eq!(fields[1].kind, FieldKind::Int32);
    assert_eq!(fields[2].kind, FieldKind::Uint64);
    assert_eq!(fields[3].kind, FieldKind::Int64);
}

#[test]
fn field_options_override_message_defaults() {
    let mut desc = message(
        "Opts",
        vec![
            scalar_field("inherits", 1, Type::Int32),
            FieldDescriptorProto {
                options: Some(FieldOptions {
                    jsonif_optimistic: Some(false),
                    jsonif_discard_if_default: Some(true),
                    jsonif_name: Some("renamed".to_string()),
                }),
                ..scalar_field("overrides", 2, Type::Int32)
            },
        ],
    );
    desc.options = Some(MessageOptions {
        jsonif_message_optimistic: Some(true),
        ..Default::default()
    });

    let model = ingest_files(&[file("opts.proto", &[], &[], vec![desc])]).expect("ingest");
    let msg = &model.files[0].messages[0];
    assert!(msg.options.optimistic);
    assert!(!msg.options.discard_if_default);

    let inherits = &msg.fields[0];
    assert!(inherits.options.optimistic);
    assert!(!inherits.options.discard_if_default);
    assert_eq!(inherits.options.json_key, None);

    let overrides = &msg.fields[1];
    assert!(!overrides.options.optimistic);
    assert!(overrides.options.discard_if_default);
    assert_eq!(overrides.options.json_key.as_deref(), Some("renamed"));
}

#[test]
fn single_member_optional_oneof_is_synthetic() {
    let desc = DescriptorProto {
        name: Some("Maybe".to_string()),
        field: vec![
            FieldDescriptorProto {
                oneof_index: Some(0),
                proto3_optional: Some(true),
                ..scalar_field("value", 1, Type::Int32)
            },
            FieldDescriptorProto {
                oneof_index: Some(1),
                ..scalar_field("a", 2, Type::Int32)
            },
            FieldDescriptorProto {
                oneof_index: Some(1),
                ..scalar_field("b", 3, Type::String)
            },
        ],
        oneof_decl: vec![
            OneofDescriptorProto {
                name: Some("_value".to_string()),
            },
            OneofDescriptorProto {
                name: Some("choice".to_string()),
            },
        ],
        ..Default::default()
    };
    let model = ingest_files(&[file("maybe.proto", &[], &[], vec![desc])]).expect("ingest");
    let msg = &model.files[0].messages[0];
    assert!(msg.oneofs[0].synthetic);
    assert!(!msg.oneofs[1].synthetic);
    assert_eq!(msg.real_oneofs().count(), 1);
    assert!(msg.fields[0].optional);
}
