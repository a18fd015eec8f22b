use jsonif_compiler::proto::field_descriptor_proto::{Label, Type};
use jsonif_compiler::proto::{
    CodeGeneratorRequest, DescriptorProto, FieldDescriptorProto, FieldOptions,
    FileDescriptorProto, MessageOptions, OneofDescriptorProto,
};
use jsonif_compiler::{
    generate_files, generate_response, ingest_files, JsonifError, OutputFile, Target,
};

fn scalar_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn ref_field(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar_field(name, number, ty)
    }
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

fn file(name: &str, package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        message_type: messages,
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn point_file() -> FileDescriptorProto {
    file(
        "point.proto",
        "test",
        vec![message(
            "Point",
            vec![
                scalar_field("x", 1, Type::Int32),
                scalar_field("y", 2, Type::Int32),
            ],
        )],
    )
}

fn choice_file() -> FileDescriptorProto {
    let desc = DescriptorProto {
        oneof_decl: vec![OneofDescriptorProto {
            name: Some("choice".to_string()),
        }],
        ..message(
            "Msg",
            vec![
                FieldDescriptorProto {
                    oneof_index: Some(0),
                    ..scalar_field("a", 1, Type::Int32)
                },
                FieldDescriptorProto {
                    oneof_index: Some(0),
                    ..scalar_field("b", 2, Type::String)
                },
            ],
        )
    };
    file("msg.proto", "test", vec![desc])
}

fn generate(target: Target, files: &[FileDescriptorProto]) -> Result<Vec<OutputFile>, JsonifError> {
    let model = ingest_files(files)?;
    generate_files(&model, target.backend().as_ref())
}

fn content<'a>(files: &'a [OutputFile], name: &str) -> &'a str {
    &files
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("no output file {name}"))
        .content
}

#[test]
fn point_round_trips_through_exactly_its_two_keys() {
    let files = generate(Target::Cpp, &[point_file()]).expect("generate");
    let cpp = content(&files, "point.json.h");
    assert!(cpp.contains("struct Point {"));
    assert!(cpp.contains("int32_t x = int32_t();"));
    assert!(cpp.contains("int32_t y = int32_t();"));
    // encode writes both keys unconditionally, decode requires them back
    assert!(cpp.contains("obj[\"x\"] = boost::json::value_from(v.x);"));
    assert!(cpp.contains("obj[\"y\"] = boost::json::value_from(v.y);"));
    assert!(cpp.contains("v.x = boost::json::value_to<int32_t>(jv.at(\"x\"));"));
    assert!(cpp.contains("v.y = boost::json::value_to<int32_t>(jv.at(\"y\"));"));
    assert_eq!(cpp.matches("obj[\"").count(), 2);

    let files = generate(Target::TypeScript, &[point_file()]).expect("generate");
    let ts = content(&files, "point.ts");
    assert!(ts.contains("export class Point {"));
    assert!(ts.contains("x: number = 0;"));
    assert!(ts.contains("obj.x = this.x;"));
    assert!(ts.contains("throw new Error(\"missing field: x\");"));
}

#[test]
fn oneof_case_values_follow_field_numbers() {
    let files = generate(Target::C, &[choice_file()]).expect("generate");
    let header = content(&files, "msg.json.c.h");
    assert!(header.contains("typedef int test_Msg_ChoiceCase;"));
    assert!(header.contains("const test_Msg_ChoiceCase test_Msg_ChoiceCase_NOT_SET = 0;"));
    assert!(header.contains("const test_Msg_ChoiceCase test_Msg_ChoiceCase_kA = 1;"));
    assert!(header.contains("const test_Msg_ChoiceCase test_Msg_ChoiceCase_kB = 2;"));
    assert!(header.contains("test_Msg_ChoiceCase choice_case;"));

    let ts_files = generate(Target::TypeScript, &[choice_file()]).expect("generate");
    let ts = content(&ts_files, "msg.ts");
    assert!(ts.contains("export enum Msg_ChoiceCase {"));
    assert!(ts.contains("NOT_SET = 0,"));
    assert!(ts.contains("kA = 1,"));
    assert!(ts.contains("kB = 2,"));
}

#[test]
fn setting_a_oneof_member_releases_the_previous_payload() {
    let files = generate(Target::C, &[choice_file()]).expect("generate");
    let body = content(&files, "msg.json.c.cpp");

    // the mutator clears the whole oneof before selecting the new member
    let set_b = body
        .split("void test_Msg_set_b(test_Msg* v, const char* s) {")
        .nth(1)
        .expect("set_b implementation");
    let set_b = &set_b[..set_b.find("\n}").expect("set_b end")];
    assert!(set_b.contains("test_Msg_clear_choice_case(v);"));
    assert!(set_b.contains("v->choice_case = test_Msg_ChoiceCase_kB;"));

    // clearing releases the string payload and resets the discriminant
    let clear = body
        .split("void test_Msg_clear_choice_case(test_Msg* v) {")
        .nth(1)
        .expect("clear implementation");
    let clear = &clear[..clear.find("\n}").expect("clear end")];
    assert!(clear.contains("if (v->b) free(v->b);"));
    assert!(clear.contains("v->b = nullptr;"));
    assert!(clear.contains("v->choice_case = test_Msg_ChoiceCase_NOT_SET;"));
}

#[test]
fn generation_is_deterministic() {
    let inputs = [point_file(), choice_file()];
    for target in [Target::C, Target::Cpp, Target::TypeScript, Target::Unity] {
        let first = generate(target, &inputs).expect("generate");
        let second = generate(target, &inputs).expect("generate");
        assert_eq!(first, second);
    }
}

#[test]
fn unresolved_reference_fails_generation() {
    let broken = file(
        "broken.proto",
        "test",
        vec![message(
            "Holder",
            vec![ref_field("gone", 1, Type::Message, ".missing.Type")],
        )],
    );
    let err = generate(Target::Cpp, &[broken]).expect_err("must fail");
    match err {
        JsonifError::UnresolvedType(path) => assert_eq!(path, "missing.Type"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn bytes_support_differs_per_backend() {
    let bytes = file(
        "blob.proto",
        "test",
        vec![message("Blob", vec![scalar_field("data", 1, Type::Bytes)])],
    );
    assert!(generate(Target::C, &[bytes.clone()]).is_ok());
    assert!(generate(Target::TypeScript, &[bytes.clone()]).is_ok());
    assert!(matches!(
        generate(Target::Cpp, &[bytes.clone()]),
        Err(JsonifError::UnsupportedFieldType { backend: "cpp", .. })
    ));
    assert!(matches!(
        generate(Target::Unity, &[bytes]),
        Err(JsonifError::UnsupportedFieldType { backend: "unity", .. })
    ));
}

#[test]
fn repeated_string_and_bytes_carry_per_element_lengths() {
    let lists = file(
        "lists.proto",
        "test",
        vec![message(
            "Lists",
            vec![
                FieldDescriptorProto {
                    label: Some(Label::Repeated as i32),
                    ..scalar_field("names", 1, Type::String)
                },
                FieldDescriptorProto {
                    label: Some(Label::Repeated as i32),
                    ..scalar_field("counts", 2, Type::Int32)
                },
            ],
        )],
    );
    let files = generate(Target::C, &[lists]).expect("generate");
    let header = content(&files, "lists.json.c.h");
    assert!(header.contains("char** names;"));
    assert!(header.contains("int* names_lens;"));
    assert!(header.contains("int names_len;"));
    assert!(header.contains("int32_t* counts;"));
    assert!(header.contains("int counts_len;"));
    assert!(!header.contains("counts_lens"));
}

#[test]
fn weakly_imported_empty_file_leaves_no_trace() {
    let mut main = file(
        "main.proto",
        "test",
        vec![message("Thing", vec![scalar_field("id", 1, Type::Int32)])],
    );
    main.dependency = vec!["file2.proto".to_string()];
    main.weak_dependency = vec![0];
    let empty = file("file2.proto", "other", vec![]);

    for target in [Target::C, Target::Cpp, Target::TypeScript, Target::Unity] {
        let files = generate(target, &[main.clone(), empty.clone()]).expect("generate");
        for out in &files {
            assert!(!out.name.contains("file2"), "{} leaked into {}", "file2", out.name);
            assert!(!out.content.contains("file2"), "file2 referenced in {}", out.name);
        }
    }
}

#[test]
fn cross_package_references_use_the_import_alias() {
    let dep = file(
        "pkg_a.proto",
        "pkg.a",
        vec![message("Referenced", vec![scalar_field("id", 1, Type::Int32)])],
    );
    let mut main = file(
        "main.proto",
        "pkg.b",
        vec![message(
            "User",
            vec![ref_field("other", 1, Type::Message, ".pkg.a.Referenced")],
        )],
    );
    main.dependency = vec!["pkg_a.proto".to_string()];

    let files = generate(Target::TypeScript, &[main, dep]).expect("generate");
    let ts = content(&files, "main.ts");
    assert!(ts.contains("import * as pkg_a from \"./pkg_a\";"));
    assert!(ts.contains("other: pkg_a.Referenced = new pkg_a.Referenced();"));
}

#[test]
fn synthetic_presence_oneof_surfaces_no_case_enum() {
    let desc = DescriptorProto {
        oneof_decl: vec![OneofDescriptorProto {
            name: Some("_value".to_string()),
        }],
        ..message(
            "Maybe",
            vec![FieldDescriptorProto {
                oneof_index: Some(0),
                proto3_optional: Some(true),
                ..scalar_field("value", 1, Type::Int32)
            }],
        )
    };
    let input = file("maybe.proto", "test", vec![desc]);

    for target in [Target::C, Target::Cpp, Target::TypeScript, Target::Unity] {
        let files = generate(target, &[input.clone()]).expect("generate");
        for out in &files {
            assert!(
                !out.content.contains("ValueCase"),
                "synthetic oneof leaked a Case enum into {}",
                out.name
            );
        }
    }

    // proto3 optional maps to a nullable field in TypeScript
    let files = generate(Target::TypeScript, &[input]).expect("generate");
    let ts = content(&files, "maybe.ts");
    assert!(ts.contains("value: number | null = null;"));
}

#[test]
fn option_bags_shape_the_cpp_json_layer() {
    let desc = DescriptorProto {
        options: Some(MessageOptions {
            jsonif_message_optimistic: Some(true),
            ..Default::default()
        }),
        ..message(
            "Tuned",
            vec![
                FieldDescriptorProto {
                    options: Some(FieldOptions {
                        jsonif_discard_if_default: Some(true),
                        ..Default::default()
                    }),
                    ..scalar_field("skipme", 1, Type::Int32)
                },
                FieldDescriptorProto {
                    options: Some(FieldOptions {
                        jsonif_name: Some("renamed".to_string()),
                        ..Default::default()
                    }),
                    ..scalar_field("original", 2, Type::String)
                },
            ],
        )
    };
    let files = generate(Target::Cpp, &[file("tuned.proto", "test", vec![desc])])
        .expect("generate");
    let cpp = content(&files, "tuned.json.h");

    // discard-if-default wraps the encode in a zero-value check
    assert!(cpp.contains("if (v.skipme != decltype(v.skipme)()) {"));
    // message-level optimistic makes decode tolerate absent keys
    assert!(cpp.contains("if (jv.as_object().find(\"skipme\") != jv.as_object().end()) {"));
    // the custom key replaces the identifier-derived one everywhere
    assert!(cpp.contains("obj[\"renamed\"] = boost::json::value_from(v.original);"));
    assert!(cpp.contains("jv.at(\"renamed\")"));
    assert!(!cpp.contains("obj[\"original\"]"));
}

#[test]
fn suppressed_serializer_fences_encode_out() {
    let desc = DescriptorProto {
        options: Some(MessageOptions {
            jsonif_no_serializer: Some(true),
            ..Default::default()
        }),
        ..message("WriteOnly", vec![scalar_field("x", 1, Type::Int32)])
    };
    let input = file("wo.proto", "test", vec![desc]);

    let files = generate(Target::Cpp, &[input.clone()]).expect("generate");
    assert!(content(&files, "wo.json.h").contains("#if 0"));

    let files = generate(Target::TypeScript, &[input]).expect("generate");
    let ts = content(&files, "wo.ts");
    assert!(!ts.contains("toJson()"));
    assert!(!ts.contains("toObject()"));
    assert!(ts.contains("static fromJson"));
}

#[test]
fn unity_output_path_is_upper_camel() {
    let input = file(
        "dir/foo_bar.proto",
        "test",
        vec![message("Thing", vec![scalar_field("id", 1, Type::Int32)])],
    );
    let files = generate(Target::Unity, &[input]).expect("generate");
    assert!(files.iter().any(|f| f.name == "Dir/FooBar.cs"));
    assert!(files.iter().any(|f| f.name == "Jsonif.cs"));
}

#[test]
fn c_backend_emits_the_three_part_file_set() {
    let files = generate(Target::C, &[point_file()]).expect("generate");
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["point.json.c.h", "point.json.c.hpp", "point.json.c.cpp"]
    );
    let header = content(&files, "point.json.c.h");
    assert!(header.contains("#ifndef AUTO_GENERATED_PROTOC_GEN_JSONIF_C_POINT_PROTO"));
    assert!(header.contains("void test_Point_init(test_Point* v);"));
    assert!(header.contains("void test_Point_destroy(test_Point*);"));
    assert!(header.contains("void test_Point_copy(const test_Point* a, test_Point* b);"));
    assert!(header.contains("bool test_Point_is_equal(const test_Point* a, const test_Point* b);"));
}

#[test]
fn response_advertises_proto3_optional_support() {
    let req = CodeGeneratorRequest {
        file_to_generate: vec!["point.proto".to_string()],
        parameter: None,
        proto_file: vec![point_file()],
    };
    for target in [Target::C, Target::Cpp, Target::TypeScript, Target::Unity] {
        let resp = generate_response(&req, target.backend().as_ref()).expect("generate");
        assert_eq!(resp.supported_features, Some(1));
        assert!(resp.error.is_none());
        assert!(!resp.file.is_empty());
    }
}
