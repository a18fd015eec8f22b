//! C backend. Emits three files per input: `<base>.json.c.h` (the C API),
//! `<base>.json.c.hpp` (bridge declarations) and `<base>.json.c.cpp`
//! (bridge plus implementations). JSON work is delegated to the C++
//! backend's `<base>.json.h` through `_to_cpp`/`_from_cpp` conversions, so
//! the option bags are honored by the C++ serializers the bridge calls.

use jsonif_schema::casing::{to_preprocessor_name, to_snake_case};
use jsonif_schema::{EnumDef, Field, FieldKind, Message, SchemaFile, SchemaModel};

use crate::emitter::Emitter;
use crate::error::JsonifError;
use crate::resolve::{
    c_enum_value_prefix, c_qualified, case_member_label, case_type_name, cpp_qualified,
    NameResolver,
};
use crate::typemap;

use super::{base_name, surviving_dep_bases, Backend, OutputFile};

pub struct CBackend;

#[derive(Default)]
struct CFile {
    h_top:         Emitter,
    h_bottom:      Emitter,
    enums:         Emitter,
    typedefs:      Emitter,
    c_top:         Emitter,
    c_impl_top:    Emitter,
    c_impl:        Emitter,
    c_impl_bottom: Emitter,
    cpp_impl:      Emitter,
    hpp_top:       Emitter,
    hpp_bottom:    Emitter,
    hpp_defs:      Emitter,
}

impl CFile {
    fn header_string(&self) -> String {
        self.h_top.as_str().to_string()
            + self.enums.as_str()
            + self.typedefs.as_str()
            + self.h_bottom.as_str()
    }

    fn hpp_string(&self) -> String {
        self.hpp_top.as_str().to_string() + self.hpp_defs.as_str() + self.hpp_bottom.as_str()
    }

    fn cpp_string(&self) -> String {
        self.c_top.as_str().to_string()
            + self.cpp_impl.as_str()
            + self.c_impl_top.as_str()
            + self.c_impl.as_str()
            + self.c_impl_bottom.as_str()
    }
}

impl Backend for CBackend {
    fn name(&self) -> &'static str {
        "c"
    }

    fn generate_file(
        &self,
        file: &SchemaFile,
        model: &SchemaModel,
        resolver: &NameResolver,
    ) -> Result<Vec<OutputFile>, JsonifError> {
        let base = base_name(&file.name);
        let cpph_file_name = format!("{}.json.h", base);
        let h_file_name = format!("{}.json.c.h", base);
        let hpp_file_name = format!("{}.json.c.hpp", base);
        let cpp_file_name = format!("{}.json.c.cpp", base);

        let dep_bases = surviving_dep_bases(file, model);
        let guard = to_preprocessor_name(&file.name);

        let mut c = CFile::default();
        c.h_top
            .p(format!("#ifndef AUTO_GENERATED_PROTOC_GEN_JSONIF_C_{}", guard));
        c.h_top
            .p(format!("#define AUTO_GENERATED_PROTOC_GEN_JSONIF_C_{}", guard));
        c.h_top.p("");
        c.h_top.p("#include <stdbool.h>");
        c.h_top.p("#include <stddef.h>");
        c.h_top.p("#include <stdint.h>");
        c.h_top.p("");
        for dep in &dep_bases {
            c.h_top.p(format!("#include \"{}.json.c.h\"", dep));
        }
        c.h_top.p("");
        c.h_top.p("#ifdef __cplusplus");
        c.h_top.p("extern \"C\" {");
        c.h_top.p("#endif");
        c.h_top.p("");
        c.h_bottom.p("");
        c.h_bottom.p("#ifdef __cplusplus");
        c.h_bottom.p("}");
        c.h_bottom.p("#endif");
        c.h_bottom.p("");
        c.h_bottom.p("#endif");

        c.c_top.p(format!("#include \"{}\"", h_file_name));
        c.c_top.p("");
        c.c_top.p("#include <stdlib.h>");
        c.c_top.p("#include <string.h>");
        c.c_top.p("");
        c.c_top.p(format!("#include \"{}\"", cpph_file_name));
        c.c_top.p("");
        for dep in &dep_bases {
            c.c_top.p(format!("#include \"{}.json.c.hpp\"", dep));
        }
        c.c_top.p("");
        c.c_impl_top.p("extern \"C\" {");
        c.c_impl_top.p("");
        c.c_impl_bottom.p("");
        c.c_impl_bottom.p("}");

        c.hpp_top
            .p(format!("#ifndef AUTO_GENERATED_PROTOC_GEN_JSONIF_HPP_{}", guard));
        c.hpp_top
            .p(format!("#define AUTO_GENERATED_PROTOC_GEN_JSONIF_HPP_{}", guard));
        c.hpp_top.p("");
        c.hpp_top.p(format!("#include \"{}\"", cpph_file_name));
        c.hpp_top.p(format!("#include \"{}\"", h_file_name));
        c.hpp_top.p("");
        for dep in &dep_bases {
            c.hpp_top.p(format!("#include \"{}.json.c.hpp\"", dep));
        }
        c.hpp_top.p("");
        c.hpp_bottom.p("");
        c.hpp_bottom.p("#endif");

        let package = file.package.as_deref();
        for enum_def in &file.enums {
            gen_enum(enum_def, package, &[], &mut c);
        }
        for message in &file.messages {
            gen_message(message, package, &[], resolver, &mut c)?;
        }

        Ok(vec![
            OutputFile {
                name: h_file_name,
                content: c.header_string(),
            },
            OutputFile {
                name: hpp_file_name,
                content: c.hpp_string(),
            },
            OutputFile {
                name: cpp_file_name,
                content: c.cpp_string(),
            },
        ])
    }
}

/// Storage spelling for a field plus repeated/length bookkeeping:
/// `(type, is_repeated, needs_len)`. Strings and byte buffers carry an
/// explicit length even when singular.
fn c_type(field: &Field, resolver: &NameResolver) -> Result<(String, bool, bool), JsonifError> {
    let mut need_len = false;
    let type_name = match &field.kind {
        FieldKind::Enum(path) | FieldKind::Message(path) => resolver.lookup(path)?.c_name(),
        FieldKind::String => {
            need_len = true;
            typemap::C.scalar_storage(&field.kind)?.to_string()
        }
        FieldKind::Bytes => {
            need_len = true;
            typemap::C.scalar_storage(&field.kind)?.to_string()
        }
        kind => typemap::C.scalar_storage(kind)?.to_string(),
    };
    if field.repeated {
        Ok((format!("{}*", type_name), true, need_len))
    } else {
        Ok((type_name, false, need_len))
    }
}

/// The flattened C name of a referenced message or enum.
fn ref_c_name(field: &Field, resolver: &NameResolver) -> Result<String, JsonifError> {
    match field.kind.type_path() {
        Some(path) => Ok(resolver.lookup(path)?.c_name()),
        None => Err(JsonifError::Input(format!(
            "field {} is not a reference type",
            field.name
        ))),
    }
}

fn gen_enum(enum_def: &EnumDef, package: Option<&str>, parents: &[String], c: &mut CFile) {
    c.enums.p(format!("// {}", enum_def.name));

    let q_name = c_qualified(package, parents, &enum_def.name);
    let value_prefix = c_enum_value_prefix(package, parents);

    c.enums.p(format!("typedef int {};", q_name));
    for value in &enum_def.values {
        c.enums.p(format!(
            "extern const {} {}_{};",
            q_name, value_prefix, value.name
        ));
    }
    c.enums.p("");

    c.cpp_impl.p(format!("// {}", enum_def.name));
    for value in &enum_def.values {
        c.cpp_impl.p(format!(
            "const {} {}_{} = {};",
            q_name, value_prefix, value.name, value.number
        ));
    }
    c.cpp_impl.p("");
}

fn gen_oneof_enum(
    oneof_name: &str,
    members: &[&Field],
    package: Option<&str>,
    parents: &[String],
    c: &mut CFile,
) {
    let q_name = c_qualified(package, parents, &case_type_name(oneof_name));
    c.enums.p(format!("// {}", oneof_name));
    c.enums.p(format!("typedef int {};", q_name));
    c.enums.p(format!("const {} {}_NOT_SET = 0;", q_name, q_name));
    for member in members {
        c.enums.p(format!(
            "const {} {}_{} = {};",
            q_name,
            q_name,
            case_member_label(&member.name),
            member.number
        ));
    }
    c.enums.p("");
}

/// Destroy-body fragment for one field. Shared by `_destroy` and the oneof
/// `_clear_*` implementations so a cleared member can never be released
/// twice.
fn emit_release_field(
    f: &mut Emitter,
    field: &Field,
    resolver: &NameResolver,
) -> Result<(), JsonifError> {
    let field_name = to_snake_case(&field.name);
    if !field.repeated {
        match &field.kind {
            FieldKind::String | FieldKind::Bytes => {
                f.p(format!("if (v->{}) free(v->{});", field_name, field_name));
                f.p(format!("v->{} = nullptr;", field_name));
                f.p(format!("v->{}_len = 0;", field_name));
            }
            FieldKind::Message(_) => {
                let type_name = ref_c_name(field, resolver)?;
                f.p(format!("{}_destroy(&v->{});", type_name, field_name));
            }
            _ => {
                f.p(format!(
                    "memset(&v->{}, 0, sizeof(v->{}));",
                    field_name, field_name
                ));
            }
        }
        return Ok(());
    }

    match &field.kind {
        FieldKind::String | FieldKind::Bytes => {
            f.pi(format!("for (int i = 0; i < v->{}_len; i++) {{", field_name));
            f.p(format!("if (v->{}[i]) free(v->{}[i]);", field_name, field_name));
            f.p(format!("v->{}[i] = nullptr;", field_name));
            f.p(format!("v->{}_lens[i] = 0;", field_name));
            f.pd("}");
            f.p(format!("if (v->{}_lens) free(v->{}_lens);", field_name, field_name));
            f.p(format!("v->{}_lens = nullptr;", field_name));
        }
        FieldKind::Message(_) => {
            let type_name = ref_c_name(field, resolver)?;
            f.pi(format!("for (int i = 0; i < v->{}_len; i++) {{", field_name));
            f.p(format!("{}_destroy(&v->{}[i]);", type_name, field_name));
            f.pd("}");
        }
        _ => {}
    }
    f.p(format!("if (v->{}) free(v->{});", field_name, field_name));
    f.p(format!("v->{} = nullptr;", field_name));
    f.p(format!("v->{}_len = 0;", field_name));
    Ok(())
}

fn gen_message(
    message: &Message,
    package: Option<&str>,
    parents: &[String],
    resolver: &NameResolver,
    c: &mut CFile,
) -> Result<(), JsonifError> {
    let mut child_parents = parents.to_vec();
    child_parents.push(message.name.clone());

    for enum_def in &message.enums {
        gen_enum(enum_def, package, &child_parents, c);
    }
    for nested in &message.nested {
        gen_message(nested, package, &child_parents, resolver, c)?;
    }
    for (index, oneof) in message.real_oneofs() {
        gen_oneof_enum(
            &oneof.name,
            &message.oneof_members(index),
            package,
            &child_parents,
            c,
        );
    }

    let q_name = c_qualified(package, parents, &message.name);
    let q_cpp_name = cpp_qualified(package, parents, &message.name);

    // struct layout
    c.typedefs.p(format!("// {}", message.name));
    c.typedefs.pi("typedef struct {");
    for field in &message.fields {
        let (type_name, is_repeated, need_len) = c_type(field, resolver)?;
        let field_name = to_snake_case(&field.name);
        c.typedefs.p(format!("{} {};", type_name, field_name));
        if is_repeated && need_len {
            c.typedefs.p(format!("int* {}_lens;", field_name));
        }
        if is_repeated || need_len {
            c.typedefs.p(format!("int {}_len;", field_name));
        }
    }
    for (_, oneof) in message.real_oneofs() {
        let case_q = c_qualified(package, &child_parents, &case_type_name(&oneof.name));
        c.typedefs
            .p(format!("{} {}_case;", case_q, to_snake_case(&oneof.name)));
    }
    c.typedefs.pd(format!("}} {};", q_name));
    c.typedefs.p("");

    // declarations
    c.typedefs.p(format!("int {}_size();", q_name));
    c.typedefs.p(format!("void {}_init({}* v);", q_name, q_name));
    c.typedefs.p(format!("void {}_destroy({}*);", q_name, q_name));
    c.typedefs.p(format!(
        "void {}_copy(const {}* a, {}* b);",
        q_name, q_name, q_name
    ));
    c.typedefs.p(format!(
        "bool {}_is_equal(const {}* a, const {}* b);",
        q_name, q_name, q_name
    ));
    c.typedefs
        .p(format!("int {}_to_json_size(const {}*);", q_name, q_name));
    c.typedefs
        .p(format!("void {}_to_json(const {}*, char* json);", q_name, q_name));
    c.typedefs
        .p(format!("void {}_from_json(const char* json, {}*);", q_name, q_name));
    for field in &message.fields {
        let field_name = to_snake_case(&field.name);
        if !field.repeated {
            match &field.kind {
                FieldKind::String => {
                    c.typedefs.p(format!(
                        "void {}_set_{}({}* v, const char* s);",
                        q_name, field_name, q_name
                    ));
                }
                FieldKind::Bytes => {
                    c.typedefs.p(format!(
                        "void {}_set_{}({}* v, const uint8_t* buf, int size);",
                        q_name, field_name, q_name
                    ));
                }
                FieldKind::Message(_) => {
                    let (type_name, _, _) = c_type(field, resolver)?;
                    c.typedefs.p(format!(
                        "void {}_set_{}({}* v, const {}* m);",
                        q_name, field_name, q_name, type_name
                    ));
                }
                _ => {
                    let (type_name, _, _) = c_type(field, resolver)?;
                    c.typedefs.p(format!(
                        "void {}_set_{}({}* v, {} m);",
                        q_name, field_name, q_name, type_name
                    ));
                }
            }
        } else {
            c.typedefs.p(format!(
                "void {}_alloc_{}({}* v, int num);",
                q_name, field_name, q_name
            ));
            match &field.kind {
                FieldKind::String => {
                    c.typedefs.p(format!(
                        "void {}_set_{}({}* v, int n, const char* s);",
                        q_name, field_name, q_name
                    ));
                }
                FieldKind::Bytes => {
                    c.typedefs.p(format!(
                        "void {}_set_{}({}* v, int n, const uint8_t* buf, int size);",
                        q_name, field_name, q_name
                    ));
                }
                FieldKind::Message(_) => {
                    let (type_name, _, _) = c_type(field, resolver)?;
                    let element = type_name.replace('*', "");
                    c.typedefs.p(format!(
                        "void {}_set_{}({}* v, int n, const {}* m);",
                        q_name, field_name, q_name, element
                    ));
                }
                _ => {
                    let (type_name, _, _) = c_type(field, resolver)?;
                    let element = type_name.replace('*', "");
                    c.typedefs.p(format!(
                        "void {}_set_{}({}* v, int n, {} m);",
                        q_name, field_name, q_name, element
                    ));
                }
            }
        }
    }
    c.typedefs.p("");
    for (_, oneof) in message.real_oneofs() {
        c.typedefs.p(format!(
            "void {}_clear_{}_case({}* v);",
            q_name,
            to_snake_case(&oneof.name),
            q_name
        ));
    }

    // C++-only bridge declarations
    c.hpp_defs.p(format!(
        "{} {}_to_cpp(const {}* v);",
        q_cpp_name, q_name, q_name
    ));
    c.hpp_defs.p(format!(
        "void {}_from_cpp(const {}& u, {}* v);",
        q_name, q_cpp_name, q_name
    ));

    gen_to_cpp(message, package, parents, resolver, &q_name, &q_cpp_name, c)?;
    gen_from_cpp(message, resolver, &q_name, &q_cpp_name, c)?;
    gen_core_impl(message, resolver, &q_name, &q_cpp_name, c)?;
    gen_setters(message, package, &child_parents, resolver, &q_name, c)?;
    gen_oneof_clears(message, package, &child_parents, resolver, &q_name, c)?;

    Ok(())
}

fn gen_to_cpp(
    message: &Message,
    package: Option<&str>,
    parents: &[String],
    resolver: &NameResolver,
    q_name: &str,
    q_cpp_name: &str,
    c: &mut CFile,
) -> Result<(), JsonifError> {
    let mut child_parents = parents.to_vec();
    child_parents.push(message.name.clone());

    c.cpp_impl.pi(format!(
        "{} {}_to_cpp(const {}* v) {{",
        q_cpp_name, q_name, q_name
    ));
    c.cpp_impl.p(format!("{} u;", q_cpp_name));
    for field in &message.fields {
        let field_name = to_snake_case(&field.name);
        if !field.repeated {
            match &field.kind {
                FieldKind::String => {
                    c.cpp_impl.p(format!(
                        "if (v->{}_len != 0) u.{} = std::string(v->{}, v->{}_len);",
                        field_name, field_name, field_name, field_name
                    ));
                }
                FieldKind::Bytes => {
                    c.cpp_impl.p(format!(
                        "if (v->{}_len != 0) u.{} = std::string((const char*)v->{}, v->{}_len);",
                        field_name, field_name, field_name, field_name
                    ));
                }
                FieldKind::Message(_) => {
                    let type_name = ref_c_name(field, resolver)?;
                    c.cpp_impl.p(format!(
                        "u.{} = {}_to_cpp(&v->{});",
                        field_name, type_name, field_name
                    ));
                }
                FieldKind::Enum(_) => {
                    c.cpp_impl.p(format!(
                        "u.{} = (decltype(u.{}))v->{};",
                        field_name, field_name, field_name
                    ));
                }
                _ => {
                    c.cpp_impl
                        .p(format!("u.{} = v->{};", field_name, field_name));
                }
            }
        } else {
            c.cpp_impl
                .pi(format!("for (int i = 0; i < v->{}_len; i++) {{", field_name));
            match &field.kind {
                FieldKind::String => {
                    c.cpp_impl.pi(format!("if (v->{}_lens[i] != 0) {{", field_name));
                    c.cpp_impl.p(format!(
                        "u.{}.push_back(std::string(v->{}[i], v->{}_lens[i]));",
                        field_name, field_name, field_name
                    ));
                    c.cpp_impl.pdi("} else {");
                    c.cpp_impl.p(format!("u.{}.push_back(\"\");", field_name));
                    c.cpp_impl.pd("}");
                }
                FieldKind::Bytes => {
                    c.cpp_impl.pi(format!("if (v->{}_lens[i] != 0) {{", field_name));
                    c.cpp_impl.p(format!(
                        "u.{}.push_back(std::string((const char*)v->{}[i], v->{}_lens[i]));",
                        field_name, field_name, field_name
                    ));
                    c.cpp_impl.pdi("} else {");
                    c.cpp_impl.p(format!("u.{}.push_back(\"\");", field_name));
                    c.cpp_impl.pd("}");
                }
                FieldKind::Message(_) => {
                    let type_name = ref_c_name(field, resolver)?;
                    c.cpp_impl.p(format!(
                        "u.{}.push_back({}_to_cpp(&v->{}[i]));",
                        field_name, type_name, field_name
                    ));
                }
                FieldKind::Enum(_) => {
                    c.cpp_impl.p(format!(
                        "u.{}.push_back((decltype(u.{}[0]))v->{}[i]);",
                        field_name, field_name, field_name
                    ));
                }
                _ => {
                    c.cpp_impl
                        .p(format!("u.{}.push_back(v->{}[i]);", field_name, field_name));
                }
            }
            c.cpp_impl.pd("}");
        }
    }
    for (_, oneof) in message.real_oneofs() {
        let field_name = format!("{}_case", to_snake_case(&oneof.name));
        let case_q = cpp_qualified(package, &child_parents, &case_type_name(&oneof.name));
        c.cpp_impl.p(format!(
            "u.{} = ({})v->{};",
            field_name, case_q, field_name
        ));
    }
    c.cpp_impl.p("return u;");
    c.cpp_impl.pd("}");
    Ok(())
}

fn gen_from_cpp(
    message: &Message,
    resolver: &NameResolver,
    q_name: &str,
    q_cpp_name: &str,
    c: &mut CFile,
) -> Result<(), JsonifError> {
    c.cpp_impl.pi(format!(
        "void {}_from_cpp(const {}& u, {}* v) {{",
        q_name, q_cpp_name, q_name
    ));
    c.cpp_impl.p(format!("{}_destroy(v);", q_name));
    c.cpp_impl.p(format!("{}_init(v);", q_name));
    for field in &message.fields {
        let field_name = to_snake_case(&field.name);
        if !field.repeated {
            match &field.kind {
                FieldKind::String => {
                    c.cpp_impl.p(format!(
                        "if (!u.{}.empty()) v->{} = strdup(u.{}.c_str());",
                        field_name, field_name, field_name
                    ));
                    c.cpp_impl
                        .p(format!("v->{}_len = (int)u.{}.size();", field_name, field_name));
                }
                FieldKind::Bytes => {
                    c.cpp_impl.pi(format!("if (!u.{}.empty()) {{", field_name));
                    c.cpp_impl.p(format!(
                        "v->{} = (uint8_t*)malloc(sizeof(uint8_t) * u.{}.size());",
                        field_name, field_name
                    ));
                    c.cpp_impl.p(format!(
                        "memcpy(v->{}, u.{}.data(), u.{}.size());",
                        field_name, field_name, field_name
                    ));
                    c.cpp_impl.pd("}");
                    c.cpp_impl
                        .p(format!("v->{}_len = (int)u.{}.size();", field_name, field_name));
                }
                FieldKind::Message(_) => {
                    let type_name = ref_c_name(field, resolver)?;
                    c.cpp_impl.p(format!(
                        "{}_from_cpp(u.{}, &v->{});",
                        type_name, field_name, field_name
                    ));
                }
                FieldKind::Enum(_) => {
                    c.cpp_impl
                        .p(format!("v->{} = (int)u.{};", field_name, field_name));
                }
                _ => {
                    c.cpp_impl
                        .p(format!("v->{} = u.{};", field_name, field_name));
                }
            }
        } else {
            c.cpp_impl
                .p(format!("v->{}_len = (int)u.{}.size();", field_name, field_name));
            c.cpp_impl.p(format!(
                "v->{} = v->{}_len == 0 ? nullptr : (decltype(v->{}))malloc(sizeof(v->{}[0]) * u.{}.size());",
                field_name, field_name, field_name, field_name, field_name
            ));
            if matches!(field.kind, FieldKind::String | FieldKind::Bytes) {
                c.cpp_impl.p(format!(
                    "v->{}_lens = v->{}_len == 0 ? nullptr : (int*)malloc(sizeof(int) * u.{}.size());",
                    field_name, field_name, field_name
                ));
            }
            c.cpp_impl.pi(format!(
                "for (int i = 0; i < (int)u.{}.size(); i++) {{",
                field_name
            ));
            match &field.kind {
                FieldKind::String => {
                    c.cpp_impl.p(format!(
                        "if (!u.{}[i].empty()) v->{}[i] = strdup(u.{}[i].c_str());",
                        field_name, field_name, field_name
                    ));
                    c.cpp_impl.p(format!(
                        "v->{}_lens[i] = (int)u.{}[i].size();",
                        field_name, field_name
                    ));
                }
                FieldKind::Bytes => {
                    c.cpp_impl.pi(format!("if (!u.{}[i].empty()) {{", field_name));
                    c.cpp_impl.p(format!(
                        "v->{}[i] = (uint8_t*)malloc(sizeof(uint8_t) * u.{}[i].size());",
                        field_name, field_name
                    ));
                    c.cpp_impl.p(format!(
                        "memcpy(v->{}[i], u.{}[i].data(), u.{}[i].size());",
                        field_name, field_name, field_name
                    ));
                    c.cpp_impl.pd("}");
                    c.cpp_impl.p(format!(
                        "v->{}_lens[i] = (int)u.{}[i].size();",
                        field_name, field_name
                    ));
                }
                FieldKind::Message(_) => {
                    let type_name = ref_c_name(field, resolver)?;
                    c.cpp_impl
                        .p(format!("{}_init(&v->{}[i]);", type_name, field_name));
                    c.cpp_impl.p(format!(
                        "{}_from_cpp(u.{}[i], &v->{}[i]);",
                        type_name, field_name, field_name
                    ));
                }
                FieldKind::Enum(_) => {
                    c.cpp_impl
                        .p(format!("v->{}[i] = (int)u.{}[i];", field_name, field_name));
                }
                _ => {
                    c.cpp_impl
                        .p(format!("v->{}[i] = u.{}[i];", field_name, field_name));
                }
            }
            c.cpp_impl.pd("}");
        }
    }
    for (_, oneof) in message.real_oneofs() {
        let field_name = format!("{}_case", to_snake_case(&oneof.name));
        c.cpp_impl
            .p(format!("v->{} = (int)u.{};", field_name, field_name));
    }
    c.cpp_impl.pd("}");
    Ok(())
}

fn gen_core_impl(
    message: &Message,
    resolver: &NameResolver,
    q_name: &str,
    q_cpp_name: &str,
    c: &mut CFile,
) -> Result<(), JsonifError> {
    // size
    c.c_impl.pi(format!("int {}_size() {{", q_name));
    c.c_impl.p(format!("return sizeof({});", q_name));
    c.c_impl.pd("}");

    // init
    c.c_impl.pi(format!("void {}_init({}* v) {{", q_name, q_name));
    c.c_impl.p(format!("memset(v, 0, sizeof({}));", q_name));
    c.c_impl.pd("}");

    // destroy
    c.c_impl
        .pi(format!("void {}_destroy({}* v) {{", q_name, q_name));
    for field in &message.fields {
        emit_release_field(&mut c.c_impl, field, resolver)?;
    }
    c.c_impl.pd("}");

    // copy goes through the JSON representation to keep ownership simple
    c.c_impl.pi(format!(
        "void {}_copy(const {}* a, {}* b) {{",
        q_name, q_name, q_name
    ));
    c.c_impl.p("if (a == b) return;");
    c.c_impl.p(format!("int size = {}_to_json_size(a);", q_name));
    c.c_impl.p("std::string json(size - 1, 0);");
    c.c_impl.p(format!("{}_to_json(a, &json[0]);", q_name));
    c.c_impl.p(format!("{}_from_json(json.c_str(), b);", q_name));
    c.c_impl.pd("}");

    // is_equal
    c.c_impl.pi(format!(
        "bool {}_is_equal(const {}* a, const {}* b) {{",
        q_name, q_name, q_name
    ));
    c.c_impl.p("if (a == b) return true;");
    c.c_impl
        .p(format!("{} ua = {}_to_cpp(a);", q_cpp_name, q_name));
    c.c_impl
        .p(format!("{} ub = {}_to_cpp(b);", q_cpp_name, q_name));
    c.c_impl.p("return ua == ub;");
    c.c_impl.pd("}");

    // to_json_size
    c.c_impl
        .pi(format!("int {}_to_json_size(const {}* v) {{", q_name, q_name));
    c.c_impl.p(format!("{} u = {}_to_cpp(v);", q_cpp_name, q_name));
    c.c_impl.p("return jsonif::to_json(u).size() + 1;");
    c.c_impl.pd("}");

    // to_json
    c.c_impl.pi(format!(
        "void {}_to_json(const {}* v, char* json) {{",
        q_name, q_name
    ));
    c.c_impl.p(format!("{} u = {}_to_cpp(v);", q_cpp_name, q_name));
    c.c_impl.p("std::string str = jsonif::to_json(u);");
    c.c_impl.p("memcpy(json, str.c_str(), str.size() + 1);");
    c.c_impl.pd("}");

    // from_json
    c.c_impl.pi(format!(
        "void {}_from_json(const char* json, {}* v) {{",
        q_name, q_name
    ));
    c.c_impl.p(format!(
        "{} u = jsonif::from_json<{}>(json);",
        q_cpp_name, q_cpp_name
    ));
    c.c_impl.p(format!("{}_from_cpp(u, v);", q_name));
    c.c_impl.pd("}");
    Ok(())
}

fn gen_setters(
    message: &Message,
    package: Option<&str>,
    child_parents: &[String],
    resolver: &NameResolver,
    q_name: &str,
    c: &mut CFile,
) -> Result<(), JsonifError> {
    for field in &message.fields {
        let field_name = to_snake_case(&field.name);
        if !field.repeated {
            // Switching a oneof discriminant releases the previous payload
            // before the new one is assigned.
            let case_lines: Vec<String> = match field.oneof {
                Some(i) if !message.oneofs[i].synthetic => {
                    let oneof = &message.oneofs[i];
                    let oneof_field = format!("{}_case", to_snake_case(&oneof.name));
                    let oneof_q =
                        c_qualified(package, child_parents, &case_type_name(&oneof.name));
                    vec![
                        format!("{}_clear_{}(v);", q_name, oneof_field),
                        format!(
                            "v->{} = {}_{};",
                            oneof_field,
                            oneof_q,
                            case_member_label(&field.name)
                        ),
                    ]
                }
                _ => Vec::new(),
            };

            match &field.kind {
                FieldKind::String => {
                    c.c_impl.pi(format!(
                        "void {}_set_{}({}* v, const char* s) {{",
                        q_name, field_name, q_name
                    ));
                    for line in &case_lines {
                        c.c_impl.p(line);
                    }
                    c.c_impl
                        .p(format!("if (v->{}) free(v->{});", field_name, field_name));
                    c.c_impl.p(format!(
                        "v->{}_len = s == nullptr ? 0 : strlen(s);",
                        field_name
                    ));
                    c.c_impl.p(format!(
                        "v->{} = v->{}_len == 0 ? nullptr : strdup(s);",
                        field_name, field_name
                    ));
                    c.c_impl.pd("}");
                }
                FieldKind::Bytes => {
                    c.c_impl.pi(format!(
                        "void {}_set_{}({}* v, const uint8_t* buf, int size) {{",
                        q_name, field_name, q_name
                    ));
                    for line in &case_lines {
                        c.c_impl.p(line);
                    }
                    c.c_impl
                        .p(format!("if (v->{}) free(v->{});", field_name, field_name));
                    c.c_impl.p(format!("v->{} = nullptr;", field_name));
                    c.c_impl.p(format!(
                        "v->{}_len = buf == nullptr ? 0 : size;",
                        field_name
                    ));
                    c.c_impl.pi(format!("if (v->{}_len != 0) {{", field_name));
                    c.c_impl
                        .p(format!("v->{} = (uint8_t*)malloc(size);", field_name));
                    c.c_impl.p(format!("memcpy(v->{}, buf, size);", field_name));
                    c.c_impl.pd("}");
                    c.c_impl.pd("}");
                }
                FieldKind::Message(_) => {
                    let (type_name, _, _) = c_type(field, resolver)?;
                    c.c_impl.pi(format!(
                        "void {}_set_{}({}* v, const {}* m) {{",
                        q_name, field_name, q_name, type_name
                    ));
                    for line in &case_lines {
                        c.c_impl.p(line);
                    }
                    c.c_impl
                        .p(format!("{}_copy(m, &v->{});", type_name, field_name));
                    c.c_impl.pd("}");
                }
                _ => {
                    let (type_name, _, _) = c_type(field, resolver)?;
                    c.c_impl.pi(format!(
                        "void {}_set_{}({}* v, {} m) {{",
                        q_name, field_name, q_name, type_name
                    ));
                    for line in &case_lines {
                        c.c_impl.p(line);
                    }
                    c.c_impl.p(format!("v->{} = m;", field_name));
                    c.c_impl.pd("}");
                }
            }
        } else {
            c.c_impl.pi(format!(
                "void {}_alloc_{}({}* v, int num) {{",
                q_name, field_name, q_name
            ));
            c.c_impl
                .p(format!("if (v->{}) free(v->{});", field_name, field_name));
            c.c_impl.p(format!("v->{} = nullptr;", field_name));
            c.c_impl.p(format!("v->{}_len = 0;", field_name));
            c.c_impl.pi("if (num != 0) {");
            c.c_impl.p(format!(
                "v->{} = (decltype(v->{}))malloc(sizeof(v->{}[0]) * num);",
                field_name, field_name, field_name
            ));
            c.c_impl.p(format!(
                "memset(v->{}, 0, sizeof(v->{}[0]) * num);",
                field_name, field_name
            ));
            c.c_impl.p(format!("v->{}_len = num;", field_name));
            if matches!(field.kind, FieldKind::String | FieldKind::Bytes) {
                c.c_impl.p(format!(
                    "v->{}_lens = (decltype(v->{}_lens))malloc(sizeof(v->{}_lens[0]) * num);",
                    field_name, field_name, field_name
                ));
                c.c_impl.p(format!(
                    "memset(v->{}_lens, 0, sizeof(v->{}_lens[0]) * num);",
                    field_name, field_name
                ));
            }
            c.c_impl.pd("}");
            c.c_impl.pd("}");
            c.c_impl.p("");
            match &field.kind {
                FieldKind::String => {
                    c.c_impl.pi(format!(
                        "void {}_set_{}({}* v, int n, const char* s) {{",
                        q_name, field_name, q_name
                    ));
                    c.c_impl
                        .p(format!("if (v->{}[n]) free(v->{}[n]);", field_name, field_name));
                    c.c_impl.p(format!(
                        "v->{}_lens[n] = s == nullptr ? 0 : strlen(s);",
                        field_name
                    ));
                    c.c_impl.p(format!(
                        "v->{}[n] = v->{}_lens[n] == 0 ? nullptr : strdup(s);",
                        field_name, field_name
                    ));
                    c.c_impl.pd("}");
                }
                FieldKind::Bytes => {
                    c.c_impl.pi(format!(
                        "void {}_set_{}({}* v, int n, const uint8_t* buf, int size) {{",
                        q_name, field_name, q_name
                    ));
                    c.c_impl
                        .p(format!("if (v->{}[n]) free(v->{}[n]);", field_name, field_name));
                    c.c_impl.p(format!("v->{}[n] = nullptr;", field_name));
                    c.c_impl.p(format!(
                        "v->{}_lens[n] = buf == nullptr ? 0 : size;",
                        field_name
                    ));
                    c.c_impl.pi(format!("if (v->{}_lens[n] != 0) {{", field_name));
                    c.c_impl
                        .p(format!("v->{}[n] = (uint8_t*)malloc(size);", field_name));
                    c.c_impl.p(format!("memcpy(v->{}[n], buf, size);", field_name));
                    c.c_impl.pd("}");
                    c.c_impl.pd("}");
                }
                FieldKind::Message(_) => {
                    let (type_name, _, _) = c_type(field, resolver)?;
                    let element = type_name.replace('*', "");
                    c.c_impl.pi(format!(
                        "void {}_set_{}({}* v, int n, const {}* m) {{",
                        q_name, field_name, q_name, element
                    ));
                    c.c_impl
                        .p(format!("{}_copy(m, &v->{}[n]);", element, field_name));
                    c.c_impl.pd("}");
                }
                _ => {
                    let (type_name, _, _) = c_type(field, resolver)?;
                    let element = type_name.replace('*', "");
                    c.c_impl.pi(format!(
                        "void {}_set_{}({}* v, int n, {} m) {{",
                        q_name, field_name, q_name, element
                    ));
                    c.c_impl.p(format!("v->{}[n] = m;", field_name));
                    c.c_impl.pd("}");
                }
            }
        }
    }
    Ok(())
}

fn gen_oneof_clears(
    message: &Message,
    package: Option<&str>,
    child_parents: &[String],
    resolver: &NameResolver,
    q_name: &str,
    c: &mut CFile,
) -> Result<(), JsonifError> {
    for (index, oneof) in message.real_oneofs() {
        let oneof_field = format!("{}_case", to_snake_case(&oneof.name));
        let oneof_q = c_qualified(package, child_parents, &case_type_name(&oneof.name));
        c.c_impl.pi(format!(
            "void {}_clear_{}({}* v) {{",
            q_name, oneof_field, q_name
        ));
        for member in message.oneof_members(index) {
            emit_release_field(&mut c.c_impl, member, resolver)?;
        }
        c.c_impl
            .p(format!("v->{} = {}_NOT_SET;", oneof_field, oneof_q));
        c.c_impl.pd("}");
    }
    Ok(())
}
