//! Unity C# backend. Emits one `<UpperCamelPath>.cs` per input file plus a
//! shared `Jsonif.cs` wrapping `JsonUtility`. JsonUtility serializes by
//! field name and never fails on absent keys, so the per-field option
//! flags have nothing to attach to here and are accepted as no-ops.

use jsonif_schema::casing::{to_snake_case, to_upper_camel};
use jsonif_schema::{EnumDef, Field, FieldKind, Message, SchemaFile, SchemaModel};

use crate::emitter::Emitter;
use crate::error::JsonifError;
use crate::resolve::{case_member_label, case_type_name, NameResolver};
use crate::typemap;

use super::{base_name, Backend, OutputFile};

pub struct UnityBackend;

struct UnityFile {
    top:      Emitter,
    bottom:   Emitter,
    typedefs: Emitter,
}

impl UnityFile {
    fn new() -> Self {
        UnityFile {
            top:      Emitter::with_indent_unit(4),
            bottom:   Emitter::with_indent_unit(4),
            typedefs: Emitter::with_indent_unit(4),
        }
    }

    fn into_string(self) -> String {
        self.top.into_string() + self.typedefs.as_str() + self.bottom.as_str()
    }
}

impl Backend for UnityBackend {
    fn name(&self) -> &'static str {
        "unity"
    }

    fn generate_file(
        &self,
        file: &SchemaFile,
        _model: &SchemaModel,
        resolver: &NameResolver,
    ) -> Result<Vec<OutputFile>, JsonifError> {
        let mut u = UnityFile::new();

        u.top.p("using System.Collections.Generic;");
        u.top.p("using System.Linq;");

        if let Some(pkg) = &file.package {
            u.top.p(format!("namespace {}", package_to_namespace(pkg)));
            u.top.pi("{");
            u.top.p("");
            u.bottom.p("}");
        }

        u.typedefs.indent();
        for enum_def in &file.enums {
            gen_enum(enum_def, &mut u);
        }
        for message in &file.messages {
            gen_message(message, resolver, &mut u)?;
        }
        u.typedefs.dedent();

        Ok(vec![OutputFile {
            name: format!("{}.cs", path_to_upper_camel(base_name(&file.name))),
            content: u.into_string(),
        }])
    }

    fn shared_files(&self) -> Vec<OutputFile> {
        let mut f = Emitter::with_indent_unit(4);
        f.p("using UnityEngine;");
        f.p("");
        f.p("namespace Jsonif");
        f.pi("{");
        f.p("");
        f.p("public static class Json");
        f.pi("{");
        f.p("public static string ToJson<T>(T v)");
        f.pi("{");
        f.p("return JsonUtility.ToJson(v);");
        f.pd("}");
        f.p("public static T FromJson<T>(string s)");
        f.pi("{");
        f.p("return JsonUtility.FromJson<T>(s);");
        f.pd("}");
        f.pd("}");
        f.p("");
        f.pd("}");

        vec![OutputFile {
            name: "Jsonif.cs".to_string(),
            content: f.into_string(),
        }]
    }
}

/// `foo.bar_baz` → `Foo.BarBaz`.
fn package_to_namespace(package: &str) -> String {
    package
        .split('.')
        .map(to_upper_camel)
        .collect::<Vec<_>>()
        .join(".")
}

/// `foo/bar_baz` → `Foo/BarBaz`.
fn path_to_upper_camel(path: &str) -> String {
    path.split('/')
        .map(to_upper_camel)
        .collect::<Vec<_>>()
        .join("/")
}

/// `(type, default)`; an empty default means C# zero-initialization is
/// already right.
fn type_name(field: &Field, resolver: &NameResolver) -> Result<(String, String), JsonifError> {
    let (ty, default) = match &field.kind {
        FieldKind::Enum(path) | FieldKind::Message(path) => {
            let name = resolver.lookup(path)?.unity_name();
            let default = format!("new {}()", name);
            (name, default)
        }
        FieldKind::String => (
            typemap::UNITY.scalar_storage(&field.kind)?.to_string(),
            "\"\"".to_string(),
        ),
        kind => (
            typemap::UNITY.scalar_storage(kind)?.to_string(),
            String::new(),
        ),
    };
    if field.repeated {
        Ok((format!("List<{}>", ty), format!("new List<{}>()", ty)))
    } else {
        Ok((ty, default))
    }
}

fn gen_enum(enum_def: &EnumDef, u: &mut UnityFile) {
    u.typedefs.p("[System.Serializable]");
    u.typedefs.p(format!("public enum {}", enum_def.name));
    u.typedefs.pi("{");
    for value in &enum_def.values {
        u.typedefs.p(format!("{} = {},", value.name, value.number));
    }
    u.typedefs.pd("}");
    u.typedefs.p("");
}

fn gen_oneof(
    oneof_name: &str,
    members: &[&Field],
    resolver: &NameResolver,
    u: &mut UnityFile,
) -> Result<(), JsonifError> {
    let type_name_ = case_type_name(oneof_name);
    let field_name = format!("{}_case", to_snake_case(oneof_name));
    u.typedefs.p("[System.Serializable]");
    u.typedefs.p(format!("public enum {}", type_name_));
    u.typedefs.pi("{");
    u.typedefs.p("NOT_SET = 0,");
    for member in members {
        u.typedefs.p(format!(
            "{} = {},",
            case_member_label(&member.name),
            member.number
        ));
    }
    u.typedefs.pd("}");
    u.typedefs
        .p(format!("public {} {};", type_name_, field_name));
    u.typedefs.p(format!("public void Clear{}()", type_name_));
    u.typedefs.pi("{");
    u.typedefs
        .p(format!("{} = {}.NOT_SET;", field_name, type_name_));
    for member in members {
        let (member_ty, default) = type_name(member, resolver)?;
        if default.is_empty() {
            u.typedefs.p(format!(
                "{} = default({});",
                to_snake_case(&member.name),
                member_ty
            ));
        } else {
            u.typedefs
                .p(format!("{} = {};", to_snake_case(&member.name), default));
        }
    }
    u.typedefs.pd("}");
    Ok(())
}

fn gen_equals(message: &Message, u: &mut UnityFile) {
    u.typedefs.p("public override bool Equals(object obj)");
    u.typedefs.pi("{");
    u.typedefs
        .p(format!("var v = obj as {};", message.name));
    u.typedefs.p("if (v == null) return false;");

    for field in &message.fields {
        if in_real_oneof(message, field) {
            continue;
        }
        let field_name = to_snake_case(&field.name);
        if field.repeated {
            u.typedefs.p(format!(
                "if (!this.{}.SequenceEqual(v.{})) return false;",
                field_name, field_name
            ));
        } else {
            u.typedefs.p(format!(
                "if (!this.{}.Equals(v.{})) return false;",
                field_name, field_name
            ));
        }
    }
    for (index, oneof) in message.real_oneofs() {
        let oneof_field = format!("{}_case", to_snake_case(&oneof.name));
        let oneof_type = case_type_name(&oneof.name);
        u.typedefs.p(format!(
            "if (!this.{}.Equals(v.{})) return false;",
            oneof_field, oneof_field
        ));
        for member in message.oneof_members(index) {
            let field_name = to_snake_case(&member.name);
            u.typedefs.p(format!(
                "if (this.{} == {}.{} && !this.{}.Equals(v.{})) return false;",
                oneof_field,
                oneof_type,
                case_member_label(&member.name),
                field_name,
                field_name
            ));
        }
    }
    u.typedefs.p("return true;");
    u.typedefs.pd("}");
    u.typedefs.p("");

    u.typedefs.p("public override int GetHashCode()");
    u.typedefs.pi("{");
    u.typedefs.p("int hashcode = 1430287;");
    for field in &message.fields {
        if in_real_oneof(message, field) {
            continue;
        }
        let field_name = to_snake_case(&field.name);
        if field.repeated {
            u.typedefs.p(format!(
                "foreach (var v in this.{}) hashcode = hashcode * 7302013 ^ v.GetHashCode();",
                field_name
            ));
        } else {
            u.typedefs.p(format!(
                "hashcode = hashcode * 7302013 ^ {}.GetHashCode();",
                field_name
            ));
        }
    }
    for (index, oneof) in message.real_oneofs() {
        let oneof_field = format!("{}_case", to_snake_case(&oneof.name));
        let oneof_type = case_type_name(&oneof.name);
        u.typedefs.p(format!(
            "hashcode = hashcode * 7302013 ^ {}.GetHashCode();",
            oneof_field
        ));
        for member in message.oneof_members(index) {
            let field_name = to_snake_case(&member.name);
            u.typedefs.p(format!(
                "if ({} == {}.{}) hashcode = hashcode * 7302013 ^ {}.GetHashCode();",
                oneof_field,
                oneof_type,
                case_member_label(&member.name),
                field_name
            ));
        }
    }
    u.typedefs.p("return hashcode;");
    u.typedefs.pd("}");
    u.typedefs.p("");
}

fn in_real_oneof(message: &Message, field: &Field) -> bool {
    field
        .oneof
        .map(|i| !message.oneofs[i].synthetic)
        .unwrap_or(false)
}

fn gen_message(
    message: &Message,
    resolver: &NameResolver,
    u: &mut UnityFile,
) -> Result<(), JsonifError> {
    u.typedefs.p("[System.Serializable]");
    u.typedefs.p(format!("public class {}", message.name));
    u.typedefs.pi("{");

    for enum_def in &message.enums {
        gen_enum(enum_def, u);
    }
    for nested in &message.nested {
        gen_message(nested, resolver, u)?;
    }
    for (index, oneof) in message.real_oneofs() {
        gen_oneof(&oneof.name, &message.oneof_members(index), resolver, u)?;
    }

    for field in &message.fields {
        let (ty, default) = type_name(field, resolver)?;
        let field_name = to_snake_case(&field.name);
        if default.is_empty() {
            u.typedefs.p(format!("public {} {};", ty, field_name));
        } else {
            u.typedefs
                .p(format!("public {} {} = {};", ty, field_name, default));
        }

        if in_real_oneof(message, field) {
            let oneof = &message.oneofs[field.oneof.unwrap_or_default()];
            let oneof_type = case_type_name(&oneof.name);
            let oneof_field = format!("{}_case", to_snake_case(&oneof.name));
            let upper = to_upper_camel(&field_name);
            u.typedefs.p(format!(
                "public void Set{}({} {})",
                upper, ty, field_name
            ));
            u.typedefs.pi("{");
            u.typedefs.p(format!("Clear{}();", oneof_type));
            u.typedefs.p(format!(
                "{} = {}.{};",
                oneof_field,
                oneof_type,
                case_member_label(&field.name)
            ));
            u.typedefs
                .p(format!("this.{} = {};", field_name, field_name));
            u.typedefs.pd("}");
            u.typedefs.p(format!("public bool Has{}()", upper));
            u.typedefs.pi("{");
            u.typedefs.p(format!(
                "return {} == {}.{};",
                oneof_field,
                oneof_type,
                case_member_label(&field.name)
            ));
            u.typedefs.pd("}");
            u.typedefs.p(format!("public void Clear{}()", upper));
            u.typedefs.pi("{");
            u.typedefs.p(format!(
                "if ({} == {}.{})",
                oneof_field,
                oneof_type,
                case_member_label(&field.name)
            ));
            u.typedefs.pi("{");
            u.typedefs.p(format!("Clear{}();", oneof_type));
            u.typedefs.pd("}");
            u.typedefs.pd("}");
        }
    }

    gen_equals(message, u);

    u.typedefs.pd("}");
    u.typedefs.p("");
    Ok(())
}
