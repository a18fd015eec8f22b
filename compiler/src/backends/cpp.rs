//! C++ backend. Emits one `<base>.json.h` per input file: value-type
//! structs with zero-value member initialization, oneof discriminants with
//! invariant-preserving mutators, `operator==`, and boost::json
//! `tag_invoke` encode/decode honoring the resolved option bags. The C
//! backend's bridge layer includes this header and reuses its types.

use jsonif_schema::casing::to_snake_case;
use jsonif_schema::{EnumDef, Field, FieldKind, Message, SchemaFile, SchemaModel};

use crate::emitter::Emitter;
use crate::error::JsonifError;
use crate::resolve::{case_member_label, case_type_name, cpp_qualified, NameResolver};
use crate::typemap;

use super::{base_name, surviving_dep_bases, Backend, OutputFile};

pub struct CppBackend;

#[derive(Default)]
struct CppFile {
    top:         Emitter,
    bottom:      Emitter,
    typedefs:    Emitter,
    tag_invokes: Emitter,
}

impl CppFile {
    fn into_string(self) -> String {
        self.top.into_string()
            + self.typedefs.as_str()
            + self.tag_invokes.as_str()
            + self.bottom.as_str()
    }
}

impl Backend for CppBackend {
    fn name(&self) -> &'static str {
        "cpp"
    }

    fn generate_file(
        &self,
        file: &SchemaFile,
        model: &SchemaModel,
        resolver: &NameResolver,
    ) -> Result<Vec<OutputFile>, JsonifError> {
        let pkgs: Vec<&str> = match &file.package {
            Some(pkg) => pkg.split('.').collect(),
            None => Vec::new(),
        };

        let mut cpp = CppFile::default();
        cpp.top.p("#include <string>");
        cpp.top.p("#include <vector>");
        cpp.top.p("#include <stddef.h>");
        cpp.top.p("");
        cpp.top.p("#include <boost/json.hpp>");
        cpp.top.p("");
        for dep in surviving_dep_bases(file, model) {
            cpp.top.p(format!("#include \"{}.json.h\"", dep));
        }
        cpp.top.p("");
        for pkg in &pkgs {
            cpp.top.p(format!("namespace {} {{", pkg));
        }
        cpp.top.p("");

        cpp.bottom.p("");
        for _ in &pkgs {
            cpp.bottom.p("}");
        }
        cpp.bottom.p("");
        cpp.bottom.p("#ifndef JSONIF_HELPER_DEFINED");
        cpp.bottom.p("#define JSONIF_HELPER_DEFINED");
        cpp.bottom.p("");
        cpp.bottom.p("namespace jsonif {");
        cpp.bottom.p("");
        cpp.bottom.p("template<class T>");
        cpp.bottom.pi("inline T from_json(const std::string& s) {");
        cpp.bottom
            .p("return boost::json::value_to<T>(boost::json::parse(s));");
        cpp.bottom.pd("}");
        cpp.bottom.p("");
        cpp.bottom.p("template<class T>");
        cpp.bottom.pi("inline std::string to_json(const T& v) {");
        cpp.bottom
            .p("return boost::json::serialize(boost::json::value_from(v));");
        cpp.bottom.pd("}");
        cpp.bottom.p("");
        cpp.bottom.p("}");
        cpp.bottom.p("");
        cpp.bottom.p("#endif");

        let package = file.package.as_deref();
        for enum_def in &file.enums {
            gen_enum(enum_def, package, &[], &mut cpp);
        }
        for message in &file.messages {
            gen_message(message, package, &[], resolver, &mut cpp)?;
        }

        Ok(vec![OutputFile {
            name: format!("{}.json.h", base_name(&file.name)),
            content: cpp.into_string(),
        }])
    }
}

/// Storage spelling for a field, vector-wrapped when repeated.
fn type_name(field: &Field, resolver: &NameResolver) -> Result<String, JsonifError> {
    let base = match &field.kind {
        FieldKind::Enum(path) | FieldKind::Message(path) => resolver.lookup(path)?.cpp_name(),
        kind => typemap::CPP.scalar_storage(kind)?.to_string(),
    };
    Ok(if field.repeated {
        format!("std::vector<{}>", base)
    } else {
        base
    })
}

/// Whether a mutator should take its argument by const reference.
fn pass_by_ref(field: &Field) -> bool {
    field.repeated
        || matches!(
            field.kind,
            FieldKind::String | FieldKind::Message(_)
        )
}

fn gen_enum(enum_def: &EnumDef, package: Option<&str>, parents: &[String], cpp: &mut CppFile) {
    cpp.typedefs.pi(format!("enum class {} {{", enum_def.name));
    cpp.typedefs
        .p(format!("{}_Invalid = -1,", enum_def.name));
    for value in &enum_def.values {
        cpp.typedefs.p(format!("{} = {},", value.name, value.number));
    }
    cpp.typedefs.pd("};");
    cpp.typedefs.p("");

    let q_name = cpp_qualified(package, parents, &enum_def.name);
    cpp.tag_invokes.p(format!("// {}", q_name));
    cpp.tag_invokes.pi(format!(
        "void tag_invoke(const boost::json::value_from_tag&, boost::json::value& jv, const {}& v) {{",
        q_name
    ));
    cpp.tag_invokes.pi("switch (v) {");
    for value in &enum_def.values {
        cpp.tag_invokes
            .p(format!("case {}::{}:", q_name, value.name));
    }
    cpp.tag_invokes.indent();
    cpp.tag_invokes.p("jv = (int)v;");
    cpp.tag_invokes.p("break;");
    cpp.tag_invokes.dedent();
    cpp.tag_invokes.p("default:");
    cpp.tag_invokes.indent();
    cpp.tag_invokes
        .p(format!("jv = (int){}::{}_Invalid;", q_name, enum_def.name));
    cpp.tag_invokes.p("break;");
    cpp.tag_invokes.dedent();
    cpp.tag_invokes.pd("}");
    cpp.tag_invokes.pd("}");
    cpp.tag_invokes.p("");
    cpp.tag_invokes.pi(format!(
        "{} tag_invoke(const boost::json::value_to_tag<{}>&, const boost::json::value& jv) {{",
        q_name, q_name
    ));
    cpp.tag_invokes
        .p(format!("return ({})boost::json::value_to<int>(jv);", q_name));
    cpp.tag_invokes.pd("}");
    cpp.tag_invokes.p("");
}

/// Emits the plain cast-through-int tag_invokes a oneof discriminant needs.
fn gen_case_tag_invokes(q_name: &str, cpp: &mut CppFile) {
    cpp.tag_invokes.p(format!("// {}", q_name));
    cpp.tag_invokes.pi(format!(
        "void tag_invoke(const boost::json::value_from_tag&, boost::json::value& jv, const {}& v) {{",
        q_name
    ));
    cpp.tag_invokes.p("jv = (int)v;");
    cpp.tag_invokes.pd("}");
    cpp.tag_invokes.p("");
    cpp.tag_invokes.pi(format!(
        "{} tag_invoke(const boost::json::value_to_tag<{}>&, const boost::json::value& jv) {{",
        q_name, q_name
    ));
    cpp.tag_invokes
        .p(format!("return ({})boost::json::value_to<int>(jv);", q_name));
    cpp.tag_invokes.pd("}");
    cpp.tag_invokes.p("");
}

fn gen_message(
    message: &Message,
    package: Option<&str>,
    parents: &[String],
    resolver: &NameResolver,
    cpp: &mut CppFile,
) -> Result<(), JsonifError> {
    cpp.typedefs.pi(format!("struct {} {{", message.name));

    let mut child_parents = parents.to_vec();
    child_parents.push(message.name.clone());

    for enum_def in &message.enums {
        gen_enum(enum_def, package, &child_parents, cpp);
    }
    for nested in &message.nested {
        gen_message(nested, package, &child_parents, resolver, cpp)?;
    }

    // Discriminant enums for genuine oneofs; synthetic presence oneofs
    // surface nothing.
    for (index, oneof) in message.real_oneofs() {
        let case_type = case_type_name(&oneof.name);
        cpp.typedefs.pi(format!("enum class {} {{", case_type));
        cpp.typedefs.p("NOT_SET = 0,");
        for member in message.oneof_members(index) {
            cpp.typedefs.p(format!(
                "{} = {},",
                case_member_label(&member.name),
                member.number
            ));
        }
        cpp.typedefs.pd("};");
        gen_case_tag_invokes(
            &cpp_qualified(package, &child_parents, &case_type),
            cpp,
        );
    }

    for field in &message.fields {
        let ty = type_name(field, resolver)?;
        cpp.typedefs
            .p(format!("{} {} = {}();", ty, to_snake_case(&field.name), ty));
    }
    for (_, oneof) in message.real_oneofs() {
        let case_type = case_type_name(&oneof.name);
        cpp.typedefs.p(format!(
            "{} {}_case = {}::NOT_SET;",
            case_type,
            to_snake_case(&oneof.name),
            case_type
        ));
    }
    cpp.typedefs.p("");

    gen_mutators(message, resolver, &mut cpp.typedefs)?;
    gen_equality(message, &mut cpp.typedefs);

    cpp.typedefs.pd("};");
    cpp.typedefs.p("");

    gen_tag_invokes(message, package, parents, resolver, cpp)?;
    Ok(())
}

fn gen_mutators(
    message: &Message,
    resolver: &NameResolver,
    f: &mut Emitter,
) -> Result<(), JsonifError> {
    for field in &message.fields {
        if field.repeated {
            continue;
        }
        let ty = type_name(field, resolver)?;
        let field_name = to_snake_case(&field.name);
        let arg = if pass_by_ref(field) {
            format!("const {}& value", ty)
        } else {
            format!("{} value", ty)
        };
        let real_oneof = field
            .oneof
            .filter(|&i| !message.oneofs[i].synthetic)
            .map(|i| &message.oneofs[i]);

        f.pi(format!("void set_{}({}) {{", field_name, arg));
        if let Some(oneof) = real_oneof {
            // Release whatever member was active before switching the
            // discriminant.
            f.p(format!("clear_{}();", to_snake_case(&oneof.name)));
            f.p(format!(
                "{}_case = {}::{};",
                to_snake_case(&oneof.name),
                case_type_name(&oneof.name),
                case_member_label(&field.name)
            ));
        }
        f.p(format!("this->{} = value;", field_name));
        f.pd("}");

        if let Some(oneof) = real_oneof {
            let oneof_name = to_snake_case(&oneof.name);
            let case_type = case_type_name(&oneof.name);
            let label = case_member_label(&field.name);
            f.pi(format!("bool has_{}() const {{", field_name));
            f.p(format!("return {}_case == {}::{};", oneof_name, case_type, label));
            f.pd("}");
            f.pi(format!("void clear_{}() {{", field_name));
            f.pi(format!(
                "if ({}_case == {}::{}) {{",
                oneof_name, case_type, label
            ));
            f.p(format!("clear_{}();", oneof_name));
            f.pd("}");
            f.pd("}");
        }
    }

    for (index, oneof) in message.real_oneofs() {
        let oneof_name = to_snake_case(&oneof.name);
        let case_type = case_type_name(&oneof.name);
        f.pi(format!("void clear_{}() {{", oneof_name));
        f.p(format!("{}_case = {}::NOT_SET;", oneof_name, case_type));
        for member in message.oneof_members(index) {
            let ty = type_name(member, resolver)?;
            f.p(format!("{} = {}();", to_snake_case(&member.name), ty));
        }
        f.pd("}");
    }
    f.p("");
    Ok(())
}

fn gen_equality(message: &Message, f: &mut Emitter) {
    let name = &message.name;
    f.pi(format!(
        "friend bool operator==(const {}& a, const {}& b) {{",
        name, name
    ));
    for field in &message.fields {
        let in_real_oneof = field
            .oneof
            .map(|i| !message.oneofs[i].synthetic)
            .unwrap_or(false);
        if in_real_oneof {
            continue;
        }
        let field_name = to_snake_case(&field.name);
        f.p(format!(
            "if (!(a.{} == b.{})) return false;",
            field_name, field_name
        ));
    }
    for (index, oneof) in message.real_oneofs() {
        let oneof_name = to_snake_case(&oneof.name);
        let case_type = case_type_name(&oneof.name);
        f.p(format!(
            "if (!(a.{}_case == b.{}_case)) return false;",
            oneof_name, oneof_name
        ));
        for member in message.oneof_members(index) {
            let field_name = to_snake_case(&member.name);
            f.p(format!(
                "if (a.{}_case == {}::{} && !(a.{} == b.{})) return false;",
                oneof_name,
                case_type,
                case_member_label(&member.name),
                field_name,
                field_name
            ));
        }
    }
    f.p("return true;");
    f.pd("}");
    f.pi(format!(
        "friend bool operator!=(const {}& a, const {}& b) {{",
        name, name
    ));
    f.p("return !(a == b);");
    f.pd("}");
}

fn gen_tag_invokes(
    message: &Message,
    package: Option<&str>,
    parents: &[String],
    resolver: &NameResolver,
    cpp: &mut CppFile,
) -> Result<(), JsonifError> {
    let q_name = cpp_qualified(package, parents, &message.name);
    let mut child_parents = parents.to_vec();
    child_parents.push(message.name.clone());

    cpp.tag_invokes.p(format!("// {}", q_name));
    if message.options.no_serializer {
        cpp.tag_invokes.p("#if 0");
    }
    cpp.tag_invokes.pi(format!(
        "void tag_invoke(const boost::json::value_from_tag&, boost::json::value& jv, const {}& v) {{",
        q_name
    ));
    cpp.tag_invokes.p("boost::json::object obj;");
    for field in &message.fields {
        let field_name = to_snake_case(&field.name);
        let key = field.json_key(&field_name);
        if field.options.discard_if_default {
            cpp.tag_invokes.pi(format!(
                "if (v.{} != decltype(v.{})()) {{",
                field_name, field_name
            ));
        }
        cpp.tag_invokes.p(format!(
            "obj[\"{}\"] = boost::json::value_from(v.{});",
            key, field_name
        ));
        if field.options.discard_if_default {
            cpp.tag_invokes.pd("}");
        }
    }
    for (_, oneof) in message.real_oneofs() {
        let oneof_name = to_snake_case(&oneof.name);
        cpp.tag_invokes.p(format!(
            "obj[\"{}_case\"] = boost::json::value_from(v.{}_case);",
            oneof_name, oneof_name
        ));
    }
    cpp.tag_invokes.p("jv = std::move(obj);");
    cpp.tag_invokes.pd("}");
    if message.options.no_serializer {
        cpp.tag_invokes.p("#endif");
    }
    cpp.tag_invokes.p("");

    if message.options.no_deserializer {
        cpp.tag_invokes.p("#if 0");
    }
    cpp.tag_invokes.pi(format!(
        "{} tag_invoke(const boost::json::value_to_tag<{}>&, const boost::json::value& jv) {{",
        q_name, q_name
    ));
    cpp.tag_invokes.p(format!("{} v;", q_name));
    for field in &message.fields {
        let ty = type_name(field, resolver)?;
        let field_name = to_snake_case(&field.name);
        let key = field.json_key(&field_name);
        // A key may be absent when decode is tolerant for this field:
        // optimistic, discard-if-default output, oneof member, or
        // explicit presence.
        let tolerant = field.oneof.is_some()
            || field.optional
            || field.options.optimistic
            || field.options.discard_if_default;
        if tolerant {
            cpp.tag_invokes.pi(format!(
                "if (jv.as_object().find(\"{}\") != jv.as_object().end()) {{",
                key
            ));
        }
        cpp.tag_invokes.p(format!(
            "v.{} = boost::json::value_to<{}>(jv.at(\"{}\"));",
            field_name, ty, key
        ));
        if tolerant {
            cpp.tag_invokes.pd("}");
        }
    }
    for (_, oneof) in message.real_oneofs() {
        let oneof_name = to_snake_case(&oneof.name);
        let case_q = cpp_qualified(package, &child_parents, &case_type_name(&oneof.name));
        if message.options.optimistic {
            cpp.tag_invokes.pi(format!(
                "if (jv.as_object().find(\"{}_case\") != jv.as_object().end()) {{",
                oneof_name
            ));
        }
        cpp.tag_invokes.p(format!(
            "v.{}_case = boost::json::value_to<{}>(jv.at(\"{}_case\"));",
            oneof_name, case_q, oneof_name
        ));
        if message.options.optimistic {
            cpp.tag_invokes.pd("}");
        }
    }
    cpp.tag_invokes.p("return v;");
    cpp.tag_invokes.pd("}");
    if message.options.no_deserializer {
        cpp.tag_invokes.p("#endif");
    }
    cpp.tag_invokes.p("");
    Ok(())
}
