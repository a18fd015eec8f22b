//! TypeScript backend. Emits one `<base>.ts` per input file plus a shared
//! `jsonif.ts` runtime. Messages become classes over structural
//! `<Type>Object` shapes; `fromObject` validates required keys, the
//! constructor is tolerant so `new T()` stays the zero value.

use jsonif_schema::casing::{to_snake_case, to_upper_camel};
use jsonif_schema::{EnumDef, Field, FieldKind, Message, SchemaFile, SchemaModel};

use crate::emitter::Emitter;
use crate::error::JsonifError;
use crate::resolve::{case_member_label, package_alias, NameResolver};
use crate::typemap;

use super::{base_name, Backend, OutputFile};

pub struct TypeScriptBackend;

struct TsFile {
    top:  Emitter,
    body: Emitter,
}

impl TsFile {
    fn new() -> Self {
        TsFile {
            top:  Emitter::with_indent_unit(4),
            body: Emitter::with_indent_unit(4),
        }
    }

    fn into_string(self) -> String {
        self.top.into_string() + self.body.as_str()
    }
}

impl Backend for TypeScriptBackend {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn generate_file(
        &self,
        file: &SchemaFile,
        model: &SchemaModel,
        resolver: &NameResolver,
    ) -> Result<Vec<OutputFile>, JsonifError> {
        let mut ts = TsFile::new();

        for dep in &file.dependencies {
            let Some(dep_file) = model.files.iter().find(|f| &f.name == dep) else {
                continue;
            };
            let Some(pkg) = &dep_file.package else {
                continue;
            };
            ts.top.p(format!(
                "import * as {} from \"./{}\";",
                package_alias(pkg),
                base_name(dep)
            ));
        }
        ts.top.p("");

        let package = file.package.as_deref();
        for enum_def in &file.enums {
            gen_enum(enum_def, &[], &mut ts);
        }
        for message in &file.messages {
            gen_message(message, package, resolver, &[], &mut ts)?;
        }

        Ok(vec![OutputFile {
            name: format!("{}.ts", base_name(&file.name)),
            content: ts.into_string(),
        }])
    }

    fn shared_files(&self) -> Vec<OutputFile> {
        let mut f = Emitter::with_indent_unit(4);
        f.pi("export interface Jsonif<T> {");
        f.p("getType: () => { fromJson(json: string): T };");
        f.p("toJson: () => string;");
        f.pd("}");
        f.p("");
        f.pi("export function getType<T extends number | string | boolean | Jsonif<T>>(v: T): any {");
        f.pi("if ((v as any).getType !== undefined) {");
        f.p("return (v as any).getType();");
        f.pdi("} else {");
        f.p("return v.constructor as any;");
        f.pd("}");
        f.pd("}");
        f.p("");
        f.pi("export function fromJson<T>(v: string, type: any): T {");
        f.pi("if (type.fromJson !== undefined) {");
        f.p("return type.fromJson(v) as T;");
        f.pdi("} else {");
        f.p("return JSON.parse(v) as T;");
        f.pd("}");
        f.pd("}");
        f.p("");
        f.pi("export function toJson<T extends number | string | boolean | Jsonif<T>>(v: T): string {");
        f.pi("if (typeof v === 'number' || typeof v === 'string' || typeof v === 'boolean') {");
        f.p("return JSON.stringify(v);");
        f.pdi("} else {");
        f.p("return v.toJson();");
        f.pd("}");
        f.pd("}");

        vec![OutputFile {
            name: "jsonif.ts".to_string(),
            content: f.into_string(),
        }]
    }
}

/// `[Outer, Inner]` + `Baz` → `Outer_Inner_Baz`.
fn local_class_name(parents: &[String], name: &str) -> String {
    let mut parts = parents.to_vec();
    parts.push(name.to_string());
    parts.join("_")
}

/// `(type, default, is_optional)` for a field; `for_object` appends the
/// `Object` suffix to message references.
fn type_name(
    field: &Field,
    package: Option<&str>,
    resolver: &NameResolver,
    for_object: bool,
) -> Result<(String, String, bool), JsonifError> {
    let (mut ty, mut default) = match &field.kind {
        FieldKind::Enum(path) => (resolver.typescript_name(package, path)?, "0".to_string()),
        FieldKind::Message(path) => {
            let name = resolver.typescript_name(package, path)?;
            let default = format!("new {}()", name);
            let name = if for_object {
                format!("{}Object", name)
            } else {
                name
            };
            (name, default)
        }
        FieldKind::Bool => (
            typemap::TYPESCRIPT.scalar_storage(&field.kind)?.to_string(),
            "false".to_string(),
        ),
        FieldKind::String => (
            typemap::TYPESCRIPT.scalar_storage(&field.kind)?.to_string(),
            "\"\"".to_string(),
        ),
        FieldKind::Bytes => (
            typemap::TYPESCRIPT.scalar_storage(&field.kind)?.to_string(),
            "new Uint8Array(0)".to_string(),
        ),
        kind => (
            typemap::TYPESCRIPT.scalar_storage(kind)?.to_string(),
            "0".to_string(),
        ),
    };
    if field.repeated {
        ty = format!("{}[]", ty);
        default = "[]".to_string();
    }
    if field.optional {
        default = "null".to_string();
    }
    Ok((ty, default, field.optional))
}

/// The expression that reads this field out of a plain object, and the
/// property line spelling. Custom JSON keys need the quoted-index form.
fn object_accessor(field: &Field) -> (String, String) {
    let key = field.json_key(&field.name).to_string();
    if key == field.name {
        (format!("obj.{}", key), key)
    } else {
        (format!("obj[\"{}\"]", key), format!("\"{}\"", key))
    }
}

fn gen_enum(enum_def: &EnumDef, parents: &[String], ts: &mut TsFile) {
    ts.body.pi(format!(
        "export enum {} {{",
        local_class_name(parents, &enum_def.name)
    ));
    for value in &enum_def.values {
        ts.body.p(format!("{} = {},", value.name, value.number));
    }
    ts.body.pd("}");
    ts.body.p("");
}

fn gen_oneof_enum(oneof_name: &str, members: &[&Field], parents: &[String], ts: &mut TsFile) {
    let type_name = format!(
        "{}Case",
        local_class_name(parents, &to_upper_camel(oneof_name))
    );
    ts.body.pi(format!("export enum {} {{", type_name));
    ts.body.p("NOT_SET = 0,");
    for member in members {
        ts.body.p(format!(
            "{} = {},",
            case_member_label(&member.name),
            member.number
        ));
    }
    ts.body.pd("}");
    ts.body.p("");
}

fn gen_oneof(
    message: &Message,
    index: usize,
    package: Option<&str>,
    resolver: &NameResolver,
    parents: &[String],
    ts: &mut TsFile,
) -> Result<(), JsonifError> {
    let oneof = &message.oneofs[index];
    let members = message.oneof_members(index);
    let type_name = format!(
        "{}Case",
        local_class_name(parents, &to_upper_camel(&oneof.name))
    );
    let field_name = format!("{}_case", to_snake_case(&oneof.name));

    ts.body.p(format!(
        "{}: {} = {}.NOT_SET;",
        field_name, type_name, type_name
    ));
    ts.body
        .pi(format!("clear{}() {{", to_upper_camel(&oneof.name)));
    ts.body
        .p(format!("this.{} = {}.NOT_SET;", field_name, type_name));
    for member in &members {
        let (_, default, _) = type_name_of(member, package, resolver)?;
        ts.body.p(format!("this.{} = {};", member.name, default));
    }
    ts.body.pd("}");

    for member in &members {
        let (member_ty, _, _) = type_name_of(member, package, resolver)?;
        ts.body.pi(format!(
            "set{}(value: {}) {{",
            to_upper_camel(&member.name),
            member_ty
        ));
        ts.body.p(format!(
            "this.{} = {}.{};",
            field_name,
            type_name,
            case_member_label(&member.name)
        ));
        ts.body.p(format!("this.{} = value;", member.name));
        ts.body.pd("}");
        ts.body
            .pi(format!("clear{}() {{", to_upper_camel(&member.name)));
        ts.body.pi(format!(
            "if (this.{} === {}.{}) {{",
            field_name,
            type_name,
            case_member_label(&member.name)
        ));
        ts.body.p(format!("this.clear{}();", to_upper_camel(&oneof.name)));
        ts.body.pd("}");
        ts.body.pd("}");
    }
    Ok(())
}

fn type_name_of(
    field: &Field,
    package: Option<&str>,
    resolver: &NameResolver,
) -> Result<(String, String, bool), JsonifError> {
    type_name(field, package, resolver, false)
}

fn gen_message(
    message: &Message,
    package: Option<&str>,
    resolver: &NameResolver,
    parents: &[String],
    ts: &mut TsFile,
) -> Result<(), JsonifError> {
    let mut child_parents = parents.to_vec();
    child_parents.push(message.name.clone());

    for nested in &message.nested {
        gen_message(nested, package, resolver, &child_parents, ts)?;
    }
    for (index, oneof) in message.real_oneofs() {
        gen_oneof_enum(
            &oneof.name,
            &message.oneof_members(index),
            &child_parents,
            ts,
        );
    }

    let local = local_class_name(parents, &message.name);

    // structural object shape
    ts.body.pi(format!("export type {}Object = {{", local));
    for field in &message.fields {
        let (ty, _, optional) = type_name(field, package, resolver, true)?;
        let (_, prop) = object_accessor(field);
        if optional {
            ts.body.p(format!("{}?: {} | null;", prop, ty));
        } else {
            ts.body.p(format!("{}?: {};", prop, ty));
        }
    }
    for (_, oneof) in message.real_oneofs() {
        let case_ty = format!(
            "{}Case",
            local_class_name(&child_parents, &to_upper_camel(&oneof.name))
        );
        ts.body.p(format!(
            "{}_case?: {};",
            to_snake_case(&oneof.name),
            case_ty
        ));
    }
    ts.body.pd("}");
    ts.body.p("");

    for enum_def in &message.enums {
        gen_enum(enum_def, &child_parents, ts);
    }

    ts.body.pi(format!("export class {} {{", local));
    for field in &message.fields {
        let (ty, default, optional) = type_name_of(field, package, resolver)?;
        if optional {
            ts.body
                .p(format!("{}: {} | null = {};", field.name, ty, default));
        } else {
            ts.body.p(format!("{}: {} = {};", field.name, ty, default));
        }
    }
    for (index, _) in message.real_oneofs() {
        gen_oneof(message, index, package, resolver, &child_parents, ts)?;
    }

    gen_constructor(message, package, resolver, &local, ts)?;

    // getType
    ts.body.pi(format!("getType(): typeof {} {{", local));
    ts.body.p(format!("return {};", local));
    ts.body.pd("}");

    if !message.options.no_deserializer {
        // fromJson
        ts.body
            .pi(format!("static fromJson(json: string): {} {{", local));
        ts.body
            .p(format!("return {}.fromObject(JSON.parse(json));", local));
        ts.body.pd("}");
    }

    if !message.options.no_serializer {
        // toJson
        ts.body.pi("toJson(): string {");
        ts.body.p("return JSON.stringify(this.toObject());");
        ts.body.pd("}");
    }

    if !message.options.no_deserializer {
        gen_from_object(message, &local, ts);
    }

    if !message.options.no_serializer {
        gen_to_object(message, package, resolver, &local, ts)?;
    }

    ts.body.pd("}");
    ts.body.p("");

    Ok(())
}

fn gen_constructor(
    message: &Message,
    package: Option<&str>,
    resolver: &NameResolver,
    local: &str,
    ts: &mut TsFile,
) -> Result<(), JsonifError> {
    ts.body
        .pi(format!("constructor(obj: {}Object = {{}}) {{", local));
    for field in &message.fields {
        let (accessor, _) = object_accessor(field);
        ts.body.pi(format!("if ({} !== undefined) {{", accessor));

        let (ty, _, optional) = type_name_of(field, package, resolver)?;
        if optional {
            ts.body.pi(format!("if ({} !== null) {{", accessor));
        }
        let is_message = field.kind.is_message();
        if field.repeated && is_message {
            // repeated means the spelled type always ends in []
            let element = ty.trim_end_matches("[]");
            ts.body.p(format!(
                "this.{} = {}.map((x) => {}.fromObject(x));",
                field.name, accessor, element
            ));
        } else if !field.repeated && is_message {
            ts.body.p(format!(
                "this.{} = {}.fromObject({});",
                field.name, ty, accessor
            ));
        } else {
            ts.body.p(format!("this.{} = {};", field.name, accessor));
        }
        if optional {
            ts.body.pd("}");
        }
        ts.body.pd("}");
    }
    for (_, oneof) in message.real_oneofs() {
        let field_name = format!("{}_case", to_snake_case(&oneof.name));
        ts.body
            .pi(format!("if (obj.{} !== undefined) {{", field_name));
        ts.body
            .p(format!("this.{} = obj.{};", field_name, field_name));
        ts.body.pd("}");
    }
    ts.body.pd("}");
    Ok(())
}

fn gen_from_object(message: &Message, local: &str, ts: &mut TsFile) {
    ts.body.pi(format!(
        "static fromObject(obj: {}Object): {} {{",
        local, local
    ));
    for field in &message.fields {
        // A missing key is only tolerated for optimistic or
        // discard-if-default fields, oneof members and optional fields;
        // everything else is a decode failure.
        let tolerant = field.oneof.is_some()
            || field.optional
            || field.options.optimistic
            || field.options.discard_if_default;
        if tolerant {
            continue;
        }
        let (accessor, _) = object_accessor(field);
        ts.body.pi(format!("if ({} === undefined) {{", accessor));
        ts.body.p(format!(
            "throw new Error(\"missing field: {}\");",
            field.json_key(&field.name)
        ));
        ts.body.pd("}");
    }
    ts.body.p(format!("return new {}(obj);", local));
    ts.body.pd("}");
}

fn gen_to_object(
    message: &Message,
    package: Option<&str>,
    resolver: &NameResolver,
    local: &str,
    ts: &mut TsFile,
) -> Result<(), JsonifError> {
    ts.body.pi(format!("toObject(): {}Object {{", local));
    ts.body.p(format!("const obj: {}Object = {{}};", local));
    for field in &message.fields {
        let (_, prop) = object_accessor(field);
        let assign_target = if prop.starts_with('"') {
            format!("obj[{}]", prop)
        } else {
            format!("obj.{}", prop)
        };
        let is_message = field.kind.is_message();
        let value = if field.optional {
            if field.repeated && is_message {
                format!(
                    "this.{} === null ? null : this.{}.map((x) => x.toObject())",
                    field.name, field.name
                )
            } else if !field.repeated && is_message {
                format!(
                    "this.{} === null ? null : this.{}.toObject()",
                    field.name, field.name
                )
            } else {
                format!("this.{}", field.name)
            }
        } else if field.repeated && is_message {
            format!("this.{}.map((x) => x.toObject())", field.name)
        } else if !field.repeated && is_message {
            format!("this.{}.toObject()", field.name)
        } else {
            format!("this.{}", field.name)
        };

        if field.options.discard_if_default {
            ts.body
                .pi(format!("if ({}) {{", non_default_check(field, package, resolver)?));
            ts.body.p(format!("{} = {};", assign_target, value));
            ts.body.pd("}");
        } else {
            ts.body.p(format!("{} = {};", assign_target, value));
        }
    }
    for (_, oneof) in message.real_oneofs() {
        let field_name = format!("{}_case", to_snake_case(&oneof.name));
        ts.body
            .p(format!("obj.{} = this.{};", field_name, field_name));
    }
    ts.body.p("return obj;");
    ts.body.pd("}");
    Ok(())
}

/// Zero-value test used by discard-if-default encoding.
fn non_default_check(
    field: &Field,
    package: Option<&str>,
    resolver: &NameResolver,
) -> Result<String, JsonifError> {
    if field.optional {
        return Ok(format!("this.{} !== null", field.name));
    }
    if field.repeated {
        return Ok(format!("this.{}.length !== 0", field.name));
    }
    Ok(match &field.kind {
        FieldKind::Bool => format!("this.{} !== false", field.name),
        FieldKind::String => format!("this.{} !== \"\"", field.name),
        FieldKind::Bytes => format!("this.{}.length !== 0", field.name),
        FieldKind::Message(path) => {
            let name = resolver.typescript_name(package, path)?;
            format!(
                "JSON.stringify(this.{}.toObject()) !== JSON.stringify(new {}().toObject())",
                field.name, name
            )
        }
        _ => format!("this.{} !== 0", field.name),
    })
}
