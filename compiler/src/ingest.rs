//! Converts raw file descriptors into the normalized [`SchemaModel`].
//!
//! Ingestion order: proto3 syntax validation over every file in the
//! request, then dependency-closure pruning, then per-file normalization
//! (field-kind collapsing, option resolution, synthetic-oneof marking).

use std::collections::HashMap;

use jsonif_schema::{
    EnumDef, EnumValue, Field, FieldKind, FieldOptions, Message, MessageOptions, Oneof,
    SchemaFile, SchemaModel,
};

use crate::error::JsonifError;
use crate::proto;
use crate::proto::field_descriptor_proto::{Label, Type};

/// Ingests a code generator request: validate, prune, normalize.
pub fn ingest_request(req: &proto::CodeGeneratorRequest) -> Result<SchemaModel, JsonifError> {
    ingest_files(&req.proto_file)
}

/// Ingests an ordered list of raw file descriptors.
pub fn ingest_files(files: &[proto::FileDescriptorProto]) -> Result<SchemaModel, JsonifError> {
    for file in files {
        check_syntax(file)?;
    }
    let converted = files
        .iter()
        .map(convert_file)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SchemaModel {
        files: prune_files(converted),
    })
}

fn check_syntax(file: &proto::FileDescriptorProto) -> Result<(), JsonifError> {
    let syntax = file.syntax.as_deref().unwrap_or("");
    if syntax != "proto3" {
        return Err(JsonifError::UnsupportedSyntax {
            file: file.name.clone().unwrap_or_default(),
            syntax: if syntax.is_empty() {
                "(unspecified)".to_string()
            } else {
                syntax.to_string()
            },
        });
    }
    Ok(())
}

#[derive(Default)]
struct Dep {
    /// Number of non-weak references from other files, counted through
    /// transitive dependency chains.
    refs:       usize,
    /// Whether any file names this one as a dependency, weak or not.
    referenced: bool,
    removed:    bool,
}

/// Dependency-closure pruning. A file that was referenced but whose
/// non-weak reference count drains to zero is removed, releasing its own
/// non-weak dependencies in turn, to a fixpoint. Files declaring no
/// messages and no enums are dropped regardless. Survivors keep their
/// original relative order.
pub fn prune_files(files: Vec<SchemaFile>) -> Vec<SchemaFile> {
    let mut deps: HashMap<String, Dep> = files
        .iter()
        .map(|f| (f.name.clone(), Dep::default()))
        .collect();

    for file in &files {
        mark_references(&mut deps, &files, file);
    }

    loop {
        let mut changed = false;
        for file in &files {
            let removable = deps
                .get(&file.name)
                .map(|d| !d.removed && d.refs == 0 && d.referenced)
                .unwrap_or(false);
            if !removable {
                continue;
            }
            changed = true;
            if let Some(dep) = deps.get_mut(&file.name) {
                dep.removed = true;
            }
            for (i, name) in file.dependencies.iter().enumerate() {
                if file.is_weak_dependency(i) {
                    continue;
                }
                if let Some(dep) = deps.get_mut(name) {
                    dep.refs = dep.refs.saturating_sub(1);
                }
            }
        }
        if !changed {
            break;
        }
    }

    files
        .into_iter()
        .filter(|file| {
            if deps.get(&file.name).map(|d| d.removed).unwrap_or(false) {
                tracing::debug!(file = %file.name, "pruned: weak dependency or not needed");
                return false;
            }
            if !file.has_definitions() {
                tracing::debug!(file = %file.name, "pruned: no message or enum definitions");
                return false;
            }
            true
        })
        .collect()
}

/// Walks one file's dependency chains, marking references and counting
/// non-weak edges. Weak edges mark the target as referenced but do not
/// keep it alive and stop the walk.
fn mark_references(deps: &mut HashMap<String, Dep>, files: &[SchemaFile], file: &SchemaFile) {
    for (i, name) in file.dependencies.iter().enumerate() {
        let Some(dep) = deps.get_mut(name) else {
            continue;
        };
        dep.referenced = true;
        if file.is_weak_dependency(i) {
            continue;
        }
        dep.refs += 1;
        if let Some(found) = files.iter().find(|f| &f.name == name) {
            mark_references(deps, files, found);
        }
    }
}

fn convert_file(file: &proto::FileDescriptorProto) -> Result<SchemaFile, JsonifError> {
    Ok(SchemaFile {
        name: file.name.clone().unwrap_or_default(),
        package: file.package.clone().filter(|p| !p.is_empty()),
        dependencies: file.dependency.clone(),
        weak_dependencies: file.weak_dependency.iter().map(|&i| i as usize).collect(),
        syntax: file.syntax.clone().unwrap_or_default(),
        messages: file
            .message_type
            .iter()
            .map(convert_message)
            .collect::<Result<_, _>>()?,
        enums: file.enum_type.iter().map(convert_enum).collect(),
    })
}

fn convert_message(desc: &proto::DescriptorProto) -> Result<Message, JsonifError> {
    let options = resolve_message_options(desc.options.as_ref());
    let fields = desc
        .field
        .iter()
        .map(|f| convert_field(f, &options))
        .collect::<Result<Vec<_>, _>>()?;

    for field in &fields {
        if let Some(index) = field.oneof {
            if index >= desc.oneof_decl.len() {
                return Err(JsonifError::Input(format!(
                    "field {} has oneof index {} out of range",
                    field.name, index
                )));
            }
        }
    }

    let oneofs = desc
        .oneof_decl
        .iter()
        .enumerate()
        .map(|(i, decl)| {
            let members: Vec<&Field> = fields.iter().filter(|f| f.oneof == Some(i)).collect();
            Oneof {
                name: decl.name.clone().unwrap_or_default(),
                synthetic: members.len() == 1 && members[0].optional,
            }
        })
        .collect();

    Ok(Message {
        name: desc.name.clone().unwrap_or_default(),
        fields,
        oneofs,
        nested: desc
            .nested_type
            .iter()
            .map(convert_message)
            .collect::<Result<_, _>>()?,
        enums: desc.enum_type.iter().map(convert_enum).collect(),
        options,
    })
}

fn convert_field(
    field: &proto::FieldDescriptorProto,
    message_options: &MessageOptions,
) -> Result<Field, JsonifError> {
    Ok(Field {
        name: field.name.clone().unwrap_or_default(),
        number: field.number.unwrap_or(0),
        kind: convert_kind(field)?,
        repeated: field.label() == Label::Repeated,
        optional: field.proto3_optional.unwrap_or(false),
        oneof: field.oneof_index.map(|i| i as usize),
        options: resolve_field_options(field.options.as_ref(), message_options),
    })
}

/// Collapses the wire-level type zoo into natural-width storage kinds.
fn convert_kind(field: &proto::FieldDescriptorProto) -> Result<FieldKind, JsonifError> {
    let raw = field.r#type.ok_or_else(|| {
        JsonifError::Input(format!(
            "field {} has no type",
            field.name.as_deref().unwrap_or("(unnamed)")
        ))
    })?;
    let ty = Type::try_from(raw)
        .map_err(|_| JsonifError::Input(format!("invalid field type {raw}")))?;
    Ok(match ty {
        Type::Double => FieldKind::Double,
        Type::Float => FieldKind::Float,
        Type::Int32 | Type::Sint32 | Type::Sfixed32 => FieldKind::Int32,
        Type::Int64 | Type::Sint64 | Type::Sfixed64 => FieldKind::Int64,
        Type::Uint32 | Type::Fixed32 => FieldKind::Uint32,
        Type::Uint64 | Type::Fixed64 => FieldKind::Uint64,
        Type::Bool => FieldKind::Bool,
        Type::String => FieldKind::String,
        Type::Bytes => FieldKind::Bytes,
        Type::Enum => FieldKind::Enum(referenced_type(field)?),
        Type::Message | Type::Group => FieldKind::Message(referenced_type(field)?),
    })
}

fn referenced_type(field: &proto::FieldDescriptorProto) -> Result<String, JsonifError> {
    let name = field.type_name.as_deref().ok_or_else(|| {
        JsonifError::Input(format!(
            "field {} references a type but has no type name",
            field.name.as_deref().unwrap_or("(unnamed)")
        ))
    })?;
    Ok(name.strip_prefix('.').unwrap_or(name).to_string())
}

fn convert_enum(desc: &proto::EnumDescriptorProto) -> EnumDef {
    EnumDef {
        name: desc.name.clone().unwrap_or_default(),
        values: desc
            .value
            .iter()
            .map(|v| EnumValue {
                name: v.name.clone().unwrap_or_default(),
                number: v.number.unwrap_or(0),
            })
            .collect(),
    }
}

fn resolve_message_options(options: Option<&proto::MessageOptions>) -> MessageOptions {
    match options {
        Some(o) => MessageOptions {
            optimistic: o.jsonif_message_optimistic.unwrap_or(false),
            discard_if_default: o.jsonif_message_discard_if_default.unwrap_or(false),
            no_serializer: o.jsonif_no_serializer.unwrap_or(false),
            no_deserializer: o.jsonif_no_deserializer.unwrap_or(false),
        },
        None => MessageOptions::default(),
    }
}

/// Field-level flags fall back to the message-level defaults; an explicit
/// field-level value wins either way.
fn resolve_field_options(
    options: Option<&proto::FieldOptions>,
    message_options: &MessageOptions,
) -> FieldOptions {
    match options {
        Some(o) => FieldOptions {
            optimistic: o.jsonif_optimistic.unwrap_or(message_options.optimistic),
            discard_if_default: o
                .jsonif_discard_if_default
                .unwrap_or(message_options.discard_if_default),
            json_key: o.jsonif_name.clone(),
        },
        None => FieldOptions {
            optimistic: message_options.optimistic,
            discard_if_default: message_options.discard_if_default,
            json_key: None,
        },
    }
}
