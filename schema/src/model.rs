use serde::Serialize;

/// A field's storage kind after ingestion. All signed/unsigned/fixed wire
/// variants of an integer width collapse into the one natural-width kind;
/// the distinction only matters for binary encoding, which this pipeline
/// never performs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Bool,
    String,
    Bytes,
    /// Referenced enum, as a fully qualified dotted path without the
    /// leading dot (`pkg.Outer.Kind`).
    Enum(String),
    /// Referenced message, same path convention as `Enum`.
    Message(String),
}

impl FieldKind {
    /// The referenced type path for enum/message kinds.
    pub fn type_path(&self) -> Option<&str> {
        match self {
            FieldKind::Enum(path) | FieldKind::Message(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, FieldKind::Message(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, FieldKind::Enum(_))
    }
}

/// Message-level jsonif options, read once from the reserved option slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageOptions {
    pub optimistic:         bool,
    pub discard_if_default: bool,
    pub no_serializer:      bool,
    pub no_deserializer:    bool,
}

/// Field-level jsonif options. The booleans are already resolved against
/// the owning message's defaults, so backends never consult both bags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldOptions {
    pub optimistic:         bool,
    pub discard_if_default: bool,
    pub json_key:           Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:     String,
    pub number:   i32,
    pub kind:     FieldKind,
    pub repeated: bool,
    /// proto3 explicit presence (`optional` keyword).
    pub optional: bool,
    /// Index into the owning message's `oneofs`, if any.
    pub oneof:    Option<usize>,
    pub options:  FieldOptions,
}

impl Field {
    /// The key this field uses in JSON output: the custom option if set,
    /// otherwise the given identifier-derived default.
    pub fn json_key<'a>(&'a self, default: &'a str) -> &'a str {
        self.options.json_key.as_deref().unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Oneof {
    pub name:      String,
    /// True for the single-member oneof protoc synthesizes around a
    /// proto3-optional field. Synthetic oneofs track presence only and
    /// never surface a Case enum.
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name:   String,
    pub number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDef {
    pub name:   String,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub name:    String,
    pub fields:  Vec<Field>,
    pub oneofs:  Vec<Oneof>,
    pub nested:  Vec<Message>,
    pub enums:   Vec<EnumDef>,
    pub options: MessageOptions,
}

impl Message {
    /// Member fields of the oneof at `index`, in declaration order.
    pub fn oneof_members(&self, index: usize) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.oneof == Some(index))
            .collect()
    }

    /// Oneofs that surface a discriminant, with their indices. Synthetic
    /// presence oneofs are skipped.
    pub fn real_oneofs(&self) -> impl Iterator<Item = (usize, &Oneof)> {
        self.oneofs
            .iter()
            .enumerate()
            .filter(|(_, oneof)| !oneof.synthetic)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaFile {
    pub name:              String,
    pub package:           Option<String>,
    pub dependencies:      Vec<String>,
    /// Indices into `dependencies` marking weak import edges.
    pub weak_dependencies: Vec<usize>,
    pub syntax:            String,
    pub messages:          Vec<Message>,
    pub enums:             Vec<EnumDef>,
}

impl SchemaFile {
    pub fn is_weak_dependency(&self, index: usize) -> bool {
        self.weak_dependencies.contains(&index)
    }

    pub fn has_definitions(&self) -> bool {
        !self.messages.is_empty() || !self.enums.is_empty()
    }
}

/// The pruned, immutable schema for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaModel {
    pub files: Vec<SchemaFile>,
}

impl SchemaModel {
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }
}
