//! jsonif-schema
//!
//! The normalized in-memory representation of a proto3 schema after
//! ingestion: files, messages, enums, oneofs, fields and their resolved
//! option bags. Built once per generation run and read-only afterwards.

pub mod casing;
pub mod model;

pub use model::{
    EnumDef, EnumValue, Field, FieldKind, FieldOptions, Message, MessageOptions, Oneof,
    SchemaFile, SchemaModel,
};
