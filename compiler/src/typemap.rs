//! Per-backend scalar storage tables. Enum and message references are
//! resolved through the name table instead; repeated wrapping and default
//! values are backend-specific enough to live with each backend.

use jsonif_schema::FieldKind;

use crate::error::JsonifError;

/// One backend's storage spelling for each scalar kind. `bytes` is `None`
/// where the backend's JSON layer has no byte-array representation.
pub struct TypeMap {
    pub backend: &'static str,
    pub double:  &'static str,
    pub float:   &'static str,
    pub int32:   &'static str,
    pub int64:   &'static str,
    pub uint32:  &'static str,
    pub uint64:  &'static str,
    pub bool_:   &'static str,
    pub string:  &'static str,
    pub bytes:   Option<&'static str>,
}

pub const C: TypeMap = TypeMap {
    backend: "c",
    double:  "double",
    float:   "float",
    int32:   "int32_t",
    int64:   "int64_t",
    uint32:  "uint32_t",
    uint64:  "uint64_t",
    bool_:   "bool",
    string:  "char*",
    bytes:   Some("uint8_t*"),
};

pub const CPP: TypeMap = TypeMap {
    backend: "cpp",
    double:  "double",
    float:   "float",
    int32:   "int32_t",
    int64:   "int64_t",
    uint32:  "uint32_t",
    uint64:  "uint64_t",
    bool_:   "bool",
    string:  "std::string",
    bytes:   None,
};

pub const TYPESCRIPT: TypeMap = TypeMap {
    backend: "typescript",
    double:  "number",
    float:   "number",
    int32:   "number",
    int64:   "number",
    uint32:  "number",
    uint64:  "number",
    bool_:   "boolean",
    string:  "string",
    bytes:   Some("Uint8Array"),
};

pub const UNITY: TypeMap = TypeMap {
    backend: "unity",
    double:  "double",
    float:   "float",
    int32:   "int",
    int64:   "long",
    uint32:  "uint",
    uint64:  "ulong",
    bool_:   "bool",
    string:  "string",
    bytes:   None,
};

impl TypeMap {
    /// Storage spelling for a scalar kind. Fails with UnsupportedFieldType
    /// for `bytes` on backends that cannot represent it; reference kinds
    /// are the resolver's business, not the table's.
    pub fn scalar_storage(&self, kind: &FieldKind) -> Result<&'static str, JsonifError> {
        match kind {
            FieldKind::Double => Ok(self.double),
            FieldKind::Float => Ok(self.float),
            FieldKind::Int32 => Ok(self.int32),
            FieldKind::Int64 => Ok(self.int64),
            FieldKind::Uint32 => Ok(self.uint32),
            FieldKind::Uint64 => Ok(self.uint64),
            FieldKind::Bool => Ok(self.bool_),
            FieldKind::String => Ok(self.string),
            FieldKind::Bytes => self.bytes.ok_or(JsonifError::UnsupportedFieldType {
                backend: self.backend,
                kind: "bytes",
            }),
            FieldKind::Enum(_) | FieldKind::Message(_) => {
                Err(JsonifError::UnsupportedFieldType {
                    backend: self.backend,
                    kind: "reference",
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_families_collapse_to_natural_width() {
        assert_eq!(C.scalar_storage(&FieldKind::Int32).unwrap(), "int32_t");
        assert_eq!(UNITY.scalar_storage(&FieldKind::Uint64).unwrap(), "ulong");
        assert_eq!(
            TYPESCRIPT.scalar_storage(&FieldKind::Double).unwrap(),
            "number"
        );
    }

    #[test]
    fn bytes_is_rejected_where_unrepresentable() {
        assert!(C.scalar_storage(&FieldKind::Bytes).is_ok());
        assert!(TYPESCRIPT.scalar_storage(&FieldKind::Bytes).is_ok());
        assert!(matches!(
            CPP.scalar_storage(&FieldKind::Bytes),
            Err(JsonifError::UnsupportedFieldType { backend: "cpp", .. })
        ));
        assert!(matches!(
            UNITY.scalar_storage(&FieldKind::Bytes),
            Err(JsonifError::UnsupportedFieldType { backend: "unity", .. })
        ));
    }
}
