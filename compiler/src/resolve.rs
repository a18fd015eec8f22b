//! Qualified-name resolution.
//!
//! A single flat table keyed by fully qualified dotted path
//! (`pkg.Outer.Inner`) is built from the pruned model; nothing in the
//! model itself points back at its parents. Each backend asks for its own
//! spelling of an entry.

use std::collections::HashMap;

use jsonif_schema::casing;
use jsonif_schema::{EnumDef, Message, SchemaModel};

use crate::error::JsonifError;

/// One known type: where it lives and what it is called locally.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub package: Option<String>,
    /// Enclosing message chain, outermost first.
    pub parents: Vec<String>,
    pub name:    String,
}

impl TypeEntry {
    /// Flattened-underscore spelling used by the C backend:
    /// `pkg_sub_Outer_Inner`.
    pub fn c_name(&self) -> String {
        c_qualified(self.package.as_deref(), &self.parents, &self.name)
    }

    /// Fully scoped C++ spelling: `::pkg::sub::Outer::Inner`.
    pub fn cpp_name(&self) -> String {
        cpp_qualified(self.package.as_deref(), &self.parents, &self.name)
    }

    /// Package-local TypeScript spelling: `Outer_Inner`.
    pub fn ts_local_name(&self) -> String {
        let mut parts = self.parents.clone();
        parts.push(self.name.clone());
        parts.join("_")
    }

    /// Unity spelling: every dotted segment upper-cameled under a
    /// `global::` anchor, `global::Pkg.Sub.Outer.Inner`.
    pub fn unity_name(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(pkg) = &self.package {
            parts.extend(pkg.split('.').map(casing::to_upper_camel));
        }
        parts.extend(self.parents.iter().map(|p| casing::to_upper_camel(p)));
        parts.push(casing::to_upper_camel(&self.name));
        format!("global::{}", parts.join("."))
    }
}

pub struct NameResolver {
    types: HashMap<String, TypeEntry>,
}

impl NameResolver {
    /// Builds the known-type table from every file in the pruned model.
    pub fn build(model: &SchemaModel) -> Self {
        let mut types = HashMap::new();
        for file in &model.files {
            let package = file.package.as_deref();
            for enum_def in &file.enums {
                insert_enum(&mut types, package, &[], enum_def);
            }
            for message in &file.messages {
                insert_message(&mut types, package, &[], message);
            }
        }
        NameResolver { types }
    }

    /// Looks up a fully qualified dotted path. A miss means the schema
    /// references a type that was pruned away or never declared.
    pub fn lookup(&self, path: &str) -> Result<&TypeEntry, JsonifError> {
        self.types
            .get(path)
            .ok_or_else(|| JsonifError::UnresolvedType(path.to_string()))
    }

    /// TypeScript spelling relative to the package currently being
    /// generated: local name inside the same package, alias-qualified
    /// (`pkg_sub.Outer_Inner`) across packages.
    pub fn typescript_name(
        &self,
        current_package: Option<&str>,
        path: &str,
    ) -> Result<String, JsonifError> {
        let entry = self.lookup(path)?;
        if entry.package.as_deref() == current_package {
            return Ok(entry.ts_local_name());
        }
        match &entry.package {
            Some(pkg) => Ok(format!("{}.{}", package_alias(pkg), entry.ts_local_name())),
            None => Ok(entry.ts_local_name()),
        }
    }
}

fn insert_message(
    types: &mut HashMap<String, TypeEntry>,
    package: Option<&str>,
    parents: &[String],
    message: &Message,
) {
    types.insert(
        dotted_path(package, parents, &message.name),
        TypeEntry {
            package: package.map(str::to_string),
            parents: parents.to_vec(),
            name: message.name.clone(),
        },
    );
    let mut child_parents = parents.to_vec();
    child_parents.push(message.name.clone());
    for enum_def in &message.enums {
        insert_enum(types, package, &child_parents, enum_def);
    }
    for nested in &message.nested {
        insert_message(types, package, &child_parents, nested);
    }
}

fn insert_enum(
    types: &mut HashMap<String, TypeEntry>,
    package: Option<&str>,
    parents: &[String],
    enum_def: &EnumDef,
) {
    types.insert(
        dotted_path(package, parents, &enum_def.name),
        TypeEntry {
            package: package.map(str::to_string),
            parents: parents.to_vec(),
            name: enum_def.name.clone(),
        },
    );
}

/// `pkg.Outer.Name` (no leading dot).
pub fn dotted_path(package: Option<&str>, parents: &[String], name: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(pkg) = package {
        parts.push(pkg);
    }
    parts.extend(parents.iter().map(String::as_str));
    parts.push(name);
    parts.join(".")
}

/// The import alias a package gets in TypeScript output.
pub fn package_alias(package: &str) -> String {
    package.replace('.', "_")
}

pub fn c_qualified(package: Option<&str>, parents: &[String], name: &str) -> String {
    let mut qualified = String::new();
    if let Some(pkg) = package {
        qualified.push_str(&pkg.replace('.', "_"));
        qualified.push('_');
    }
    for parent in parents {
        qualified.push_str(parent);
        qualified.push('_');
    }
    qualified.push_str(name);
    qualified
}

/// Prefix for C enum value constants: package and enclosing messages, but
/// not the enum's own name, because proto enum values scope to the
/// enclosing declaration.
pub fn c_enum_value_prefix(package: Option<&str>, parents: &[String]) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(pkg) = package {
        parts.push(pkg.replace('.', "_"));
    }
    parts.extend(parents.iter().cloned());
    parts.join("_")
}

pub fn cpp_qualified(package: Option<&str>, parents: &[String], name: &str) -> String {
    let mut qualified = String::new();
    if let Some(pkg) = package {
        qualified.push_str("::");
        qualified.push_str(&pkg.replace('.', "::"));
    }
    for parent in parents {
        qualified.push_str("::");
        qualified.push_str(parent);
    }
    qualified.push_str("::");
    qualified.push_str(name);
    qualified
}

/// Discriminant enum name for a oneof: `<UpperCamel(name)>Case`.
pub fn case_type_name(oneof_name: &str) -> String {
    format!("{}Case", casing::to_upper_camel(oneof_name))
}

/// Member label inside a Case enum: `k<UpperCamel(field)>`.
pub fn case_member_label(field_name: &str) -> String {
    format!("k{}", casing::to_upper_camel(field_name))
}
