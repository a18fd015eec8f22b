//! The four generation backends. Each one walks the pruned model
//! depth-first and drives the shared emitter, resolver and type tables;
//! what differs per backend is the naming convention, the storage table
//! and the emission templates.

use jsonif_schema::{SchemaFile, SchemaModel};

use crate::error::JsonifError;
use crate::resolve::NameResolver;

mod c;
mod cpp;
mod typescript;
mod unity;

pub use c::CBackend;
pub use cpp::CppBackend;
pub use typescript::TypeScriptBackend;
pub use unity::UnityBackend;

/// One generated file, named relative to the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    pub name:    String,
    pub content: String,
}

pub trait Backend {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Generates the file set for one surviving schema file.
    fn generate_file(
        &self,
        file: &SchemaFile,
        model: &SchemaModel,
        resolver: &NameResolver,
    ) -> Result<Vec<OutputFile>, JsonifError>;

    /// Run-wide runtime helper files, appended once after the per-file
    /// sets. Most backends have one; C and C++ have none.
    fn shared_files(&self) -> Vec<OutputFile> {
        Vec::new()
    }
}

/// Selects one of the four backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    C,
    Cpp,
    TypeScript,
    Unity,
}

impl Target {
    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            Target::C => Box::new(CBackend),
            Target::Cpp => Box::new(CppBackend),
            Target::TypeScript => Box::new(TypeScriptBackend),
            Target::Unity => Box::new(UnityBackend),
        }
    }
}

/// The input path with its extension removed: `dir/foo.proto` → `dir/foo`.
pub(crate) fn base_name(path: &str) -> &str {
    match path.rfind('.') {
        Some(i) if !path[i..].contains('/') => &path[..i],
        _ => path,
    }
}

/// Base names of this file's dependencies that survived pruning, in
/// declaration order. Pruned dependencies must not produce includes or
/// imports.
pub(crate) fn surviving_dep_bases<'a>(
    file: &'a SchemaFile,
    model: &SchemaModel,
) -> Vec<&'a str> {
    file.dependencies
        .iter()
        .filter(|dep| model.has_file(dep))
        .map(|dep| base_name(dep))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_only_the_final_extension() {
        assert_eq!(base_name("foo.proto"), "foo");
        assert_eq!(base_name("dir/foo.proto"), "dir/foo");
        assert_eq!(base_name("dir.d/foo"), "dir.d/foo");
        assert_eq!(base_name("noext"), "noext");
    }
}
