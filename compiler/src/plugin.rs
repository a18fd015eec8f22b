//! The protoc plugin boundary: one serialized `CodeGeneratorRequest` read
//! to end-of-stream from stdin, one serialized `CodeGeneratorResponse`
//! written to stdout. On any failure nothing is written to stdout; the
//! caller reports the error and exits non-zero.

use std::io::{Read, Write};

use jsonif_schema::SchemaModel;
use prost::Message as _;

use crate::backends::{Backend, OutputFile};
use crate::error::JsonifError;
use crate::ingest::ingest_request;
use crate::proto;
use crate::resolve::NameResolver;

/// Generates the complete output file set for an ingested model: the
/// per-file sets in file order, then the backend's shared runtime files.
pub fn generate_files(
    model: &SchemaModel,
    backend: &dyn Backend,
) -> Result<Vec<OutputFile>, JsonifError> {
    let resolver = NameResolver::build(model);
    let mut files = Vec::new();
    for file in &model.files {
        files.extend(backend.generate_file(file, model, &resolver)?);
    }
    files.extend(backend.shared_files());
    Ok(files)
}

/// Runs the full pipeline over a decoded request and assembles the
/// response, advertising proto3-optional support.
pub fn generate_response(
    req: &proto::CodeGeneratorRequest,
    backend: &dyn Backend,
) -> Result<proto::CodeGeneratorResponse, JsonifError> {
    let model = ingest_request(req)?;
    let files = generate_files(&model, backend)?;
    Ok(proto::CodeGeneratorResponse {
        error: None,
        supported_features: Some(proto::code_generator_response::Feature::Proto3Optional as u64),
        file: files
            .into_iter()
            .map(|f| proto::code_generator_response::File {
                name: Some(f.name),
                content: Some(f.content),
            })
            .collect(),
    })
}

/// Plugin entry point shared by the four binaries.
pub fn run_plugin(backend: &dyn Backend) -> Result<(), JsonifError> {
    let mut input = Vec::new();
    std::io::stdin().read_to_end(&mut input)?;
    let req = proto::CodeGeneratorRequest::decode(input.as_slice())?;

    let resp = generate_response(&req, backend)?;

    let mut output = Vec::new();
    resp.encode(&mut output)
        .map_err(|e| JsonifError::Io(std::io::Error::other(e)))?;
    std::io::stdout().write_all(&output)?;
    Ok(())
}
