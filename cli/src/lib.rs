//! Shared entry-point plumbing for the plugin binaries.

use std::path::Path;

use jsonif_compiler::{run_plugin, Target};

/// Routes debug logging to stderr; stdout belongs to the response.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one plugin binary: read the request, generate, write the
/// response. On failure, one diagnostic line and a non-zero exit.
pub fn plugin_main(target: Target) {
    init_tracing();
    let backend = target.backend();
    if let Err(err) = run_plugin(backend.as_ref()) {
        let argv0 = std::env::args().next().unwrap_or_default();
        let program = Path::new(&argv0)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "protoc-gen-jsonif".to_string());
        eprintln!("{}: {}", program, err);
        std::process::exit(1);
    }
}
