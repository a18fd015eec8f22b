use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

use jsonif_compiler::{generate_files, ingest_files, proto::FileDescriptorSet, JsonifError, Target};
use prost::Message as _;

#[derive(Parser)]
#[command(name = "jsonif")]
#[command(about = "Generate JSON interface code from a serialized descriptor set", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code for one target language from a `protoc
    /// --descriptor_set_out` file
    Gen {
        /// Target language
        #[arg(short, long, value_enum)]
        target: TargetArg,

        /// Input descriptor set file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (defaults to the current directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Print the pruned schema model as JSON (printed to stdout)
    Dump {
        /// Input descriptor set file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    C,
    Cpp,
    Typescript,
    Unity,
}

impl From<TargetArg> for Target {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::C => Target::C,
            TargetArg::Cpp => Target::Cpp,
            TargetArg::Typescript => Target::TypeScript,
            TargetArg::Unity => Target::Unity,
        }
    }
}

fn read_descriptor_set(input: &PathBuf) -> Result<FileDescriptorSet, JsonifError> {
    let bytes = fs::read(input)?;
    Ok(FileDescriptorSet::decode(bytes.as_slice())?)
}

fn main() -> Result<(), JsonifError> {
    jsonif_cli::init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Gen {
            target,
            input,
            out_dir,
        } => {
            let set = read_descriptor_set(input)?;
            let model = ingest_files(&set.file)?;
            let backend = Target::from(*target).backend();
            let files = generate_files(&model, backend.as_ref())?;

            let out_dir = out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            for file in &files {
                let path = out_dir.join(&file.name);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, &file.content)?;
                println!("Generated {}", path.display());
            }
            Ok(())
        }

        Commands::Dump { input } => {
            let set = read_descriptor_set(input)?;
            let model = ingest_files(&set.file)?;
            let json = serde_json::to_string_pretty(&model)
                .map_err(|e| JsonifError::Io(std::io::Error::other(e)))?;
            println!("{}", json);
            Ok(())
        }
    }
}
