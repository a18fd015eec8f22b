use jsonif_compiler::Target;

fn main() {
    jsonif_cli::plugin_main(Target::TypeScript);
}
