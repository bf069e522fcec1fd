/// Example rendering a .docx template with data from a JSON file.
///
/// ```text
/// RUST_LOG=debug cargo run --example render -- letter.docx data.json out.docx
/// ```
use clap::Parser;
use litchi_template::{DocTemplate, EscapeMode, TemplateOptions, TemplateSyntax};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Render a .docx template with JSON data")]
struct Args {
    /// Template document (.docx)
    template: PathBuf,
    /// JSON file holding the render data
    data: PathBuf,
    /// Output document
    output: PathBuf,
    /// Render missing fields as empty instead of failing
    #[arg(long)]
    lenient: bool,
    /// Insert values without XML escaping
    #[arg(long)]
    raw: bool,
    /// Skip body repairs
    #[arg(long)]
    no_sanitize: bool,
    /// Treat the body as plain handlebars (no Go-style `{{.Field}}` actions)
    #[arg(long)]
    handlebars: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let data: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&args.data)?)?;

    let mut options = TemplateOptions::default().with_strict(!args.lenient);
    if args.raw {
        options = options.with_escape(EscapeMode::None);
    }
    if args.no_sanitize {
        options = options.with_sanitize(Vec::new());
    }
    if args.handlebars {
        options = options.with_syntax(TemplateSyntax::Handlebars);
    }

    let mut template = DocTemplate::from_path_with_options(&args.template, &options)?;
    template.parse()?;
    template.execute(&args.output, &data)?;
    template.close()?;

    println!("Wrote {}", args.output.display());
    Ok(())
}
