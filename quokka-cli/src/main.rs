//! Quokka CLI
//!
//! Compiles one template to HTML.
//!
//! - `quokka welcome.mjml -o welcome.html`
//! - `cat welcome.mjml | quokka - --json`

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use quokka_compiler::resolvers::FileSystemResolver;
use quokka_compiler::{CompileOutput, Compiler, ConfigFile, Configuration, Direction};
use tracing_subscriber::EnvFilter;

/// Quokka: compile responsive email markup to HTML
#[derive(Parser, Debug)]
#[command(name = "quokka")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Compile to stdout
    quokka newsletter.mjml

    # Compile to a file, resolving mj-include against ./partials
    quokka newsletter.mjml -o newsletter.html --include-root partials

    # Read stdin, print title, preview, html and diagnostics as JSON
    cat newsletter.mjml | quokka - --json
"#)]
struct Cli {
    /// Template to compile, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Write the HTML here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory `mj-include` paths are resolved against
    #[arg(long, value_name = "DIR")]
    include_root: Option<PathBuf>,

    /// Emit attribute values unescaped
    #[arg(long)]
    no_sanitize: bool,

    /// Document language
    #[arg(long, value_name = "LANG")]
    lang: Option<String>,

    /// Document direction: ltr, rtl or auto
    #[arg(long, value_name = "DIR")]
    dir: Option<Direction>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = read_input(&cli.input)?;
    let compiler = Compiler::new(build_configuration(&cli)?)?;
    let output = compiler
        .compile(&source)
        .with_context(|| format!("Failed to compile {}", cli.input))?;
    tracing::debug!(
        bytes = output.html.len(),
        diagnostics = output.diagnostics.len(),
        "compiled {}",
        cli.input
    );

    print_diagnostics(&output);

    let rendered = if cli.json {
        serde_json::to_string_pretty(&output)?
    } else {
        output.html
    };
    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `-v`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut source = String::new();
        let _ = io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
}

/// Config file first, then command-line flags on top.
fn build_configuration(cli: &Cli) -> anyhow::Result<Configuration> {
    let mut builder = Configuration::builder();
    if let Some(path) = &cli.config {
        let file = ConfigFile::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        builder = file.apply(builder)?;
    }
    if let Some(root) = &cli.include_root {
        let resolver = FileSystemResolver::new(root)
            .with_context(|| format!("Invalid include root {}", root.display()))?;
        builder = builder.resolver(Arc::new(resolver));
    }
    if cli.no_sanitize {
        builder = builder.sanitize_output(false);
    }
    if let Some(lang) = &cli.lang {
        builder = builder.language(lang.clone());
    }
    if let Some(dir) = cli.dir {
        builder = builder.direction(dir);
    }
    Ok(builder.build()?)
}

fn print_diagnostics(output: &CompileOutput) {
    for diagnostic in &output.diagnostics {
        eprintln!(
            "{} {} {}",
            "warning:".yellow().bold(),
            format!("[{}]", diagnostic.component).dimmed(),
            diagnostic.message
        );
    }
}
