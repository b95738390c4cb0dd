//! Parse a Ruby source file with the tree-sitter Ruby grammar and print the
//! resulting syntax tree on one line, as tree-sitter's own S-expression.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as _;
use tracing_subscriber::EnvFilter;
use tree_sitter::Parser;

#[derive(Debug, clap::Parser)]
#[command(name = "print-ast", about = "Print the tree-sitter AST of a Ruby file")]
struct Args {
    /// Ruby source file to parse
    file: PathBuf,

    /// Exit with a non-zero status if the tree contains ERROR or MISSING nodes
    #[arg(long)]
    fail_on_error: bool,
}

/// A parsed tree rendered for printing.
#[derive(Debug)]
struct Rendered {
    sexp: String,
    has_error: bool,
}

impl Rendered {
    /// Whether the run should exit with a failure status.
    fn fails(&self, fail_on_error: bool) -> bool {
        fail_on_error && self.has_error
    }
}

fn render(parser: &mut Parser, source: &str) -> Result<Rendered> {
    let tree = parser.parse(source, None).context("parse was cancelled")?;
    let root = tree.root_node();
    Ok(Rendered {
        sexp: root.to_sexp(),
        has_error: root.has_error(),
    })
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let mut parser = tree_sitter_ruby_loader::parser()?;
    let rendered = render(&mut parser, &source)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;
    println!("{}", rendered.sexp);

    if rendered.fails(args.fail_on_error) {
        tracing::warn!(file = %args.file.display(), "syntax tree contains errors");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
