use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use ontograph::ontology::{
    DocumentFormat, from_ontology, parse_document, to_ontology, write_document,
};
use ontograph::Graph;

#[derive(Debug, Parser)]
#[command(
    name = "ontograph",
    about = "Convert schema documents to graph snapshots and back."
)]
struct ConvertArgs {
    /// Path to the input schema document or graph snapshot. Use '-' to
    /// read from stdin.
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Path to the output file. Use '-' to write to stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Input format (defaults to the input file extension or yaml).
    #[arg(long = "input-format")]
    input_format: Option<TextFormat>,

    /// Output format (defaults to the output file extension or yaml).
    /// 'graph' emits the graph snapshot instead of a schema document.
    #[arg(short = 'e', long = "output-format")]
    output_format: Option<OutputKind>,

    /// Treat the input as a graph snapshot instead of a schema document.
    #[arg(long = "from-graph", action = ArgAction::SetTrue)]
    from_graph: bool,

    /// Print entity/relationship counts instead of converting.
    #[arg(long = "stats", action = ArgAction::SetTrue, conflicts_with = "output")]
    stats: bool,

    /// Suppress informational output.
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum TextFormat {
    Yaml,
    Json,
}

impl From<TextFormat> for DocumentFormat {
    fn from(format: TextFormat) -> Self {
        match format {
            TextFormat::Yaml => DocumentFormat::Yaml,
            TextFormat::Json => DocumentFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputKind {
    Yaml,
    Json,
    Graph,
}

impl OutputKind {
    fn from_path(path: &Path) -> Option<Self> {
        match DocumentFormat::from_path(path) {
            Some(DocumentFormat::Yaml) => Some(OutputKind::Yaml),
            Some(DocumentFormat::Json) => Some(OutputKind::Json),
            None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputSource {
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Clone)]
enum OutputDestination {
    Stdout,
    File(PathBuf),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("\u{001b}[31merror:\u{001b}[0m {err:?}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<()> {
    let args = ConvertArgs::parse();

    let source = match args.input.as_deref() {
        None | Some("-") => InputSource::Stdin,
        Some(path) => InputSource::File(PathBuf::from(path)),
    };

    let input_format: DocumentFormat = match (&args.input_format, &source) {
        (Some(format), _) => (*format).into(),
        (None, InputSource::File(path)) => {
            DocumentFormat::from_path(path).unwrap_or(DocumentFormat::Yaml)
        }
        (None, InputSource::Stdin) => DocumentFormat::Yaml,
    };

    let text = read_input(&source)?;

    let graph = if args.from_graph {
        serde_json::from_str::<Graph>(&text).context("failed to parse graph snapshot")?
    } else {
        let document = parse_document(&text, input_format)?;
        from_ontology(&document)
    };

    if args.stats {
        print_stats(&graph);
        return Ok(());
    }

    let destination = match args.output.as_deref() {
        None | Some("-") => OutputDestination::Stdout,
        Some(path) => OutputDestination::File(PathBuf::from(path)),
    };

    let output_kind = args.output_format.or_else(|| match &destination {
        OutputDestination::File(path) => OutputKind::from_path(path),
        OutputDestination::Stdout => None,
    });

    let rendered = match output_kind.unwrap_or(OutputKind::Yaml) {
        OutputKind::Yaml => write_document(&to_ontology(&graph), DocumentFormat::Yaml)?,
        OutputKind::Json => write_document(&to_ontology(&graph), DocumentFormat::Json)?,
        OutputKind::Graph => {
            serde_json::to_string_pretty(&graph).context("failed to serialize graph snapshot")?
        }
    };

    match &destination {
        OutputDestination::Stdout => {
            io::stdout()
                .write_all(rendered.as_bytes())
                .context("failed to write to stdout")?;
        }
        OutputDestination::File(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write output to '{}'", path.display()))?;
            if !args.quiet {
                eprintln!("wrote {}", path.display());
            }
        }
    }

    Ok(())
}

fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read from stdin")?;
            if text.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(text)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file '{}'", path.display())),
    }
}

fn print_stats(graph: &Graph) {
    println!(
        "{} entities, {} relationships",
        graph.node_count(),
        graph.relationship_count()
    );
    for node in graph.nodes_ordered() {
        let outgoing = graph
            .relationships_ordered()
            .filter(|rel| rel.from == node.id)
            .count();
        println!(
            "  {} ({} properties, {} outgoing)",
            node.caption,
            node.properties.len(),
            outgoing
        );
    }
}
