//! Argument parsing, command dispatch and output rendering.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use motifgraph_core::{
    BasisKind, BuildConfig, GraphError, MotifPlacement, NodeId, RandomEdgePolicy, RoleId,
    ShapeSpec, SyntheticGraph, build_graph,
};
use rand::{SeedableRng, rngs::SmallRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_PARAM: usize = 5;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "motifgraph",
    about = "Generate synthetic graphs with planted, role-labelled motifs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build one graph and print it.
    Generate(GenerateCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Basis topology (`clique`, `cycle`, `tree`, `ba` or `grid`).
    #[arg(long, value_parser = parse_basis)]
    pub basis: BasisKind,

    /// Basis size: nodes for clique, cycle and ba, height for tree, rows
    /// for grid.
    #[arg(long)]
    pub width: usize,

    /// Motif to attach, e.g. `house`, `cycle:6` or `grid:3x3`. Repeatable.
    #[arg(long = "shape", value_parser = parse_shape)]
    pub shapes: Vec<ShapeSpec>,

    /// First node id of the generated graph.
    #[arg(long, default_value_t = 0)]
    pub start: NodeId,

    /// Sample plug-in nodes at random instead of spacing them evenly.
    #[arg(long)]
    pub random_plugins: bool,

    /// Number of random edges added after the motifs are attached.
    #[arg(long = "extra-edges", default_value_t = 0)]
    pub extra_edges: usize,

    /// How extra edges treat pairs that are already connected.
    #[arg(long = "edge-policy", value_enum, default_value_t = EdgePolicy::AllowRepeats)]
    pub edge_policy: EdgePolicy,

    /// Tree branching, BA attachment count or grid columns.
    #[arg(long, default_value_t = DEFAULT_PARAM)]
    pub param: usize,

    /// Seed for every random choice.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Command-line spelling of [`RandomEdgePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgePolicy {
    /// Draw exactly the requested number of pairs; duplicates are absorbed.
    AllowRepeats,
    /// Keep drawing until the requested number of new edges exist.
    DistinctNew,
}

impl From<EdgePolicy> for RandomEdgePolicy {
    fn from(policy: EdgePolicy) -> Self {
        match policy {
            EdgePolicy::AllowRepeats => Self::AllowRepeats,
            EdgePolicy::DistinctNew => Self::DistinctNew,
        }
    }
}

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// A JSON document with nodes, edges, roles, plug-ins and motifs.
    Json,
    /// Role comments followed by one `u v` line per edge.
    EdgeList,
}

fn parse_basis(raw: &str) -> Result<BasisKind, GraphError> {
    raw.parse()
}

fn parse_shape(raw: &str) -> Result<ShapeSpec, GraphError> {
    raw.parse()
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Graph construction failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// The output file could not be created.
    #[error("failed to create `{path}`: {source}")]
    CreateOutput {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Writing the rendered graph failed.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
    /// JSON serialisation failed.
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

/// A generated graph together with the options that shape its rendering.
#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    /// The assembled graph.
    pub graph: SyntheticGraph,
    /// Requested output encoding.
    pub format: OutputFormat,
    /// Destination file, or `None` for stdout.
    pub output: Option<PathBuf>,
}

/// Serialised form of a [`SyntheticGraph`].
#[derive(Debug, Serialize)]
pub struct GraphDocument<'a> {
    /// Node ids in ascending order.
    pub nodes: Vec<NodeId>,
    /// Undirected edges as `[low, high]` pairs.
    pub edges: Vec<[NodeId; 2]>,
    /// Role label per node.
    pub roles: &'a [RoleId],
    /// Basis node of each motif's bridging edge.
    pub plugins: &'a [NodeId],
    /// Placement record per motif.
    pub motifs: &'a [MotifPlacement],
}

impl<'a> From<&'a SyntheticGraph> for GraphDocument<'a> {
    fn from(synthetic: &'a SyntheticGraph) -> Self {
        Self {
            nodes: synthetic.graph.nodes().collect(),
            edges: synthetic
                .graph
                .edges()
                .map(|edge| [edge.low(), edge.high()])
                .collect(),
            roles: &synthetic.roles,
            plugins: &synthetic.plugins,
            motifs: &synthetic.motifs,
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the graph cannot be built.
///
/// # Examples
/// ```
/// use clap::Parser;
/// use motifgraph_cli::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from([
///     "motifgraph", "generate", "--basis", "cycle", "--width", "8", "--shape", "house",
/// ]);
/// let generated = run_cli(cli)?;
/// assert_eq!(generated.graph.graph.node_count(), 13);
/// # Ok::<(), motifgraph_cli::cli::CliError>(())
/// ```
pub fn run_cli(cli: Cli) -> Result<GeneratedGraph, CliError> {
    match cli.command {
        Command::Generate(command) => generate(command),
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(basis = %command.basis, width = command.width, seed = command.seed),
)]
fn generate(command: GenerateCommand) -> Result<GeneratedGraph, CliError> {
    let config = BuildConfig::new(command.basis, command.width)
        .with_shapes(command.shapes)
        .with_start(command.start)
        .with_random_plugins(command.random_plugins)
        .with_extra_random_edges(command.extra_edges)
        .with_random_edge_policy(command.edge_policy.into())
        .with_param(command.param);
    let mut rng = SmallRng::seed_from_u64(command.seed);
    let graph = build_graph(&config, &mut rng)?;
    info!(
        nodes = graph.graph.node_count(),
        edges = graph.graph.edge_count(),
        motifs = graph.motifs.len(),
        roles = graph.role_count(),
        "graph generated"
    );
    Ok(GeneratedGraph {
        graph,
        format: command.format,
        output: command.output,
    })
}

/// Writes `generated` to its destination.
///
/// # Errors
/// Returns [`CliError`] when the destination cannot be created or written.
pub fn emit(generated: &GeneratedGraph) -> Result<(), CliError> {
    match &generated.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            render(&generated.graph, generated.format, &mut writer)?;
            writer.flush().map_err(CliError::Write)
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            render(&generated.graph, generated.format, &mut writer)?;
            writer.flush().map_err(CliError::Write)
        }
    }
}

/// Renders `graph` to `writer` in `format`.
///
/// # Errors
/// Returns [`CliError::Write`] when writing fails and [`CliError::Json`]
/// when serialisation fails.
///
/// # Examples
/// ```
/// use motifgraph_cli::cli::{OutputFormat, render};
/// use motifgraph_core::{BasisKind, BuildConfig, build_graph};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let config = BuildConfig::new(BasisKind::Cycle, 3);
/// let graph = build_graph(&config, &mut SmallRng::seed_from_u64(0))?;
/// let mut buffer = Vec::new();
/// render(&graph, OutputFormat::EdgeList, &mut buffer)?;
/// let text = String::from_utf8(buffer).expect("utf-8 output");
/// assert_eq!(text, "# roles\n# 0\t0\n# 1\t0\n# 2\t0\n0 1\n0 2\n1 2\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render(
    graph: &SyntheticGraph,
    format: OutputFormat,
    mut writer: impl Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &GraphDocument::from(graph))?;
            writeln!(writer).map_err(CliError::Write)
        }
        OutputFormat::EdgeList => write_edge_list(graph, writer).map_err(CliError::Write),
    }
}

fn write_edge_list(graph: &SyntheticGraph, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "# roles")?;
    for (node, role) in graph.graph.nodes().zip(&graph.roles) {
        writeln!(writer, "# {node}\t{role}")?;
    }
    for edge in graph.graph.edges() {
        writeln!(writer, "{} {}", edge.low(), edge.high())?;
    }
    Ok(())
}
