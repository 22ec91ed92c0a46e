//! Tests for argument parsing, generation and rendering.

use super::*;

use clap::Parser;
use motifgraph_core::{BasisKind, GraphError, ShapeSpec};
use motifgraph_test_support::tracing::RecordingLayer;
use rstest::rstest;
use serde_json::Value;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn parse(args: &[&str]) -> Cli {
    let argv = std::iter::once("motifgraph").chain(args.iter().copied());
    match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments must parse: {err}"),
    }
}

fn generate_command(cli: Cli) -> GenerateCommand {
    match cli.command {
        Command::Generate(command) => command,
    }
}

#[rstest]
fn defaults_are_applied() {
    let command = generate_command(parse(&["generate", "--basis", "ba", "--width", "20"]));
    assert_eq!(command.basis, BasisKind::Ba);
    assert!(command.shapes.is_empty());
    assert_eq!(command.start, 0);
    assert!(!command.random_plugins);
    assert_eq!(command.extra_edges, 0);
    assert_eq!(command.edge_policy, EdgePolicy::AllowRepeats);
    assert_eq!(command.param, 5);
    assert_eq!(command.seed, 42);
    assert_eq!(command.format, OutputFormat::Json);
    assert!(command.output.is_none());
}

#[rstest]
fn shapes_are_repeatable_and_parsed() {
    let command = generate_command(parse(&[
        "generate", "--basis", "cycle", "--width", "30", "--shape", "house", "--shape",
        "cycle:6", "--shape", "grid:2x3", "--edge-policy", "distinct-new", "--format",
        "edge-list",
    ]));
    assert_eq!(
        command.shapes,
        vec![
            ShapeSpec::House,
            ShapeSpec::Cycle { length: 6 },
            ShapeSpec::Grid { rows: 2, cols: 3 },
        ]
    );
    assert_eq!(command.edge_policy, EdgePolicy::DistinctNew);
    assert_eq!(command.format, OutputFormat::EdgeList);
}

#[rstest]
#[case::unknown_basis(&["generate", "--basis", "star", "--width", "4"])]
#[case::unknown_shape(&["generate", "--basis", "cycle", "--width", "4", "--shape", "pentagon"])]
#[case::malformed_grid(&["generate", "--basis", "cycle", "--width", "4", "--shape", "grid:3y3"])]
#[case::missing_width(&["generate", "--basis", "cycle"])]
#[case::unknown_policy(&["generate", "--basis", "cycle", "--width", "4", "--edge-policy", "never"])]
fn clap_rejects_invalid_arguments(#[case] args: &[&str]) {
    let argv = std::iter::once("motifgraph").chain(args.iter().copied());
    assert!(Cli::try_parse_from(argv).is_err());
}

#[rstest]
fn generation_is_reproducible_for_a_seed() -> TestResult {
    let args = [
        "generate", "--basis", "ba", "--width", "25", "--param", "2", "--shape", "house",
        "--shape", "diamond", "--random-plugins", "--extra-edges", "4", "--seed", "9",
    ];
    let first = run_cli(parse(&args))?;
    let second = run_cli(parse(&args))?;
    assert_eq!(first.graph, second.graph);
    assert_eq!(first.graph.motifs.len(), 2);
    Ok(())
}

#[rstest]
fn build_failures_surface_the_graph_error() {
    let cli = parse(&[
        "generate", "--basis", "clique", "--width", "2", "--shape", "house", "--shape", "house",
        "--shape", "house",
    ]);
    match run_cli(cli) {
        Ok(_) => panic!("three motifs cannot fit a two-node basis"),
        Err(err) => assert!(matches!(
            err,
            CliError::Graph(GraphError::PluginsExceedBasis {
                shapes: 3,
                basis_nodes: 2
            })
        )),
    }
}

#[rstest]
fn oversized_start_offsets_are_reported() {
    let start = (usize::MAX - 1).to_string();
    let cli = parse(&["generate", "--basis", "cycle", "--width", "4", "--start", &start]);
    match run_cli(cli) {
        Ok(_) => panic!("node ids past usize::MAX cannot be allocated"),
        Err(err) => assert!(matches!(
            err,
            CliError::Graph(GraphError::InvalidParameter {
                parameter: "start",
                ..
            })
        )),
    }
}

#[rstest]
fn json_output_lists_graph_parts() -> TestResult {
    let generated = run_cli(parse(&[
        "generate", "--basis", "cycle", "--width", "6", "--shape", "house", "--start", "3",
    ]))?;
    let mut buffer = Vec::new();
    render(&generated.graph, OutputFormat::Json, &mut buffer)?;
    let document: Value = serde_json::from_slice(&buffer)?;

    assert_eq!(document["nodes"].as_array().map(Vec::len), Some(11));
    assert_eq!(document["edges"].as_array().map(Vec::len), Some(6 + 6 + 1));
    assert_eq!(document["roles"][6], 1);
    assert_eq!(document["plugins"][0], 3);
    assert_eq!(document["motifs"][0]["kind"], "house");
    assert_eq!(document["motifs"][0]["first_node"], 9);
    Ok(())
}

#[rstest]
fn edge_list_prefixes_roles() -> TestResult {
    let generated = run_cli(parse(&[
        "generate", "--basis", "cycle", "--width", "4", "--shape", "diamond",
    ]))?;
    let mut buffer = Vec::new();
    render(&generated.graph, OutputFormat::EdgeList, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.first(), Some(&"# roles"));
    let role_lines = lines.iter().skip(1).filter(|line| line.starts_with("# ")).count();
    assert_eq!(role_lines, 10);
    let edge_lines = lines.iter().filter(|line| !line.starts_with('#')).count();
    assert_eq!(edge_lines, generated.graph.graph.edge_count());
    assert!(lines.contains(&"0 4"));
    Ok(())
}

#[rstest]
fn output_files_receive_the_rendering() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("graph.json");
    let path_arg = path.to_string_lossy().into_owned();
    let generated = run_cli(parse(&[
        "generate", "--basis", "grid", "--width", "3", "--param", "3", "--output", &path_arg,
    ]))?;
    emit(&generated)?;

    let document: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(document["nodes"].as_array().map(Vec::len), Some(9));
    assert_eq!(document["motifs"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[rstest]
fn missing_output_directories_are_reported() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("missing").join("graph.json");
    let path_arg = path.to_string_lossy().into_owned();
    let generated = run_cli(parse(&[
        "generate", "--basis", "cycle", "--width", "3", "--output", &path_arg,
    ]))?;
    match emit(&generated) {
        Ok(()) => panic!("parent directory does not exist"),
        Err(err) => assert!(matches!(err, CliError::CreateOutput { .. })),
    }
    Ok(())
}

#[rstest]
fn generate_span_records_the_request() -> TestResult {
    let cli = parse(&["generate", "--basis", "tree", "--width", "2", "--seed", "5"]);
    let (layer, result) = RecordingLayer::capture(|| run_cli(cli));
    result?;

    let span = layer.span_named("cli.generate").ok_or("generate span missing")?;
    assert_eq!(span.field("basis"), Some("tree"));
    assert_eq!(span.field("seed"), Some("5"));
    let events = layer.events_with_message("graph generated");
    assert_eq!(events.first().and_then(|event| event.field("nodes")), Some("31"));
    Ok(())
}
