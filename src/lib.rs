//! Variation graph construction.
//!
//! A [`VariationGraph`] starts as one node per reference sequence. A
//! coordinate-sorted stream of [`AlleleEdit`]s is then folded in by a
//! [`GraphBuilder`], which splits reference nodes at edit boundaries with
//! [`VariationGraph::divide_path`] and adds alternate-allele nodes and
//! edges. The finished graph can be validated, persisted as a record
//! stream, written as dot or GFA, or handed to an external [`Aligner`].

pub mod aligner;
pub mod builder;
pub mod divide;
pub mod dot;
pub mod edit;
pub mod error;
pub mod gfa;
pub mod graph;
pub mod input;
pub mod path_map;
pub mod stream;
pub mod validate;

pub use aligner::{AlignableGraph, Aligner, AlignmentRequest, AlignmentScores, Mapping, Traceback};
pub use builder::{EditNodes, Frontier, GraphBuilder, ReferencePath};
pub use edit::{AlleleEdit, EditKind};
pub use error::GraphError;
pub use graph::{Edge, Node, NodeId, VariationGraph};
pub use input::{load_sequences, EditTable, FastaReference, FastaSequence, ReferenceSource, VariantSource};
pub use path_map::PathMap;
pub use validate::InvalidGraph;

use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{info, warn};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Length-prefixed binary records
    Vg,
    /// Graphviz dot
    Dot,
    /// GFA 1.0 with reference paths
    Gfa,
    /// Alignment request as JSON: scores plus node and edge lists
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "vgrush", version, about = "Variation graph construction from a reference and sorted allele edits")]
pub struct Args {
    /// Reference FASTA file
    #[arg(short, long, required_unless_present = "input")]
    pub reference: Option<String>,

    /// Tab-separated allele edits: name, start, end, alt (0-based, half-open)
    #[arg(short, long, requires = "reference")]
    pub edits: Option<String>,

    /// Load a serialized graph instead of constructing one
    #[arg(short, long, conflicts_with = "reference")]
    pub input: Option<String>,

    /// Output file
    #[arg(short, long, default_value = "output.vg")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Vg)]
    pub format: OutputFormat,

    /// Alignment scores (match,mismatch,gap_open,gap_extend) sent with JSON output
    #[arg(short = 'S', long = "scores", default_value = "2,2,3,1")]
    pub scores: String,

    /// Check every graph index after construction and fail on inconsistency
    #[arg(long)]
    pub validate: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run_vgrush(args: Args) -> Result<(), GraphError> {
    let scores = AlignmentScores::parse(&args.scores).map_err(GraphError::InvalidScores)?;

    let (graph, paths) = match (&args.input, &args.reference) {
        (Some(input), _) => (VariationGraph::load(input)?, Vec::new()),
        (None, Some(reference_path)) => {
            let reference = FastaReference::from_file(reference_path)?;
            let edits = match &args.edits {
                Some(edits_path) => EditTable::from_file(edits_path)?,
                None => EditTable::new(),
            };
            info!(
                "Loaded {} reference sequences and {} edits",
                reference.len(),
                edits.len()
            );
            VariationGraph::construct(&reference, &edits)?
        }
        (None, None) => return Err(GraphError::NoInput),
    };

    if args.validate {
        graph.check_indices()?;
        info!("All graph indices are consistent");
    } else if !graph.is_valid() {
        warn!("Graph failed the structural check");
    }

    let mut writer = BufWriter::new(File::create(&args.output)?);
    match args.format {
        OutputFormat::Vg => graph.serialize_to(&mut writer)?,
        OutputFormat::Dot => graph.write_dot(&mut writer)?,
        OutputFormat::Gfa => graph.write_gfa(&paths, &mut writer)?,
        OutputFormat::Json => serde_json::to_writer(&mut writer, &AlignmentRequest::new(&graph, scores))?,
    }
    writer.flush()?;
    info!(
        "Wrote {} nodes and {} edges as {:?} to {}",
        graph.node_count(),
        graph.edge_count(),
        args.format,
        args.output
    );
    Ok(())
}
