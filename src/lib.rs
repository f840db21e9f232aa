//! splice_paths
//!
//! Enumerates every splice-isoform path of a gene from a UCSC-style gene
//! table. Exon variants observed across transcripts are merged into
//! canonical slots, resolved into pseudoexons and joined into a directed
//! graph; each simple path through that graph is one possible isoform,
//! tagged as observed (a known transcript) or synthetic.
//! Coordinates are 0-based, half-open throughout.

pub mod types;
pub mod error;
pub mod model;
pub mod annotation;
pub mod isoform;
pub mod bed;
pub mod coords;
pub mod orf;
pub mod stats;

pub use annotation::{AnnotationBuilder, GeneTable};

pub use error::{PathError, RecordError};
pub use types::{RefBlock, Strand};

pub use model::gene::{Gene, PreparedGene};
pub use model::transcript::TranscriptRecord;
pub use model::types::{ExonSlot, NodeId, Pseudoexon, PseudoexonId};

pub use isoform::{analyze_gene, AnalysisOptions, EnumeratedPath, IsoformPaths, PathTag};

pub use bed::{write_bed_dirs, BedOrder};
