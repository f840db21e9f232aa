use crate::annotation::io::ParseError;
use crate::types::{RefBlock, Strand};

/// A transcript record whose fields contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("transcript span [{start},{end}) is inverted")]
    InvertedTx { start: u32, end: u32 },

    #[error("coding span [{start},{end}) is inverted")]
    InvertedCds { start: u32, end: u32 },

    #[error("exons {first} and {second} overlap or repeat")]
    OverlappingExons { first: RefBlock, second: RefBlock },
}

impl RecordError {
    /// Table column the offending value comes from.
    pub fn column(&self) -> &'static str {
        match self {
            RecordError::InvertedTx { .. } => "txEnd",
            RecordError::InvertedCds { .. } => "cdsEnd",
            RecordError::OverlappingExons { .. } => "exonStarts",
        }
    }
}

/// Errors raised while turning one gene's records into isoform paths.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("gene '{0}' not found in table (name2 column)")]
    GeneNotFound(String),

    #[error("gene '{gene}' has transcripts on both strands; analysis is unsupported")]
    MixedStrand { gene: String },

    #[error("gene '{gene}' has transcripts on several chromosomes: {chroms:?}")]
    MixedChromosome { gene: String, chroms: Vec<String> },

    #[error("gene '{0}' has no usable transcripts after filtering non-coding records")]
    NoTranscripts(String),

    #[error("gene '{0}' has no exons")]
    EmptyGene(String),

    #[error("gene '{gene}' ({strand}): no producible graph, every transcript has a single pseudoexon")]
    NoProducibleGraph { gene: String, strand: Strand },

    #[error("transcript '{transcript}': exon [{start},{end}) matches no pseudoexon")]
    UnmappedExon {
        transcript: String,
        start: u32,
        end: u32,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}
