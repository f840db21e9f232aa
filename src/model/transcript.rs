use crate::error::RecordError;
use crate::types::{RefBlock, Strand};

/// One row of a UCSC gene table.
///
/// Built by [`crate::annotation::io::TableReader`], which enforces the
/// column contract; [`TranscriptRecord::try_new`] checks the fields agree.
///
/// Notes:
/// - `exons` are kept in ascending genomic order regardless of strand.
/// - `tx` and `cds` are `(start, end)` pairs, 0-based half-open. A record
///   with `cds.0 == cds.1` is non-coding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    pub name: String,
    pub gene: String,
    pub chrom: String,
    pub strand: Strand,
    pub tx: (u32, u32),
    pub cds: (u32, u32),
    exons: Vec<RefBlock>,
}

impl TranscriptRecord {
    /// Create a record. Panics on inconsistent fields, see [`Self::try_new`].
    pub fn new(
        name: impl Into<String>,
        gene: impl Into<String>,
        chrom: impl Into<String>,
        strand: Strand,
        tx: (u32, u32),
        cds: (u32, u32),
        exons: Vec<RefBlock>,
    ) -> Self {
        match Self::try_new(name, gene, chrom, strand, tx, cds, exons) {
            Ok(r) => r,
            Err(e) => panic!("invalid transcript record: {e}"),
        }
    }

    /// Checked constructor: `tx` and `cds` must not be inverted and no two
    /// exons may overlap or repeat. Exons may be given in any order.
    pub fn try_new(
        name: impl Into<String>,
        gene: impl Into<String>,
        chrom: impl Into<String>,
        strand: Strand,
        tx: (u32, u32),
        cds: (u32, u32),
        mut exons: Vec<RefBlock>,
    ) -> Result<Self, RecordError> {
        if tx.1 < tx.0 {
            return Err(RecordError::InvertedTx {
                start: tx.0,
                end: tx.1,
            });
        }
        if cds.1 < cds.0 {
            return Err(RecordError::InvertedCds {
                start: cds.0,
                end: cds.1,
            });
        }

        exons.sort_unstable();
        if let Some(w) = exons.windows(2).find(|w| w[0].end > w[1].start) {
            return Err(RecordError::OverlappingExons {
                first: w[0],
                second: w[1],
            });
        }

        Ok(Self {
            name: name.into(),
            gene: gene.into(),
            chrom: chrom.into(),
            strand,
            tx,
            cds,
            exons,
        })
    }

    /// Exons in ascending genomic order.
    pub fn exons(&self) -> &[RefBlock] {
        &self.exons
    }

    /// Exons in transcription order: reversed on the minus strand.
    pub fn exons_5p_to_3p(&self) -> Vec<RefBlock> {
        let mut out = self.exons.clone();
        if self.strand.is_reverse() {
            out.reverse();
        }
        out
    }

    #[inline]
    pub fn is_coding(&self) -> bool {
        self.cds.0 != self.cds.1
    }

    /// Length of the mature (spliced) transcript.
    pub fn exonic_len(&self) -> u32 {
        self.exons.iter().map(|e| e.len()).sum()
    }

    pub fn span(&self) -> Option<(u32, u32)> {
        Some((self.exons.first()?.start, self.exons.last()?.end))
    }
}
