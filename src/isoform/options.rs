use crate::bed::BedOrder;

/// Knobs for [`crate::isoform::analyze_gene`] and the BED writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Drop records with `cdsStart == cdsEnd` before building slots.
    pub coding_only: bool,

    /// Longest path (in pseudoexons) the enumerator will follow. `None` is
    /// unbounded; dense exon lattices can then produce exponentially many
    /// paths.
    pub max_depth: Option<usize>,

    /// Line order of minus-strand BED files.
    pub bed_order: BedOrder,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            coding_only: true,
            max_depth: None,
            bed_order: BedOrder::Genomic,
        }
    }
}

impl AnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coding_only(mut self, yes: bool) -> Self {
        self.coding_only = yes;
        self
    }

    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn bed_order(mut self, order: BedOrder) -> Self {
        self.bed_order = order;
        self
    }
}
