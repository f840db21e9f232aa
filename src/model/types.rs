use std::fmt;

use crate::types::RefBlock;

/// Global pseudoexon number, 1-based, 5'-most first.
pub type NodeId = u32;

/// A group of overlapping exon intervals sharing one coarse identity.
///
/// `id` is strand-aware: slot 1 holds the transcript's 5'-most exons on
/// either strand. `forms` are the distinct observed `(start, end)` intervals,
/// sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonSlot {
    pub id: u32,
    pub lower: u32,
    pub upper: u32,
    forms: Vec<RefBlock>,
}

impl ExonSlot {
    pub(crate) fn new(id: u32, mut forms: Vec<RefBlock>) -> Self {
        forms.sort_unstable();
        forms.dedup();
        let lower = forms.iter().map(|f| f.start).min().unwrap_or(0);
        let upper = forms.iter().map(|f| f.end).max().unwrap_or(0);
        Self {
            id,
            lower,
            upper,
            forms,
        }
    }

    pub fn forms(&self) -> &[RefBlock] {
        &self.forms
    }

    #[inline]
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    pub fn bounds(&self) -> RefBlock {
        RefBlock {
            start: self.lower,
            end: self.upper,
        }
    }

    /// Minimal non-overlapping sub-intervals implied by every start/end
    /// observed in the slot, ascending.
    ///
    /// Every form is the exact union of a contiguous run of segments.
    pub fn segments(&self) -> Vec<RefBlock> {
        let mut cuts: Vec<u32> = self
            .forms
            .iter()
            .flat_map(|f| [f.start, f.end])
            .collect();
        cuts.sort_unstable();
        cuts.dedup();

        cuts.windows(2)
            .map(|w| RefBlock {
                start: w[0],
                end: w[1],
            })
            .filter(|seg| self.forms.iter().any(|f| f.contains(*seg)))
            .collect()
    }
}

/// Lookup-table row: `id  lower  upper  starts  ends  forms`.
impl fmt::Display for ExonSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let starts: Vec<String> = self.forms.iter().map(|b| b.start.to_string()).collect();
        let ends: Vec<String> = self.forms.iter().map(|b| b.end.to_string()).collect();
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.lower,
            self.upper,
            starts.join(","),
            ends.join(","),
            self.form_count()
        )
    }
}

/// Composite pseudoexon label.
///
/// `Slot(k)` for single-form slots, `Split` (`k.s.e`) when the slot has
/// several forms; `start_rank`/`end_rank` are 1-based positions of the form's
/// boundaries in the slot's strand-ordered boundary list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PseudoexonId {
    Slot(u32),
    Split {
        slot: u32,
        start_rank: u32,
        end_rank: u32,
    },
}

impl PseudoexonId {
    pub fn slot(self) -> u32 {
        match self {
            PseudoexonId::Slot(s) => s,
            PseudoexonId::Split { slot, .. } => slot,
        }
    }
}

impl fmt::Display for PseudoexonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PseudoexonId::Slot(s) => write!(f, "{s}"),
            PseudoexonId::Split {
                slot,
                start_rank,
                end_rank,
            } => write!(f, "{slot}.{start_rank}.{end_rank}"),
        }
    }
}

/// Atomic graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pseudoexon {
    pub index: NodeId,
    pub id: PseudoexonId,
    pub block: RefBlock,
    pub frame: u8,
}

impl fmt::Display for Pseudoexon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.index, self.id, self.block.start, self.block.end, self.frame
        )
    }
}
