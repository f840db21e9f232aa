use std::collections::BTreeSet;

use crate::error::PathError;
use crate::model::transcript::TranscriptRecord;
use crate::model::types::ExonSlot;
use crate::types::{RefBlock, Strand};

/// Canonical exon slots for the records of one gene on one strand.
///
/// Slots are stored by ascending id, which is transcript order: ascending
/// coordinates on `+`, descending on `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTable {
    strand: Strand,
    slots: Vec<ExonSlot>,
}

impl SlotTable {
    /// Merge every exon of `records` into non-overlapping slots.
    ///
    /// Distinct intervals are visited in `(start, end)` order; an interval
    /// joins the current slot while it starts before the slot's running
    /// upper bound. Touching intervals open a new slot.
    pub fn build(gene: &str, strand: Strand, records: &[TranscriptRecord]) -> Result<Self, PathError> {
        let exons: BTreeSet<RefBlock> = records
            .iter()
            .flat_map(|r| r.exons().iter().copied())
            .collect();

        if exons.is_empty() {
            return Err(PathError::EmptyGene(gene.to_string()));
        }

        let mut groups: Vec<Vec<RefBlock>> = Vec::new();
        let mut upper = 0u32;

        for block in exons {
            match groups.last_mut() {
                Some(group) if block.start < upper => {
                    group.push(block);
                    upper = upper.max(block.end);
                }
                _ => {
                    groups.push(vec![block]);
                    upper = block.end;
                }
            }
        }

        let n = groups.len() as u32;
        let mut slots: Vec<ExonSlot> = groups
            .into_iter()
            .enumerate()
            .map(|(i, forms)| {
                let id = if strand.is_reverse() { n - i as u32 } else { i as u32 + 1 };
                ExonSlot::new(id, forms)
            })
            .collect();

        if strand.is_reverse() {
            slots.reverse();
        }

        for slot in &slots {
            log::debug!(
                "{gene}: slot {} [{}, {}) with {} form(s)",
                slot.id,
                slot.lower,
                slot.upper,
                slot.form_count()
            );
        }

        Ok(Self { strand, slots })
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn slots(&self) -> &[ExonSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot holding the given exon form, if any.
    pub fn slot_of(&self, exon: RefBlock) -> Option<&ExonSlot> {
        self.slots.iter().find(|s| s.forms().contains(&exon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, strand: Strand, exons: &[(u32, u32)]) -> TranscriptRecord {
        TranscriptRecord::new(
            name,
            "X",
            "chr1",
            strand,
            (exons[0].0, exons[exons.len() - 1].1),
            (exons[0].0, exons[exons.len() - 1].1),
            exons.iter().map(|&(s, e)| RefBlock::new(s, e)).collect(),
        )
    }

    fn scenario(strand: Strand) -> Vec<TranscriptRecord> {
        vec![
            rec("A", strand, &[(100, 200), (300, 400)]),
            rec("B", strand, &[(100, 200), (300, 350), (360, 400)]),
        ]
    }

    #[test]
    fn overlapping_forms_share_a_slot() {
        let table = SlotTable::build("X", Strand::Plus, &scenario(Strand::Plus)).unwrap();
        assert_eq!(table.len(), 2);

        let s1 = &table.slots()[0];
        assert_eq!((s1.id, s1.lower, s1.upper, s1.form_count()), (1, 100, 200, 1));

        let s2 = &table.slots()[1];
        assert_eq!((s2.id, s2.lower, s2.upper), (2, 300, 400));
        assert_eq!(
            s2.forms(),
            &[
                RefBlock::new(300, 350),
                RefBlock::new(300, 400),
                RefBlock::new(360, 400)
            ]
        );
    }

    #[test]
    fn minus_strand_numbers_from_the_five_prime_end() {
        let table = SlotTable::build("X", Strand::Minus, &scenario(Strand::Minus)).unwrap();
        let ids: Vec<_> = table.slots().iter().map(|s| (s.id, s.lower)).collect();
        assert_eq!(ids, vec![(1, 300), (2, 100)]);
        assert_eq!(table.slot_of(RefBlock::new(100, 200)).map(|s| s.id), Some(2));
    }

    #[test]
    fn slots_never_overlap() {
        // a long exon swallowing two short ones, then a touching neighbour
        let records = vec![
            rec("A", Strand::Plus, &[(10, 100), (150, 160)]),
            rec("B", Strand::Plus, &[(10, 20), (30, 40), (100, 120)]),
            rec("C", Strand::Plus, &[(15, 25), (95, 130), (150, 170)]),
        ];
        let table = SlotTable::build("X", Strand::Plus, &records).unwrap();

        for (i, a) in table.slots().iter().enumerate() {
            for b in &table.slots()[i + 1..] {
                assert!(!a.bounds().overlaps(b.bounds()), "{a} overlaps {b}");
            }
        }
        // (10,100) swallows (95,130) too, so 100-120 falls into the first slot
        assert_eq!(table.len(), 2);
        assert_eq!(table.slots()[0].bounds(), RefBlock::new(10, 130));
    }

    #[test]
    fn touching_exons_open_new_slot() {
        let records = vec![rec("A", Strand::Plus, &[(10, 20), (20, 30)])];
        let table = SlotTable::build("X", Strand::Plus, &records).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn no_exons_is_an_error() {
        let empty = TranscriptRecord::new("A", "X", "chr1", Strand::Plus, (0, 0), (0, 0), vec![]);
        let err = SlotTable::build("X", Strand::Plus, &[empty]).unwrap_err();
        assert!(matches!(err, PathError::EmptyGene(g) if g == "X"));
    }
}
