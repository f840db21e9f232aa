use std::collections::HashMap;

use crate::error::PathError;
use crate::isoform::slots::SlotTable;
use crate::model::transcript::TranscriptRecord;
use crate::model::types::{NodeId, Pseudoexon, PseudoexonId};
use crate::types::{RefBlock, Strand};

/// Pseudoexon lookup table: every distinct exon form of a gene, numbered
/// 1..N from the transcript 5' end.
///
/// On `-` the numbering is the exact reverse of what the same coordinates
/// would get on `+`.
#[derive(Debug, Clone)]
pub struct PseudoexonTable {
    strand: Strand,
    nodes: Vec<Pseudoexon>,
    by_block: HashMap<RefBlock, NodeId>,
}

impl PseudoexonTable {
    pub fn build(slots: &SlotTable) -> Self {
        let strand = slots.strand();
        let mut entries: Vec<(RefBlock, PseudoexonId)> = Vec::new();

        for slot in slots.slots() {
            if slot.form_count() == 1 {
                entries.push((slot.forms()[0], PseudoexonId::Slot(slot.id)));
                continue;
            }

            let mut ranks: Vec<u32> = slot
                .forms()
                .iter()
                .flat_map(|f| [f.start, f.end])
                .collect();
            ranks.sort_unstable();
            ranks.dedup();
            if strand.is_reverse() {
                ranks.reverse();
            }
            let rank_of = |pos: u32| -> u32 {
                // every boundary of a form is in `ranks` by construction
                ranks.iter().position(|&r| r == pos).map_or(0, |i| i as u32 + 1)
            };

            for &form in slot.forms() {
                entries.push((
                    form,
                    PseudoexonId::Split {
                        slot: slot.id,
                        start_rank: rank_of(form.start),
                        end_rank: rank_of(form.end),
                    },
                ));
            }
        }

        // slot ranges are disjoint, so coordinate order keeps slots contiguous
        entries.sort_unstable_by_key(|(block, _)| *block);
        if strand.is_reverse() {
            entries.reverse();
        }

        let nodes: Vec<Pseudoexon> = entries
            .into_iter()
            .enumerate()
            .map(|(i, (block, id))| Pseudoexon {
                index: i as NodeId + 1,
                id,
                block,
                frame: block.frame(),
            })
            .collect();

        let by_block = nodes.iter().map(|p| (p.block, p.index)).collect();

        Self {
            strand,
            nodes,
            by_block,
        }
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Pseudoexons in index order.
    pub fn nodes(&self) -> &[Pseudoexon] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: NodeId) -> Option<&Pseudoexon> {
        let i = (index as usize).checked_sub(1)?;
        self.nodes.get(i)
    }

    pub fn lookup(&self, exon: RefBlock) -> Option<NodeId> {
        self.by_block.get(&exon).copied()
    }

    /// Composite label of a node, or its bare number if unknown.
    pub fn label(&self, index: NodeId) -> String {
        self.get(index)
            .map(|p| p.id.to_string())
            .unwrap_or_else(|| index.to_string())
    }

    /// Pseudoexon path of one transcript, 5' to 3'.
    pub fn map_transcript(&self, record: &TranscriptRecord) -> Result<Vec<NodeId>, PathError> {
        record
            .exons_5p_to_3p()
            .into_iter()
            .map(|exon| {
                self.lookup(exon).ok_or_else(|| PathError::UnmappedExon {
                    transcript: record.name.clone(),
                    start: exon.start,
                    end: exon.end,
                })
            })
            .collect()
    }

    pub fn map_records(&self, records: &[TranscriptRecord]) -> Result<Vec<Vec<NodeId>>, PathError> {
        records.iter().map(|r| self.map_transcript(r)).collect()
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
            (0, 1000),
            (0, 1000),
            exons.iter().map(|&(s, e)| RefBlock::new(s, e)).collect(),
        )
    }

    fn scenario(strand: Strand) -> Vec<TranscriptRecord> {
        vec![
            rec("A", strand, &[(100, 200), (300, 400)]),
            rec("B", strand, &[(100, 200), (300, 350), (360, 400)]),
        ]
    }

    fn table(strand: Strand, records: &[TranscriptRecord]) -> PseudoexonTable {
        PseudoexonTable::build(&SlotTable::build("X", strand, records).unwrap())
    }

    #[test]
    fn multi_form_slot_gets_ranked_ids() {
        let pt = table(Strand::Plus, &scenario(Strand::Plus));
        let rows: Vec<String> = pt.nodes().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            rows,
            vec![
                "1\t1\t100\t200\t1",
                "2\t2.1.2\t300\t350\t2",
                "3\t2.1.4\t300\t400\t1",
                "4\t2.3.4\t360\t400\t1",
            ]
        );
    }

    #[test]
    fn transcripts_map_to_increasing_paths() {
        let recs = scenario(Strand::Plus);
        let pt = table(Strand::Plus, &recs);
        assert_eq!(pt.map_records(&recs).unwrap(), vec![vec![1, 3], vec![1, 2, 4]]);
    }

    #[test]
    fn minus_strand_mirrors_plus_numbering() {
        let plus = table(Strand::Plus, &scenario(Strand::Plus));
        let minus_recs = scenario(Strand::Minus);
        let minus = table(Strand::Minus, &minus_recs);

        let n = plus.len() as NodeId;
        assert_eq!(minus.len(), plus.len());
        for p in plus.nodes() {
            assert_eq!(minus.lookup(p.block), Some(n + 1 - p.index));
        }

        // ranks count from the high coordinate on the minus strand
        assert_eq!(minus.label(1), "1.2.1");
        assert_eq!(minus.label(3), "1.4.3");
        assert_eq!(minus.label(4), "2");
        assert_eq!(minus.map_records(&minus_recs).unwrap(), vec![vec![2, 4], vec![1, 3, 4]]);
    }

    #[test]
    fn unknown_exon_fails_loudly() {
        let recs = scenario(Strand::Plus);
        let pt = table(Strand::Plus, &recs);
        let stray = rec("Z", Strand::Plus, &[(100, 200), (310, 390)]);
        match pt.map_transcript(&stray) {
            Err(PathError::UnmappedExon { transcript, start, end }) => {
                assert_eq!((transcript.as_str(), start, end), ("Z", 310, 390));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(pt.get(0).is_none());
        assert_eq!(pt.label(99), "99");
    }
}
