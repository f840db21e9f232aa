//! Genomic <-> mature-transcript coordinate conversion.
//!
//! Transcript offsets are 0-based from the 5' end of the spliced transcript.

use crate::model::transcript::TranscriptRecord;

impl TranscriptRecord {
    /// Offset of genomic position `pos` in the spliced transcript, or `None`
    /// if `pos` is intronic or outside the transcript.
    pub fn genomic_to_transcript(&self, pos: u32) -> Option<u32> {
        let reverse = self.strand.is_reverse();
        let mut acc = 0u32;
        for exon in self.exons_5p_to_3p() {
            if exon.contains_pos(pos) {
                let within = if reverse {
                    exon.end - 1 - pos
                } else {
                    pos - exon.start
                };
                return Some(acc + within);
            }
            acc += exon.len();
        }
        None
    }

    /// Genomic position of transcript offset `offset`, or `None` past the
    /// 3' end.
    pub fn transcript_to_genomic(&self, offset: u32) -> Option<u32> {
        let reverse = self.strand.is_reverse();
        let mut acc = 0u32;
        for exon in self.exons_5p_to_3p() {
            if offset < acc + exon.len() {
                let within = offset - acc;
                return Some(if reverse {
                    exon.end - 1 - within
                } else {
                    exon.start + within
                });
            }
            acc += exon.len();
        }
        None
    }

    /// CDS as a half-open transcript interval. `None` for non-coding or
    /// inverted CDS bounds, or when a boundary falls outside the exons.
    pub fn cds_transcript_range(&self) -> Option<(u32, u32)> {
        let (lo, hi) = self.cds;
        if lo >= hi {
            return None;
        }
        let (first, last) = if self.strand.is_reverse() {
            (hi - 1, lo)
        } else {
            (lo, hi - 1)
        };
        Some((
            self.genomic_to_transcript(first)?,
            self.genomic_to_transcript(last)? + 1,
        ))
    }
}
