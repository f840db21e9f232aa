use std::collections::BTreeSet;

use crate::error::PathError;
use crate::isoform::options::AnalysisOptions;
use crate::model::transcript::TranscriptRecord;
use crate::types::Strand;

/// A gene on one strand and chromosome, filtered for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedGene {
    pub strand: Strand,
    pub chrom: String,
    pub gene: Gene,
}

/// All transcript records sharing one gene symbol (`name2`), in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    pub name: String,
    records: Vec<TranscriptRecord>,
}

impl Gene {
    pub fn new(name: impl Into<String>, records: Vec<TranscriptRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn records(&self) -> &[TranscriptRecord] {
        &self.records
    }

    /// Distinct strands, sorted.
    pub fn strands(&self) -> Vec<Strand> {
        let set: BTreeSet<Strand> = self.records.iter().map(|r| r.strand).collect();
        set.into_iter().collect()
    }

    /// Split into one gene per strand (plus first), keeping table order.
    pub fn split_by_strand(&self) -> Vec<Gene> {
        self.strands()
            .into_iter()
            .map(|s| {
                let records = self
                    .records
                    .iter()
                    .filter(|r| r.strand == s)
                    .cloned()
                    .collect();
                Gene::new(self.name.clone(), records)
            })
            .collect()
    }

    /// The single strand and chromosome shared by every record.
    ///
    /// Genes annotated on both strands or several chromosomes are rejected.
    pub fn locus(&self) -> Result<(Strand, &str), PathError> {
        let Some(first) = self.records.first() else {
            return Err(PathError::NoTranscripts(self.name.clone()));
        };

        if self.records.iter().any(|r| r.strand != first.strand) {
            return Err(PathError::MixedStrand {
                gene: self.name.clone(),
            });
        }

        let chroms: BTreeSet<&str> = self.records.iter().map(|r| r.chrom.as_str()).collect();
        if chroms.len() > 1 {
            return Err(PathError::MixedChromosome {
                gene: self.name.clone(),
                chroms: chroms.into_iter().map(str::to_string).collect(),
            });
        }

        Ok((first.strand, first.chrom.as_str()))
    }

    /// Checks the locus and applies the record filters of `options`.
    ///
    /// Fails with `MixedStrand`/`MixedChromosome`, or `NoTranscripts` when the
    /// filters leave nothing.
    pub fn prepare(&self, options: &AnalysisOptions) -> Result<PreparedGene, PathError> {
        let (strand, chrom) = self.locus()?;

        let gene = if options.coding_only {
            let coding = self.coding_only();
            let dropped = self.records.len() - coding.records.len();
            if dropped > 0 {
                log::warn!("{}: excluded {} non-coding transcript(s)", self.name, dropped);
            }
            coding
        } else {
            self.clone()
        };
        if gene.records.is_empty() {
            return Err(PathError::NoTranscripts(self.name.clone()));
        }

        Ok(PreparedGene {
            strand,
            chrom: chrom.to_string(),
            gene,
        })
    }

    /// Copy of this gene without non-coding records (`cdsStart == cdsEnd`).
    pub fn coding_only(&self) -> Gene {
        Gene::new(
            self.name.clone(),
            self.records.iter().filter(|r| r.is_coding()).cloned().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RefBlock;

    fn rec(name: &str, chrom: &str, strand: Strand, cds: (u32, u32)) -> TranscriptRecord {
        TranscriptRecord::new(
            name,
            "G",
            chrom,
            strand,
            (0, 100),
            cds,
            vec![RefBlock::new(0, 40), RefBlock::new(60, 100)],
        )
    }

    #[test]
    fn mixed_strand_is_rejected() {
        let g = Gene::new(
            "G",
            vec![
                rec("a", "chr1", Strand::Plus, (0, 90)),
                rec("b", "chr1", Strand::Minus, (0, 90)),
            ],
        );
        assert!(matches!(g.locus(), Err(PathError::MixedStrand { .. })));

        let parts = g.split_by_strand();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].records()[0].name, "a");
        assert_eq!(parts[1].records()[0].name, "b");
        assert!(parts[1].locus().is_ok());
    }

    #[test]
    fn mixed_chromosome_is_rejected() {
        let g = Gene::new(
            "G",
            vec![
                rec("a", "chr1", Strand::Plus, (0, 90)),
                rec("b", "chrX", Strand::Plus, (0, 90)),
            ],
        );
        match g.locus() {
            Err(PathError::MixedChromosome { chroms, .. }) => {
                assert_eq!(chroms, vec!["chr1".to_string(), "chrX".to_string()])
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn coding_filter_keeps_table_order() {
        let g = Gene::new(
            "G",
            vec![
                rec("a", "chr1", Strand::Plus, (10, 90)),
                rec("nc", "chr1", Strand::Plus, (100, 100)),
                rec("b", "chr1", Strand::Plus, (10, 80)),
            ],
        );
        let names: Vec<_> = g.coding_only().records().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn prepare_filters_and_reports_empty_genes() {
        let g = Gene::new(
            "G",
            vec![
                rec("nc", "chr2", Strand::Minus, (100, 100)),
                rec("a", "chr2", Strand::Minus, (10, 90)),
            ],
        );
        let prepared = g.prepare(&AnalysisOptions::default()).unwrap();
        assert_eq!((prepared.strand, prepared.chrom.as_str()), (Strand::Minus, "chr2"));
        assert_eq!(prepared.gene.records().len(), 1);
        assert_eq!(prepared.gene.records()[0].name, "a");

        let all = g.prepare(&AnalysisOptions::new().coding_only(false)).unwrap();
        assert_eq!(all.gene, g);

        let nc_only = Gene::new("G", vec![rec("nc", "chr2", Strand::Plus, (100, 100))]);
        assert!(matches!(
            nc_only.prepare(&AnalysisOptions::default()),
            Err(PathError::NoTranscripts(name)) if name == "G"
        ));
    }
}
