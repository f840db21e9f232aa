use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::annotation::io::{ParseError, TableReader};
use crate::error::PathError;
use crate::model::gene::Gene;
use crate::model::transcript::TranscriptRecord;

/// All records parsed from one gene table, in file order.
#[derive(Debug, Clone, Default)]
pub struct GeneTable {
    records: Vec<TranscriptRecord>,
}

impl GeneTable {
    pub fn new(records: Vec<TranscriptRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TranscriptRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct gene symbols (`name2`) in first-seen order.
    pub fn gene_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.gene.as_str()) {
                out.push(&r.gene);
            }
        }
        out
    }

    /// Every record whose `name2` equals `name`.
    pub fn gene(&self, name: &str) -> Result<Gene, PathError> {
        let records: Vec<TranscriptRecord> = self
            .records
            .iter()
            .filter(|r| r.gene == name)
            .cloned()
            .collect();
        if records.is_empty() {
            return Err(PathError::GeneNotFound(name.to_string()));
        }
        Ok(Gene::new(name, records))
    }
}

/// Loads a UCSC gene table into a [`GeneTable`].
///
/// - parses the whole file (optionally gzipped)
/// - optionally keeps only the rows of one gene, which keeps memory flat on
///   genome-wide tables
#[derive(Debug, Clone, Default)]
pub struct AnnotationBuilder {
    pub only_gene: Option<String>,
}

impl AnnotationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only rows whose `name2` equals `gene`.
    pub fn only_gene(mut self, gene: &str) -> Self {
        self.only_gene = Some(gene.to_string());
        self
    }

    /// Build a table from anything implementing `BufRead`.
    ///
    /// Malformed rows are fatal, even for genes that are filtered out.
    pub fn build_from_reader<R: BufRead>(&self, reader: R) -> Result<GeneTable, ParseError> {
        let mut records = Vec::new();
        for rec in TableReader::new(reader).records() {
            let rec = rec?;
            if self.only_gene.as_deref().is_some_and(|g| g != rec.gene) {
                continue;
            }
            records.push(rec);
        }
        log::debug!("loaded {} transcript record(s)", records.len());
        Ok(GeneTable::new(records))
    }

    /// Build a table from a file path; `.gz` files are decompressed on the fly.
    pub fn build_from_path<P: AsRef<Path>>(&self, path: P) -> Result<GeneTable, ParseError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| ParseError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let is_gz = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

        if is_gz {
            let decoder = flate2::read::GzDecoder::new(file);
            self.build_from_reader(BufReader::new(decoder))
        } else {
            self.build_from_reader(BufReader::new(file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    const TABLE: &str = "\
name\tname2\tchrom\tstrand\ttxStart\ttxEnd\tcdsStart\tcdsEnd\texonCount\texonStarts\texonEnds
NM_1\tALPHA\tchr1\t+\t100\t400\t120\t380\t2\t100,300,\t200,400,
NM_2\tBETA\tchr2\t-\t10\t90\t20\t80\t2\t10,60,\t30,90,
NM_3\tALPHA\tchr1\t+\t100\t400\t150\t390\t3\t100,300,360,\t200,350,400,
";

    #[test]
    fn groups_records_by_gene_symbol() {
        let table = AnnotationBuilder::new()
            .build_from_reader(Cursor::new(TABLE))
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.gene_names(), vec!["ALPHA", "BETA"]);

        let alpha = table.gene("ALPHA").unwrap();
        let names: Vec<_> = alpha.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["NM_1", "NM_3"]);

        assert!(matches!(table.gene("GAMMA"), Err(PathError::GeneNotFound(_))));
    }

    #[test]
    fn only_gene_filter() {
        let table = AnnotationBuilder::new()
            .only_gene("BETA")
            .build_from_reader(Cursor::new(TABLE))
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].chrom, "chr2");
    }

    #[test]
    fn reads_gzipped_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refGene.txt.gz");

        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(TABLE.as_bytes()).unwrap();
        std::fs::write(&path, enc.finish().unwrap()).unwrap();

        let table = AnnotationBuilder::new().build_from_path(&path).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AnnotationBuilder::new()
            .build_from_path("/nonexistent/table.txt")
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/table.txt"));
    }
}
