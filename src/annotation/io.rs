use std::io::BufRead;

use crate::model::transcript::TranscriptRecord;
use crate::types::{RefBlock, Strand};

/// Columns every gene table must carry.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "name",
    "name2",
    "chrom",
    "strand",
    "txStart",
    "txEnd",
    "cdsStart",
    "cdsEnd",
    "exonStarts",
    "exonEnds",
];

/// Parsing errors for UCSC-style gene tables.
///
/// `line` is 1-based and counts every physical line, header included.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("I/O error while reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: header lacks required column '{column}'")]
    MissingColumn { line: usize, column: &'static str },

    #[error("line {line}: expected {expected} columns, found {found}")]
    MalformedLine {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: bad coordinates in column '{column}': {value}")]
    BadCoordinates {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: strand must be '+' or '-', got '{value}'")]
    BadStrand { line: usize, value: String },

    #[error("line {line}: exonCount is {declared} but {parsed} exons were listed")]
    ExonCountMismatch {
        line: usize,
        declared: usize,
        parsed: usize,
    },
}

/// Positions of the columns we read, resolved once from the header.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    width: usize,
    name: usize,
    name2: usize,
    chrom: usize,
    strand: usize,
    tx_start: usize,
    tx_end: usize,
    cds_start: usize,
    cds_end: usize,
    exon_count: Option<usize>,
    exon_starts: usize,
    exon_ends: usize,
}

impl ColumnIndex {
    /// Resolve column positions from a tab-separated header line.
    ///
    /// A leading `#` (UCSC table browser exports start with `#bin` or `#name`)
    /// is ignored.
    pub fn from_header(header: &str, line: usize) -> Result<Self, ParseError> {
        let header = header.strip_prefix('#').unwrap_or(header);
        let cols: Vec<&str> = header.split('\t').map(str::trim).collect();

        let find = |column: &'static str| -> Result<usize, ParseError> {
            cols.iter()
                .position(|c| *c == column)
                .ok_or(ParseError::MissingColumn { line, column })
        };

        Ok(Self {
            width: cols.len(),
            name: find(REQUIRED_COLUMNS[0])?,
            name2: find(REQUIRED_COLUMNS[1])?,
            chrom: find(REQUIRED_COLUMNS[2])?,
            strand: find(REQUIRED_COLUMNS[3])?,
            tx_start: find(REQUIRED_COLUMNS[4])?,
            tx_end: find(REQUIRED_COLUMNS[5])?,
            cds_start: find(REQUIRED_COLUMNS[6])?,
            cds_end: find(REQUIRED_COLUMNS[7])?,
            exon_count: cols.iter().position(|c| *c == "exonCount"),
            exon_starts: find(REQUIRED_COLUMNS[8])?,
            exon_ends: find(REQUIRED_COLUMNS[9])?,
        })
    }
}

/// Streaming reader for UCSC gene tables (refGene, knownGene, ncbiRefSeq...).
///
/// The first non-empty line must be the header. Most callers should go
/// through [`crate::annotation::AnnotationBuilder`] instead.
///
/// # Example
/// ```
/// use std::io::Cursor;
/// use splice_paths::annotation::io::TableReader;
///
/// let table = "name\tname2\tchrom\tstrand\ttxStart\ttxEnd\tcdsStart\tcdsEnd\texonCount\texonStarts\texonEnds\n\
/// NM_1\tG\tchr1\t+\t100\t400\t120\t380\t2\t100,300,\t200,400,\n";
///
/// let recs: Vec<_> = TableReader::new(Cursor::new(table))
///     .records()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(recs.len(), 1);
/// assert_eq!(recs[0].exons().len(), 2);
/// ```
pub struct TableReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    columns: Option<ColumnIndex>,
    failed: bool,
}

impl<R: BufRead> TableReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            columns: None,
            failed: false,
        }
    }

    /// Returns an iterator over parsed transcript records.
    ///
    /// - Skips blank lines
    /// - Skips comment lines starting with '#' after the header
    /// - Stops after the first header or I/O error
    pub fn records(mut self) -> impl Iterator<Item = Result<TranscriptRecord, ParseError>> {
        std::iter::from_fn(move || loop {
            if self.failed {
                return None;
            }

            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(ParseError::Io {
                        path: "<reader>".to_string(),
                        source: e,
                    }));
                }
            }

            let line = self.buf.trim_end_matches(&['\n', '\r'][..]);
            if line.trim().is_empty() {
                continue;
            }

            if self.columns.is_none() {
                match ColumnIndex::from_header(line, self.line_no) {
                    Ok(c) => {
                        self.columns = Some(c);
                        continue;
                    }
                    Err(e) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                }
            }

            if line.starts_with('#') {
                continue;
            }

            let columns = self.columns.as_ref()?;
            return Some(parse_record_line(line, columns, self.line_no));
        })
    }
}

/// Parse a single data row into a `TranscriptRecord`.
pub fn parse_record_line(
    line: &str,
    columns: &ColumnIndex,
    line_no: usize,
) -> Result<TranscriptRecord, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < columns.width {
        return Err(ParseError::MalformedLine {
            line: line_no,
            expected: columns.width,
            found: fields.len(),
        });
    }

    let coord = |idx: usize, column: &'static str| -> Result<u32, ParseError> {
        let raw = fields[idx].trim();
        raw.parse::<u32>().map_err(|_| ParseError::BadCoordinates {
            line: line_no,
            column,
            value: raw.to_string(),
        })
    };

    let strand_raw = fields[columns.strand].trim();
    let strand = Strand::from_symbol(strand_raw).ok_or_else(|| ParseError::BadStrand {
        line: line_no,
        value: strand_raw.to_string(),
    })?;

    let tx_start = coord(columns.tx_start, "txStart")?;
    let tx_end = coord(columns.tx_end, "txEnd")?;
    let cds_start = coord(columns.cds_start, "cdsStart")?;
    let cds_end = coord(columns.cds_end, "cdsEnd")?;

    let starts = parse_coord_list(fields[columns.exon_starts], "exonStarts", line_no)?;
    let ends = parse_coord_list(fields[columns.exon_ends], "exonEnds", line_no)?;

    if starts.len() != ends.len() {
        return Err(ParseError::BadCoordinates {
            line: line_no,
            column: "exonEnds",
            value: format!("{} starts vs {} ends", starts.len(), ends.len()),
        });
    }

    if let Some(idx) = columns.exon_count {
        let raw = fields[idx].trim();
        let declared: usize = raw.parse().map_err(|_| ParseError::BadCoordinates {
            line: line_no,
            column: "exonCount",
            value: raw.to_string(),
        })?;
        if declared != starts.len() {
            return Err(ParseError::ExonCountMismatch {
                line: line_no,
                declared,
                parsed: starts.len(),
            });
        }
    }

    let mut exons = Vec::with_capacity(starts.len());
    for (&s, &e) in starts.iter().zip(ends.iter()) {
        let block = RefBlock::try_new(s, e).ok_or_else(|| ParseError::BadCoordinates {
            line: line_no,
            column: "exonEnds",
            value: format!("exon [{},{}) is empty or inverted", s, e),
        })?;
        exons.push(block);
    }

    TranscriptRecord::try_new(
        fields[columns.name].trim(),
        fields[columns.name2].trim(),
        fields[columns.chrom].trim(),
        strand,
        (tx_start, tx_end),
        (cds_start, cds_end),
        exons,
    )
    .map_err(|e| ParseError::BadCoordinates {
        line: line_no,
        column: e.column(),
        value: e.to_string(),
    })
}

/// Parse a comma-separated integer list; a trailing comma is allowed.
pub fn parse_coord_list(
    raw: &str,
    column: &'static str,
    line_no: usize,
) -> Result<Vec<u32>, ParseError> {
    let raw = raw.trim();
    let raw = raw.strip_suffix(',').unwrap_or(raw);
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| ParseError::BadCoordinates {
                line: line_no,
                column,
                value: raw.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "#bin\tname\tchrom\tstrand\ttxStart\ttxEnd\tcdsStart\tcdsEnd\texonCount\texonStarts\texonEnds\tscore\tname2";

    fn table(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        s.push('\n');
        for r in rows {
            s.push_str(r);
            s.push('\n');
        }
        s
    }

    #[test]
    fn parses_ucsc_row_with_bin_header() {
        let data = table(&[
            "585\tNM_001\tchr1\t-\t1000\t2000\t1100\t1900\t3\t1000,1300,1800,\t1200,1500,2000,\t0\tGENE1",
        ]);
        let recs: Vec<_> = TableReader::new(Cursor::new(data))
            .records()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.name, "NM_001");
        assert_eq!(r.gene, "GENE1");
        assert_eq!(r.chrom, "chr1");
        assert_eq!(r.strand, Strand::Minus);
        assert_eq!(r.cds, (1100, 1900));
        assert_eq!(
            r.exons(),
            &[
                RefBlock::new(1000, 1200),
                RefBlock::new(1300, 1500),
                RefBlock::new(1800, 2000)
            ]
        );
    }

    #[test]
    fn coord_list_without_trailing_comma() {
        assert_eq!(parse_coord_list("1,2,3", "exonStarts", 1).unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_coord_list("1,2,3,", "exonStarts", 1).unwrap(), vec![1, 2, 3]);
        assert!(parse_coord_list("1,x,", "exonStarts", 7).is_err());
    }

    #[test]
    fn missing_column_is_fatal() {
        let data = "name\tchrom\tstrand\n";
        let mut it = TableReader::new(Cursor::new(data)).records();
        match it.next() {
            Some(Err(ParseError::MissingColumn { line, column })) => {
                assert_eq!(line, 1);
                assert_eq!(column, "name2");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn exon_count_must_match() {
        let data = table(&["0\tNM_1\tchr1\t+\t0\t50\t0\t50\t3\t0,20,\t10,50,\t0\tG"]);
        let err = TableReader::new(Cursor::new(data))
            .records()
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::ExonCountMismatch { line: 2, declared: 3, parsed: 2 }
        ));
    }

    #[test]
    fn rejects_bad_strand_and_short_rows() {
        let data = table(&[
            "0\tNM_1\tchr1\t.\t0\t50\t0\t50\t1\t0,\t50,\t0\tG",
            "0\tNM_2\tchr1\t+\t0",
        ]);
        let recs: Vec<_> = TableReader::new(Cursor::new(data)).records().collect();
        assert!(matches!(recs[0], Err(ParseError::BadStrand { line: 2, .. })));
        assert!(matches!(
            recs[1],
            Err(ParseError::MalformedLine { line: 3, expected: 13, found: 5 })
        ));
    }

    #[test]
    fn inverted_exon_is_rejected() {
        let data = table(&["0\tNM_1\tchr1\t+\t0\t50\t0\t50\t1\t40,\t10,\t0\tG"]);
        let first = TableReader::new(Cursor::new(data)).records().next().unwrap();
        assert!(matches!(first, Err(ParseError::BadCoordinates { line: 2, .. })));
    }

    #[test]
    fn repeated_exon_is_rejected() {
        let data = table(&[
            "0\tNM_1\tchr1\t+\t100\t400\t100\t400\t3\t100,100,300,\t200,200,400,\t0\tG",
        ]);
        let first = TableReader::new(Cursor::new(data)).records().next().unwrap();
        match first {
            Err(ParseError::BadCoordinates { line, column, value }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "exonStarts");
                assert!(value.contains("[100,200]"), "{value}");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn overlapping_exons_are_rejected() {
        let data = table(&[
            "0\tNM_1\tchr1\t-\t100\t400\t100\t400\t3\t100,150,300,\t200,250,400,\t0\tG",
            "0\tNM_2\tchr1\t-\t100\t400\t100\t400\t2\t100,300,\t200,400,\t0\tG",
        ]);
        let recs: Vec<_> = TableReader::new(Cursor::new(data)).records().collect();
        assert!(matches!(
            recs[0],
            Err(ParseError::BadCoordinates { line: 2, column: "exonStarts", .. })
        ));
        assert!(recs[1].is_ok());
    }

    #[test]
    fn inverted_cds_is_rejected() {
        let data = table(&["0\tNM_1\tchr1\t+\t0\t50\t40\t10\t1\t0,\t50,\t0\tG"]);
        let first = TableReader::new(Cursor::new(data)).records().next().unwrap();
        assert!(matches!(
            first,
            Err(ParseError::BadCoordinates { line: 2, column: "cdsEnd", .. })
        ));
    }

    #[test]
    fn comment_and_blank_lines_are_skipped() {
        let data = format!(
            "{}\n\n# note\n0\tNM_1\tchr1\t+\t0\t50\t0\t50\t1\t0,\t50,\t0\tG\n",
            HEADER
        );
        let recs: Vec<_> = TableReader::new(Cursor::new(data))
            .records()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(recs.len(), 1);
    }
}
