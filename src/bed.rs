//! BED output for enumerated isoform paths.
//!
//! Every path is rendered into its own [`PathBed`] value; nothing is
//! accumulated across paths.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::isoform::paths::{EnumeratedPath, IsoformPaths, PathTag};
use crate::types::Strand;

/// Line order of a path's BED file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BedOrder {
    /// 5' to 3': descending coordinates on the minus strand.
    Transcript,
    /// Ascending start on both strands.
    #[default]
    Genomic,
}

/// One BED6 line; the score column is a `0` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedLine {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub name: String,
    pub strand: Strand,
}

impl fmt::Display for BedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t0\t{}",
            self.chrom, self.start, self.end, self.name, self.strand
        )
    }
}

/// BED lines of one path plus, for observed paths, its info line
/// (`transcript  cdsStart  cdsEnd`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBed {
    pub lines: Vec<BedLine>,
    pub info: Option<String>,
}

impl PathBed {
    pub fn bed_text(&self) -> String {
        self.lines.iter().map(|l| format!("{l}\n")).collect()
    }
}

pub fn path_bed(result: &IsoformPaths, path: &EnumeratedPath, order: BedOrder) -> PathBed {
    let mut blocks = result.blocks(path);
    if order == BedOrder::Genomic {
        blocks.sort_unstable();
    }

    let lines = blocks
        .into_iter()
        .map(|b| BedLine {
            chrom: result.chrom.clone(),
            start: b.start,
            end: b.end,
            name: result.gene.clone(),
            strand: result.strand,
        })
        .collect();

    let info = match &path.tag {
        PathTag::Observed { transcript, cds } => {
            Some(format!("{}\t{}\t{}\n", transcript, cds.0, cds.1))
        }
        PathTag::Synthetic => None,
    };

    PathBed { lines, info }
}

/// First `N >= 1` such that `{gene}bed{N}` does not exist under `root`.
pub fn next_run_number(root: &Path, gene: &str) -> usize {
    let mut n = 1;
    while root.join(format!("{gene}bed{n}")).exists() {
        n += 1;
    }
    n
}

/// Write one BED file per path into `{gene}bed{N}/` and one info file per
/// observed path into `{gene}bedinfo{N}/`, never overwriting earlier runs.
///
/// Files are numbered by path position (`{gene}_bed_{k}.txt`,
/// `{gene}_info_{k}.txt`, k from 1). Returns both directories.
pub fn write_bed_dirs(
    result: &IsoformPaths,
    root: impl AsRef<Path>,
    order: BedOrder,
) -> Result<(PathBuf, PathBuf)> {
    let root = root.as_ref();
    let gene = &result.gene;
    let n = next_run_number(root, gene);

    let bed_dir = root.join(format!("{gene}bed{n}"));
    let info_dir = root.join(format!("{gene}bedinfo{n}"));
    fs::create_dir_all(&bed_dir).with_context(|| format!("create {}", bed_dir.display()))?;
    fs::create_dir_all(&info_dir).with_context(|| format!("create {}", info_dir.display()))?;

    for (k, path) in result.paths().iter().enumerate() {
        let k = k + 1;
        let bed = path_bed(result, path, order);

        let bed_file = bed_dir.join(format!("{gene}_bed_{k}.txt"));
        fs::write(&bed_file, bed.bed_text())
            .with_context(|| format!("write {}", bed_file.display()))?;

        if let Some(info) = &bed.info {
            let info_file = info_dir.join(format!("{gene}_info_{k}.txt"));
            fs::write(&info_file, info)
                .with_context(|| format!("write {}", info_file.display()))?;
        }
    }

    log::info!(
        "{}: wrote {} BED file(s) to {}",
        gene,
        result.paths().len(),
        bed_dir.display()
    );

    Ok((bed_dir, info_dir))
}
