use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::PathError;
use crate::isoform::graph::PathGraph;
use crate::isoform::options::AnalysisOptions;
use crate::isoform::pseudoexon::PseudoexonTable;
use crate::isoform::slots::SlotTable;
use crate::model::gene::{Gene, PreparedGene};
use crate::model::types::NodeId;
use crate::stats;
use crate::types::{RefBlock, Strand};

/// Whether an enumerated path is a known transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTag {
    /// Same pseudoexon sequence as `transcript` (first in table order).
    Observed { transcript: String, cds: (u32, u32) },
    /// Structurally valid recombination with no matching transcript.
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedPath {
    pub nodes: Vec<NodeId>,
    pub tag: PathTag,
}

impl EnumeratedPath {
    pub fn is_observed(&self) -> bool {
        matches!(self.tag, PathTag::Observed { .. })
    }

    pub fn transcript(&self) -> Option<&str> {
        match &self.tag {
            PathTag::Observed { transcript, .. } => Some(transcript),
            PathTag::Synthetic => None,
        }
    }

    /// `*` for observed paths, a blank for synthetic ones.
    pub fn marker(&self) -> char {
        if self.is_observed() {
            '*'
        } else {
            ' '
        }
    }
}

/// Every simple path from `source` to `sink`, visiting successors in
/// ascending order.
///
/// `max_depth` caps the number of nodes in a path. A path from a node to
/// itself is never reported.
pub fn simple_paths(
    graph: &PathGraph,
    source: NodeId,
    sink: NodeId,
    max_depth: Option<usize>,
) -> Vec<Vec<NodeId>> {
    let mut out = Vec::new();
    if source == sink {
        return out;
    }

    let mut walk = Walk {
        graph,
        sink,
        max_depth: max_depth.unwrap_or(usize::MAX),
        stack: Vec::new(),
        on_path: BTreeSet::new(),
        out: &mut out,
    };
    walk.visit(source);
    out
}

struct Walk<'a> {
    graph: &'a PathGraph,
    sink: NodeId,
    max_depth: usize,
    stack: Vec<NodeId>,
    on_path: BTreeSet<NodeId>,
    out: &'a mut Vec<Vec<NodeId>>,
}

impl Walk<'_> {
    fn visit(&mut self, node: NodeId) {
        self.stack.push(node);
        self.on_path.insert(node);

        if node == self.sink {
            self.out.push(self.stack.clone());
        } else if self.stack.len() < self.max_depth {
            let next: Vec<NodeId> = self.graph.successors(node).collect();
            for n in next {
                if !self.on_path.contains(&n) {
                    self.visit(n);
                }
            }
        }

        self.on_path.remove(&node);
        self.stack.pop();
    }
}

/// How a path is spelled in output records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathDetail {
    /// Composite pseudoexon ids (`1`, `2.1.4`, ...).
    Ids(Vec<String>),
    /// Genomic `[start,end]` per pseudoexon.
    Coords(Vec<RefBlock>),
}

/// Flat output row for one enumerated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    pub gene: String,
    pub strand: Strand,
    pub chrom: String,
    pub transcript: Option<String>,
    pub detail: PathDetail,
    pub cds: Option<(u32, u32)>,
}

/// `gene  strand  chrom  transcript|blank  detail...  [cdsStart  cdsEnd]`
impl fmt::Display for PathRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.gene,
            self.strand,
            self.chrom,
            self.transcript.as_deref().unwrap_or(" ")
        )?;
        match &self.detail {
            PathDetail::Ids(ids) => {
                for id in ids {
                    write!(f, "\t{id}")?;
                }
            }
            PathDetail::Coords(blocks) => {
                for b in blocks {
                    write!(f, "\t{b}")?;
                }
            }
        }
        if let Some((s, e)) = self.cds {
            write!(f, "\t{s}\t{e}")?;
        }
        Ok(())
    }
}

/// Result of analysing one gene: the derived tables, the graph and every
/// enumerated isoform path.
#[derive(Debug, Clone)]
pub struct IsoformPaths {
    pub gene: String,
    pub strand: Strand,
    pub chrom: String,
    slots: SlotTable,
    pseudoexons: PseudoexonTable,
    transcript_paths: Vec<(String, Vec<NodeId>)>,
    graph: PathGraph,
    paths: Vec<EnumeratedPath>,
}

/// Run the whole pipeline for one gene.
///
/// Workflow:
/// 1) reject mixed-strand / mixed-chromosome genes
/// 2) drop non-coding records (if configured)
/// 3) canonical slots -> pseudoexons -> per-transcript paths
/// 4) graph over transcripts with two or more pseudoexons
/// 5) enumerate simple paths for every `(min, max)` pair and tag them
pub fn analyze_gene(gene: &Gene, options: &AnalysisOptions) -> Result<IsoformPaths, PathError> {
    let PreparedGene {
        strand,
        chrom,
        gene,
    } = gene.prepare(options)?;

    let slots = SlotTable::build(&gene.name, strand, gene.records())?;
    let pseudoexons = PseudoexonTable::build(&slots);
    let node_paths = pseudoexons.map_records(gene.records())?;

    log::info!(
        "{} ({}): {} transcript(s), {} slot(s), {} pseudoexon(s)",
        gene.name,
        strand,
        gene.records().len(),
        slots.len(),
        pseudoexons.len()
    );

    let graph = PathGraph::from_paths(node_paths.iter().map(Vec::as_slice));
    if graph.is_empty() {
        return Err(PathError::NoProducibleGraph {
            gene: gene.name.clone(),
            strand,
        });
    }

    let single: Vec<&str> = gene
        .records()
        .iter()
        .zip(&node_paths)
        .filter(|(_, p)| p.len() < 2)
        .map(|(r, _)| r.name.as_str())
        .collect();
    if !single.is_empty() {
        log::warn!(
            "{}: {} single-pseudoexon transcript(s) left out of the graph: {}",
            gene.name,
            single.len(),
            single.join(", ")
        );
    }

    let mut known: HashMap<&[NodeId], usize> = HashMap::new();
    for (i, p) in node_paths.iter().enumerate() {
        known.entry(p.as_slice()).or_insert(i);
    }

    let mut paths = Vec::new();
    for &(source, sink) in graph.endpoints() {
        for nodes in simple_paths(&graph, source, sink, options.max_depth) {
            let tag = match known.get(nodes.as_slice()) {
                Some(&i) => {
                    let rec = &gene.records()[i];
                    PathTag::Observed {
                        transcript: rec.name.clone(),
                        cds: rec.cds,
                    }
                }
                None => PathTag::Synthetic,
            };
            paths.push(EnumeratedPath { nodes, tag });
        }
    }

    let observed = paths.iter().filter(|p| p.is_observed()).count();
    log::info!(
        "{}: {} path(s) over {} source/sink pair(s), {} observed, {} synthetic",
        gene.name,
        paths.len(),
        graph.endpoints().len(),
        observed,
        paths.len() - observed
    );

    let transcript_paths = gene
        .records()
        .iter()
        .map(|r| r.name.clone())
        .zip(node_paths)
        .collect();

    Ok(IsoformPaths {
        gene: gene.name.clone(),
        strand,
        chrom,
        slots,
        pseudoexons,
        transcript_paths,
        graph,
        paths,
    })
}

impl IsoformPaths {
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn pseudoexons(&self) -> &PseudoexonTable {
        &self.pseudoexons
    }

    pub fn graph(&self) -> &PathGraph {
        &self.graph
    }

    /// `(transcript name, pseudoexon path)` for every analysed record.
    pub fn transcript_paths(&self) -> &[(String, Vec<NodeId>)] {
        &self.transcript_paths
    }

    /// Transcripts with fewer than two pseudoexons; they add no edges and
    /// never appear among the enumerated paths.
    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.transcript_paths
            .iter()
            .filter(|(_, p)| p.len() < 2)
            .map(|(name, _)| name.as_str())
    }

    pub fn paths(&self) -> &[EnumeratedPath] {
        &self.paths
    }

    pub fn observed(&self) -> impl Iterator<Item = &EnumeratedPath> {
        self.paths.iter().filter(|p| p.is_observed())
    }

    pub fn synthetic(&self) -> impl Iterator<Item = &EnumeratedPath> {
        self.paths.iter().filter(|p| !p.is_observed())
    }

    /// Genomic intervals of a path, 5' to 3'.
    pub fn blocks(&self, path: &EnumeratedPath) -> Vec<RefBlock> {
        path.nodes
            .iter()
            .filter_map(|&n| self.pseudoexons.get(n).map(|p| p.block))
            .collect()
    }

    pub fn labels(&self, path: &EnumeratedPath) -> Vec<String> {
        path.nodes.iter().map(|&n| self.pseudoexons.label(n)).collect()
    }

    /// Output row for one path; `detail` switches ids for coordinates.
    pub fn record(&self, path: &EnumeratedPath, detail: bool) -> PathRecord {
        let (transcript, cds) = match &path.tag {
            PathTag::Observed { transcript, cds } => (Some(transcript.clone()), Some(*cds)),
            PathTag::Synthetic => (None, None),
        };
        PathRecord {
            gene: self.gene.clone(),
            strand: self.strand,
            chrom: self.chrom.clone(),
            transcript,
            detail: if detail {
                PathDetail::Coords(self.blocks(path))
            } else {
                PathDetail::Ids(self.labels(path))
            },
            cds,
        }
    }

    pub fn records(&self, detail: bool) -> Vec<PathRecord> {
        self.paths.iter().map(|p| self.record(p, detail)).collect()
    }

    /// Combined reading-frame remainder of a path.
    pub fn frame(&self, path: &EnumeratedPath) -> u8 {
        let len: u64 = self.blocks(path).iter().map(|b| b.len() as u64).sum();
        (len % 3) as u8
    }

    /// Inclusion flags of `node` across the observed isoforms.
    fn inclusion(&self, node: NodeId) -> Vec<bool> {
        self.observed().map(|p| p.nodes.contains(&node)).collect()
    }

    /// Entropy (bits) of including `node` across observed isoforms.
    pub fn inclusion_entropy(&self, node: NodeId) -> f64 {
        let flags = self.inclusion(node);
        let inc = flags.iter().filter(|&&f| f).count();
        stats::entropy(&[inc, flags.len() - inc])
    }

    /// Mutual information (bits) between the inclusion of two pseudoexons
    /// across observed isoforms.
    pub fn inclusion_mutual_information(&self, a: NodeId, b: NodeId) -> f64 {
        let pairs: Vec<(bool, bool)> = self
            .inclusion(a)
            .into_iter()
            .zip(self.inclusion(b))
            .collect();
        stats::mutual_information(&pairs)
    }
}

/// Human-readable listing: `*` marks observed paths.
impl fmt::Display for IsoformPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strand Direction: {}", self.strand)?;
        for p in &self.paths {
            writeln!(f, "{} {}", p.marker(), self.labels(p).join(" | "))?;
        }
        write!(f, "{} Total Paths", self.paths.len())
    }
}
