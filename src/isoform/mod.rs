//! Isoform-path enumeration: canonical slots -> pseudoexons -> graph ->
//! every simple path between observed transcript endpoints.

pub mod graph;
pub mod options;
pub mod paths;
pub mod pseudoexon;
pub mod slots;

pub use graph::PathGraph;
pub use options::AnalysisOptions;
pub use paths::{
    analyze_gene, simple_paths, EnumeratedPath, IsoformPaths, PathDetail, PathRecord, PathTag,
};
pub use pseudoexon::PseudoexonTable;
pub use slots::SlotTable;
