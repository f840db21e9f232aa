use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::Level;

use splice_paths::isoform::{PseudoexonTable, SlotTable};
use splice_paths::{
    analyze_gene, write_bed_dirs, AnalysisOptions, AnnotationBuilder, Gene, IsoformPaths,
    PathError, PreparedGene,
};

/// Enumerate splice-isoform paths of one gene from a UCSC gene table.
#[derive(Parser, Debug)]
#[command(name = "splice-paths")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every isoform path ('*' marks known transcripts)
    Paths(GeneArgs),

    /// Write one BED file per path into <gene>bed<N>/ and <gene>bedinfo<N>/
    Bed(GeneArgs),

    /// Print the canonical exon slots and pseudoexons
    Slots(GeneArgs),
}

#[derive(Args, Debug)]
struct GeneArgs {
    /// UCSC gene table (.txt or .txt.gz) with a header line
    #[arg(long, short)]
    table: PathBuf,

    /// Gene symbol as found in the name2 column
    #[arg(long, short)]
    gene: String,
}

fn load_gene(args: &GeneArgs) -> Result<Gene> {
    let table = AnnotationBuilder::new()
        .only_gene(&args.gene)
        .build_from_path(&args.table)
        .with_context(|| format!("reading gene table {}", args.table.display()))?;
    Ok(table.gene(&args.gene)?)
}

/// Runs the analysis; unsupported genes are reported and yield `None`.
fn analyze(args: &GeneArgs, options: &AnalysisOptions) -> Result<Option<IsoformPaths>> {
    let gene = load_gene(args)?;
    match analyze_gene(&gene, options) {
        Ok(res) => Ok(Some(res)),
        Err(e @ (PathError::MixedStrand { .. } | PathError::NoProducibleGraph { .. })) => {
            log::warn!("{e}");
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("analysing gene {}", args.gene)),
    }
}

fn print_slots(args: &GeneArgs, options: &AnalysisOptions) -> Result<()> {
    let PreparedGene { strand, gene, .. } = load_gene(args)?.prepare(options)?;

    let slots = SlotTable::build(&gene.name, strand, gene.records())?;
    println!("exon\tlb\tub\tstarts\tends\t#");
    for slot in slots.slots() {
        println!("{slot}");
    }

    println!();
    println!("pseudoexon\texon\tstart\tend\tframe");
    for p in PseudoexonTable::build(&slots).nodes() {
        println!("{p}");
    }
    Ok(())
}

fn main() -> Result<()> {
    simple_logger::init_with_level(Level::Info)?;
    let cli = Cli::parse();
    let options = AnalysisOptions::default();

    match cli.cmd {
        Command::Paths(args) => {
            if let Some(res) = analyze(&args, &options)? {
                println!("{res}");
            }
        }

        Command::Bed(args) => {
            if let Some(res) = analyze(&args, &options)? {
                let (bed_dir, info_dir) = write_bed_dirs(&res, ".", options.bed_order)
                    .with_context(|| format!("writing BED files for {}", args.gene))?;
                eprintln!("BED files written to {} and {}", bed_dir.display(), info_dir.display());
            }
        }

        Command::Slots(args) => print_slots(&args, &options)?,
    }

    Ok(())
}
