use clap::Parser;
use gffcheck::{
    read_annotation_lines, render_errors, render_sorted, to_feature_table, validate_sequence,
    write_text, FastaSequence, TypeHierarchy, ValidatorOptions,
};
use peak_alloc::PeakAlloc;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// gffcheck: validate and sort a GFF3 gene annotation against its genome sequence
#[derive(Parser)]
#[command(name = "gffcheck")]
#[command(about = "Validate and sort a GFF3 gene annotation against its genome sequence")]
#[command(version)]
struct Args {
    /// Input GFF3 annotation file (plain or gzipped)
    #[arg(short = 'g', long = "gff", value_name = "FILE")]
    gff_file: PathBuf,

    /// Input genome FASTA file with a single sequence (plain or gzipped)
    #[arg(short = 'f', long = "fasta", value_name = "FILE")]
    fasta_file: PathBuf,

    /// Output error report; printed to stdout if not given
    #[arg(short = 'e', long = "errors", value_name = "FILE")]
    errors_file: Option<PathBuf>,

    /// Output sorted annotation file
    #[arg(short = 's', long = "sorted", value_name = "FILE")]
    sorted_file: Option<PathBuf>,

    /// Output feature table of the sorted lines
    #[arg(long = "feature-table", value_name = "FILE")]
    feature_table_file: Option<PathBuf>,

    /// Comma separated type hierarchy, top level first
    #[arg(short = 't', long = "types", value_name = "TYPES", default_value = "gene,mRNA,exon")]
    types: TypeHierarchy,

    /// Echo the offending line above each entry of the error report
    #[arg(long = "include-lines")]
    include_lines: bool,

    /// Require the start coordinate to be strictly less than the end coordinate
    #[arg(long = "strict-coordinates")]
    strict_coordinates: bool,

    /// Report attribute entries other than ID, Name and Parent as errors instead of warnings
    #[arg(long = "strict-attributes")]
    strict_attributes: bool,

    /// Verbose output (shows debug info)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "gffcheck=debug"
    } else {
        "gffcheck=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let options = ValidatorOptions::new(
        args.types.clone(),
        args.include_lines,
        args.strict_coordinates.into(),
        args.strict_attributes.into(),
    );
    info!("Validating {:?} with types {}", args.gff_file, options.type_hierarchy);

    let lines = read_annotation_lines(&args.gff_file)?;
    let fasta = FastaSequence::from_path(&args.fasta_file)?;

    let report = match validate_sequence(&lines, &fasta, &options) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            if let Some(p) = &args.errors_file {
                write_text(p, &format!("{}\n", e))?;
            }
            return Err(e);
        }
    };

    let error_text = render_errors(&report.errors, options.include_original_lines);
    match &args.errors_file {
        Some(p) => write_text(p, &error_text)?,
        None => print!("{}", error_text),
    }
    if let Some(p) = &args.sorted_file {
        write_text(p, &render_sorted(&report))?;
    }
    if let Some(p) = &args.feature_table_file {
        write_text(p, &to_feature_table(&report.sorted))?;
    }

    info!(
        "Found {} errors and {} warnings in {:?}",
        report.num_errors(),
        report.num_warnings(),
        start.elapsed()
    );
    debug!(
        "Peak Memory usage was {} MB",
        PEAK_ALLOC.peak_usage_as_mb()
    );
    Ok(())
}
