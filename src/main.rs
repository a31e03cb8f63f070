use anyhow::Result;
use catalog_engine::error::CatalogError;
use catalog_engine::{loader, report, CatalogEngine, Taxonomy};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "catalog-engine")]
#[command(about = "Consolidates marketplace listing exports into a sales catalog")]
struct Args {
    /// Directory containing the per-region listing exports
    #[arg(short, long, default_value = "marketplace_data")]
    data_dir: PathBuf,

    /// Taxonomy configuration file (built-in deployment when omitted)
    #[arg(short, long)]
    taxonomy: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long, default_value = "oracle_marketplace_sales_catalog.csv")]
    output: PathBuf,

    /// Text summary report path
    #[arg(long, default_value = "oracle_marketplace_sales_summary.txt")]
    summary: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let taxonomy = match &args.taxonomy {
        Some(path) => Taxonomy::load(path)?,
        None => Taxonomy::default(),
    };

    info!("Loading marketplace data from all regions...");
    let (region_records, total) = loader::load_regions(&args.data_dir, &taxonomy.regions)?;

    let engine = CatalogEngine::new(taxonomy);
    let mut rows = match engine.process(&region_records) {
        Ok(rows) => rows,
        Err(CatalogError::EmptyBatch) => {
            eprintln!("No marketplace data found in any region ({} records loaded).", total);
            eprintln!("Run the extraction script and check CLI access to government regions.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    report::sort_rows(&mut rows);
    report::write_csv(&rows, &args.output)?;
    let summary = report::Summary::from_rows(&rows);
    summary.write(&args.summary)?;

    info!("Processing complete");
    println!("Catalog: {}", args.output.display());
    println!("Summary: {}", args.summary.display());
    println!("Total products: {}", summary.total);
    println!("Government products: {}", summary.us_gov);
    println!("DoD products: {}", summary.us_dod);

    Ok(())
}
