use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use intranet_graph::{
    book_totals, debtors, snapshot, Account, AccountBook, BuildOptions, BuildPass, Dataset,
    LedgerLine, Party, VERSION,
};

struct Args {
    dataset: PathBuf,
    options: Option<PathBuf>,
    status_date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args(env::args().skip(1))?;
    run(args)
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args> {
    let mut dataset = None;
    let mut options = None;
    let mut status_date = None;

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--options" => {
                let path = raw.next().context("--options needs a file")?;
                options = Some(PathBuf::from(path));
            }
            "--status" => {
                let value = raw.next().context("--status needs a date (YYYY-MM-DD)")?;
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .with_context(|| format!("Invalid status date: {}", value))?;
                status_date = Some(date);
            }
            _ if dataset.is_none() => dataset = Some(PathBuf::from(arg)),
            _ => bail!("Unexpected argument: {}", arg),
        }
    }

    let Some(dataset) = dataset else {
        bail!("Usage: intranet-graph <dataset.json> [--options <file>] [--status YYYY-MM-DD]");
    };

    Ok(Args {
        dataset,
        options,
        status_date,
    })
}

fn run(args: Args) -> Result<()> {
    println!("🔗 intranet-graph {}", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Options
    let options = match &args.options {
        Some(path) => BuildOptions::from_json_file(path)?,
        None => BuildOptions::default(),
    };
    tracing::info!(policy = ?options.time_series_policy, "options loaded");

    // 2. Dataset
    println!("\n📂 Loading dataset...");
    let dataset = Dataset::from_json_file(&args.dataset)?;
    println!("✓ Loaded {} seed records, {} account books", dataset.seed.len(), dataset.account_books.len());

    // 3. Build
    println!("\n🏗️  Building graph...");
    let mut pass = BuildPass::with_options(options);
    let books = dataset
        .build_into(&mut pass)
        .with_context(|| format!("Failed to build {}", args.dataset.display()))?;

    let registry = pass.registry();
    println!("✓ Parties:       {}", registry.count::<Party>());
    println!("✓ Account books: {}", registry.count::<AccountBook>());
    println!("✓ Accounts:      {}", registry.count::<Account>());
    println!("✓ Ledger lines:  {}", registry.count::<LedgerLine>());

    let fingerprint = snapshot(registry)
        .fingerprint()
        .context("Failed to serialize graph snapshot")?;
    println!("✓ Fingerprint:   {}", fingerprint);

    // 4. Status
    let date = args.status_date.unwrap_or_else(|| Local::now().date_naive());
    println!("\n📊 Status at {}", date);

    for book in books {
        let totals = book_totals(registry, book, date);
        println!(
            "   {}: assets {:.2}, liabilities {:.2}, unclassified {:.2}",
            registry[book].name, totals.assets, totals.liabilities, totals.unclassified
        );
    }

    let debtors = debtors(registry, date);
    if debtors.is_empty() {
        println!("   No outstanding debtors");
    }
    for debtor in &debtors {
        println!("   {:>5} {:<30} {:>12.2}", debtor.id, debtor.name, debtor.balance);
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Build complete");

    Ok(())
}
