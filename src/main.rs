use catalogdash::aggregate::DerivedTables;
use catalogdash::report::{self, Summary};
use catalogdash::{logging, AggregateOptions, Catalog, Dimension, FilterSelection};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "catalogdash")]
#[command(author, version, about = "Filter a streaming catalog CSV and summarize what is left")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Catalog CSV to load
    path: Option<PathBuf>,

    /// Keep only this type (repeatable; pass "" to select none)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    types: Option<Vec<String>>,

    /// Keep only this country, matched against the whole cell (repeatable)
    #[arg(short, long = "country", value_name = "COUNTRY")]
    countries: Option<Vec<String>>,

    /// Keep only this genre, matched against the whole listed_in cell (repeatable)
    #[arg(short, long = "genre", value_name = "GENRE")]
    genres: Option<Vec<String>>,

    /// Output report file (.json for tables, anything else for filtered CSV)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for auto-generated exports
    #[arg(long, default_value = "catalogdash-reports")]
    report_dir: PathBuf,

    /// Don't auto-generate the filtered CSV export
    #[arg(long)]
    no_report: bool,

    /// Rows in the top-countries and longest-movies tables
    #[arg(long, default_value = "10")]
    top: usize,

    /// Buckets in the duration histogram (at most 1000)
    #[arg(long, default_value = "20")]
    bins: usize,

    /// Show debug logging and the histogram buckets
    #[arg(short, long)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve derived tables and exports over HTTP
    Serve {
        /// Catalog CSV to load
        path: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Rows in the top-N tables
        #[arg(long, default_value = "10")]
        top: usize,

        /// Buckets in the duration histogram (at most 1000)
        #[arg(long, default_value = "20")]
        bins: usize,
    },

    /// List the distinct values of each filter dimension
    Options {
        /// Catalog CSV to load
        path: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    let directive = if args.verbose {
        "catalogdash=debug"
    } else if matches!(args.command, Some(Command::Serve { .. })) {
        "catalogdash=info"
    } else {
        "catalogdash=warn"
    };
    logging::init_logging(directive);

    // Handle subcommands first
    if let Some(cmd) = args.command {
        match cmd {
            Command::Serve { path, port, top, bins } => {
                let options = AggregateOptions::new().with_top(top).with_histogram_bins(bins);
                if let Err(e) = catalogdash::serve::start(port, path, options) {
                    eprintln!("Server error: {}", e);
                    std::process::exit(1);
                }
                return;
            }
            Command::Options { path } => {
                let catalog = load_or_exit(&path);
                print_options(&catalog);
                return;
            }
        }
    }

    let path = if let Some(p) = args.path.clone() {
        p
    } else {
        eprintln!("Usage: catalogdash <CSV>");
        eprintln!("Run 'catalogdash --help' for more options.");
        std::process::exit(1);
    };

    let catalog = load_or_exit(&path);

    let selection = FilterSelection::all(&catalog)
        .restrict(Dimension::Type, args.types.clone())
        .restrict(Dimension::Country, args.countries.clone())
        .restrict(Dimension::Genre, args.genres.clone());

    let options = AggregateOptions::new()
        .with_top(args.top)
        .with_histogram_bins(args.bins);

    let view = catalog.filter(&selection);
    let summary = Summary::from_view(catalog.len(), &view);
    let tables = DerivedTables::compute(&view, &options);

    if !args.quiet {
        eprintln!("\x1b[1mcatalogdash\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        print_tables(&tables, &options, args.verbose);
    }

    eprintln!("\n{}", "─".repeat(70));
    eprintln!("\x1b[1mSummary:\x1b[0m");
    eprintln!("  Records:       {}", summary.total);
    eprintln!("  After filter:  {}", summary.filtered);
    eprintln!("  Movies:        {} ({} with duration)", summary.movies, summary.timed_movies);

    // Determine report path
    let report_path = if let Some(ref output) = args.output {
        Some(output.clone())
    } else if !args.no_report {
        if let Err(e) = std::fs::create_dir_all(&args.report_dir) {
            eprintln!("Failed to create {}: {}", args.report_dir.display(), e);
            std::process::exit(1);
        }
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("catalog_filtered_{}.csv", timestamp);
        Some(args.report_dir.join(filename))
    } else {
        None
    };

    if let Some(ref output_path) = report_path {
        if let Err(e) = report::generate(output_path, &catalog, &selection, &options) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }
    }
}

fn load_or_exit(path: &Path) -> Catalog {
    match Catalog::load(path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_options(catalog: &Catalog) {
    for dimension in Dimension::ALL {
        let values = catalog.distinct(dimension);
        println!("\x1b[1m{}\x1b[0m ({} values)", dimension, values.len());
        for value in values {
            println!("  {}", value);
        }
    }
}

fn print_tables(tables: &DerivedTables, options: &AggregateOptions, verbose: bool) {
    println!("\n\x1b[1mTitles by type\x1b[0m");
    if tables.count_by_type.is_empty() {
        println!("  (no titles)");
    }
    for row in &tables.count_by_type {
        println!("  {:<20} {:>6}", truncate(&row.kind, 20), row.count);
    }

    println!("\n\x1b[1mTop {} countries\x1b[0m", options.top_countries);
    for row in &tables.top_countries {
        println!("  {:<40} {:>6}", truncate(&row.country, 40), row.count);
    }

    println!("\n\x1b[1mTitles by release year\x1b[0m");
    for row in &tables.count_by_year {
        println!("  {:<6} {:>6}", row.year, row.count);
    }

    let hist = &tables.duration_histogram;
    println!("\n\x1b[1mMovie durations\x1b[0m");
    if hist.values.is_empty() {
        println!("  (no movies with a numeric duration)");
    } else {
        let min = hist.values.iter().min().copied().unwrap_or_default();
        let max = hist.values.iter().max().copied().unwrap_or_default();
        println!("  {} movies, {}-{} min", hist.values.len(), min, max);
        if verbose {
            for bin in &hist.bins {
                println!("  {:>7.1}-{:<7.1} {:>6}", bin.start, bin.end, bin.count);
            }
        }
    }

    println!("\n\x1b[1mTop {} longest movies\x1b[0m", options.top_movies);
    for m in &tables.top_movies {
        let year = m.release_year.map(|y| y.to_string()).unwrap_or_default();
        println!(
            "  {:>4} min  {:<40}  {:<6}  {:<9}  {}",
            m.duration_minutes,
            truncate(&m.title, 40),
            year,
            truncate(&m.rating, 9),
            truncate(&m.country, 30)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
