use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use measure_time::info_time;
use tracing_subscriber::EnvFilter;

use wordfreq::{
    feed_reader, sort_by_frequency, ArenaTable, CounterConfig, Djb2Mix, Error, Fnv1, Fnv1a,
    FrequencyTable, FxWord, HashKind, InlineTable, Report, StdTable, Summary, TableKind,
    WordCounter, WordSink,
};

#[derive(Parser)]
#[command(name = "wordfreq", about = "Count word frequencies in a text stream", version)]
struct Cli {
    /// Text file to count. Reads stdin when neither FILE nor --url is given
    #[arg(conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Fetch the text over HTTP(S)
    #[arg(long)]
    url: Option<String>,

    /// JSON counter configuration. Flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bytes per read
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Initial number of table buckets
    #[arg(long)]
    initial_capacity: Option<usize>,

    /// Max load factor of the table, in (0, 1)
    #[arg(long)]
    load_factor: Option<f32>,

    /// Table layout: arena, inline or std (the std::collections::HashMap baseline)
    #[arg(long)]
    table: Option<TableKind>,

    /// Hash function: fnv1, fnv1a, djb2-mix or fx
    #[arg(long = "hash")]
    hasher: Option<HashKind>,

    /// Print one "count word" line per distinct word
    #[arg(long)]
    print_result: bool,

    /// Order entries by count, most frequent first
    #[arg(long)]
    sort: bool,

    /// Keep only the N most frequent words (implies --sort)
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logs
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Count(#[from] Error),

    #[error("cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot read config {}: {source}", .path.display())]
    Config { path: PathBuf, source: io::Error },

    #[error("request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),

    #[error("cannot encode report: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_logging(cli: &Cli) {
    // --quiet wins, --verbose shows info, RUST_LOG refines either default
    let filter = if cli.quiet {
        EnvFilter::new("off")
    } else if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<CounterConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| CliError::Config {
                path: path.clone(),
                source,
            })?;
            CounterConfig::from_json(&json)?
        }
        None => CounterConfig::default(),
    };
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(capacity) = cli.initial_capacity {
        config.initial_capacity = capacity;
    }
    if let Some(load_factor) = cli.load_factor {
        config.max_load_factor = load_factor;
    }
    if let Some(table) = cli.table {
        config.table = table;
    }
    if let Some(hasher) = cli.hasher {
        config.hasher = hasher;
    }
    config.validate()?;
    Ok(config)
}

/// Opens the input, returning a display name and a reader over it
fn open_input(cli: &Cli) -> Result<(String, Box<dyn Read>), CliError> {
    if let Some(url) = &cli.url {
        let response = ureq::get(url.as_str()).call()?;
        return Ok((url.clone(), Box::new(response.into_body().into_reader())));
    }
    match &cli.file {
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::Open {
                path: path.clone(),
                source,
            })?;
            Ok((path.display().to_string(), Box::new(file)))
        }
        None => Ok(("-".to_string(), Box::new(io::stdin().lock()))),
    }
}

fn count<T>(config: &CounterConfig, reader: Box<dyn Read>) -> Result<Report, Error>
where
    T: FrequencyTable + WordSink<Error = Error>,
{
    let mut counter = WordCounter::<T>::with_config(config)?;
    {
        info_time!("counting words with {} table and {} hash", config.table, config.hasher);
        feed_reader(&mut counter, reader, config.chunk_size)?;
        counter.finish()?;
    }
    info_time!("collecting report");
    counter.full_report()
}

fn count_with(config: &CounterConfig, reader: Box<dyn Read>) -> Result<Report, Error> {
    match (config.table, config.hasher) {
        (TableKind::Arena, HashKind::Fnv1) => count::<ArenaTable<Fnv1>>(config, reader),
        (TableKind::Arena, HashKind::Fnv1a) => count::<ArenaTable<Fnv1a>>(config, reader),
        (TableKind::Arena, HashKind::Djb2Mix) => count::<ArenaTable<Djb2Mix>>(config, reader),
        (TableKind::Arena, HashKind::Fx) => count::<ArenaTable<FxWord>>(config, reader),
        (TableKind::Inline, HashKind::Fnv1) => count::<InlineTable<Fnv1>>(config, reader),
        (TableKind::Inline, HashKind::Fnv1a) => count::<InlineTable<Fnv1a>>(config, reader),
        (TableKind::Inline, HashKind::Djb2Mix) => count::<InlineTable<Djb2Mix>>(config, reader),
        (TableKind::Inline, HashKind::Fx) => count::<InlineTable<FxWord>>(config, reader),
        (TableKind::Std, HashKind::Fnv1) => count::<StdTable<Fnv1>>(config, reader),
        (TableKind::Std, HashKind::Fnv1a) => count::<StdTable<Fnv1a>>(config, reader),
        (TableKind::Std, HashKind::Djb2Mix) => count::<StdTable<Djb2Mix>>(config, reader),
        (TableKind::Std, HashKind::Fx) => count::<StdTable<FxWord>>(config, reader),
    }
}

fn summary_line(name: &str, summary: &Summary, elapsed: Duration) -> String {
    format!(
        "file_name = {} | result size = {} | total words = {} | Time elapsed: {} seconds",
        name,
        summary.unique_words,
        summary.total_words,
        elapsed.as_secs_f64()
    )
}

fn write_report(
    cli: &Cli,
    name: &str,
    mut report: Report,
    elapsed: Duration,
) -> Result<(), CliError> {
    if cli.sort || cli.top.is_some() {
        sort_by_frequency(&mut report.entries);
    }
    if let Some(n) = cli.top {
        report.entries.truncate(n);
    }

    let mut out = BufWriter::new(io::stdout().lock());
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", summary_line(name, &report.summary, elapsed))?;
        if cli.print_result {
            for entry in &report.entries {
                writeln!(out, "{} {}", entry.count, entry.word)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let start = Instant::now();
    let (name, reader) = open_input(&cli)?;
    let report = count_with(&config, reader)?;
    write_report(&cli, &name, report, start.elapsed())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_ends_with_elapsed_time() {
        let summary = Summary {
            total_words: 6,
            unique_words: 3,
        };
        assert_eq!(
            summary_line("cat.txt", &summary, Duration::from_millis(1500)),
            "file_name = cat.txt | result size = 3 | total words = 6 | Time elapsed: 1.5 seconds"
        );
    }

    #[test]
    fn test_table_flag_accepts_std() {
        let cli = Cli::try_parse_from(["wordfreq", "--table", "std", "--hash", "fx", "in.txt"])
            .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.table, TableKind::Std);
        assert_eq!(config.hasher, HashKind::Fx);
    }
}
