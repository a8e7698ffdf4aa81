use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use plenar_parser::directory::PersonDirectory;
use plenar_parser::parser::{DebateItem, ParsedSession};
use plenar_parser::settings::Settings;
use plenar_parser::{parse_transcript, ParseOptions};

#[derive(Parser)]
#[command(name = "plenar_parser", about = "Bundestag plenary transcript parser")]
struct Cli {
    /// Known-person directory (abgeordnetenwatch profile dump)
    #[arg(long, global = true)]
    deputies: Option<PathBuf>,
    /// Override the electoral period read from the transcript
    #[arg(long, global = true)]
    electoral_period: Option<u32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one transcript and print the session as JSON
    Parse {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Metadata, agenda resolution and speakers of one transcript
    Stats {
        file: PathBuf,
        /// Max speaker rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Parse every *.txt transcript in a directory
    Batch {
        dir: PathBuf,
        /// Write <name>.json per transcript here
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Max transcripts to parse
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let deputies = cli.deputies.or(settings.deputies.clone());
    let directory = deputies.as_deref().map(PersonDirectory::load).transpose()?;
    let options = ParseOptions {
        electoral_period: cli.electoral_period.or(settings.electoral_period),
        directory: directory.as_ref(),
    };

    let result = match cli.command {
        Commands::Parse { file, pretty } => {
            let session = parse_file(&file, &options)?;
            let json = if pretty {
                serde_json::to_string_pretty(&session)?
            } else {
                serde_json::to_string(&session)?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::Stats { file, limit } => {
            let session = parse_file(&file, &options)?;
            print_stats(&session, limit);
            Ok(())
        }
        Commands::Batch { dir, out, limit } => {
            let files = list_transcripts(&dir, limit)?;
            if files.is_empty() {
                println!("No transcripts found in {}.", dir.display());
                return Ok(());
            }
            if let Some(out) = &out {
                std::fs::create_dir_all(out)
                    .with_context(|| format!("creating {}", out.display()))?;
            }
            println!("Parsing {} transcripts...", files.len());
            let counts = parse_batch(&files, out.as_deref(), &options, settings.chunk_size)?;
            counts.print();
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn parse_file(path: &Path, options: &ParseOptions<'_>) -> Result<ParsedSession> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_transcript(&text, options).with_context(|| format!("parsing {}", path.display()))
}

fn list_transcripts(dir: &Path, limit: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }
    Ok(files)
}

struct BatchCounts {
    parsed: usize,
    failed: usize,
    contributions: usize,
    topics: usize,
    unresolved: usize,
    absentees: usize,
}

impl BatchCounts {
    fn print(&self) {
        println!(
            "Parsed {} transcripts ({} failed): {} contributions, {} topics ({} unresolved), {} absentees.",
            self.parsed, self.failed, self.contributions, self.topics, self.unresolved, self.absentees,
        );
    }
}

fn parse_batch(
    files: &[PathBuf],
    out: Option<&Path>,
    options: &ParseOptions<'_>,
    chunk_size: usize,
) -> Result<BatchCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = BatchCounts {
        parsed: 0,
        failed: 0,
        contributions: 0,
        topics: 0,
        unresolved: 0,
        absentees: 0,
    };

    for chunk in files.chunks(chunk_size) {
        let results: Vec<_> = chunk
            .par_iter()
            .map(|path| (path, parse_file(path, options)))
            .collect();

        for (path, result) in results {
            match result {
                Ok(session) => {
                    counts.parsed += 1;
                    counts.contributions += session.contributions().count();
                    counts.topics += session.agenda.len();
                    counts.unresolved += session.unresolved_topics().count();
                    counts.absentees += session.absentees.len();
                    if let Some(out) = out {
                        write_json(out, path, &session)?;
                    }
                }
                Err(e) => {
                    counts.failed += 1;
                    warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn write_json(out: &Path, source: &Path, session: &ParsedSession) -> Result<()> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "session".into());
    let target = out.join(format!("{}.json", stem));
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(&target, json).with_context(|| format!("writing {}", target.display()))
}

fn print_stats(session: &ParsedSession, limit: usize) {
    let m = &session.metadata;
    let ep = m
        .electoral_period
        .map(|e| e.to_string())
        .unwrap_or_else(|| "-".into());
    println!("Session:   {} (electoral period {})", m.session, ep);
    println!("Date:      {}", m.date);
    println!("Start/End: {} - {}", m.start.time(), m.end.time());

    println!("\n--- Agenda ---");
    for t in &session.agenda {
        let (start, end) = t.offsets();
        println!(
            "  {:<26} {:>6} [{}, {})  {}",
            t.label,
            t.id,
            start,
            end,
            truncate(t.summary.lines().next().unwrap_or(""), 48)
        );
    }

    println!(
        "\n{:>3} | {:<32} | {:<24} | {:>6}",
        "#", "Speaker", "Party / Position", "Chars"
    );
    println!("{}", "-".repeat(75));
    let mut row = 0;
    for item in &session.debate {
        match item {
            DebateItem::Topic(t) => println!("    > {} {}", t.label, t.id),
            DebateItem::Contribution(c) if row < limit => {
                row += 1;
                let affiliation = c
                    .speaker
                    .party
                    .as_deref()
                    .or(c.speaker.position.as_deref())
                    .or(c.speaker.role.as_deref())
                    .unwrap_or("");
                println!(
                    "{:>3} | {:<32} | {:<24} | {:>6}",
                    row,
                    truncate(&c.speaker.display_name(), 32),
                    truncate(affiliation, 24),
                    c.text.chars().count()
                );
            }
            DebateItem::Contribution(_) => {}
        }
    }

    println!(
        "\n{} contributions | {} absentees | {} reasons | {} warnings",
        session.contributions().count(),
        session.absentees.len(),
        session.reasons.len(),
        session.warnings.len()
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
