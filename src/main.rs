#![warn(clippy::all, rust_2018_idioms)]

use clap::{Parser, Subcommand};
use ipa_signs::{ipa_table, IpaSign, IpaTable, Segment, SignKind};
use itertools::Itertools;
use log::error;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use strum::IntoEnumIterator;

#[derive(Parser, Debug)]
#[command(name = "ipa-signs", version, about = "Look up IPA signs and split IPA strings into them")]
struct Cli {
    /// Data file to load instead of the built-in table
    #[arg(long, env = "IPA_DATA_FILE")]
    data: Option<PathBuf>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split strings into IPA signs
    Segment {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List the signs of the table
    List {
        /// Only list signs of this kind
        #[arg(long)]
        kind: Option<SignKind>,
    },
    /// Summarize the table
    Stats,
}

#[derive(Serialize)]
struct Stats {
    signs: usize,
    by_kind: BTreeMap<String, usize>,
    unicode_keys: usize,
    primary_keys: usize,
    max_key_length: usize,
}

impl Stats {
    fn of(table: &IpaTable) -> Self {
        Self {
            signs: table.signs().len(),
            by_kind: SignKind::iter()
                .map(|k| (k.to_string(), table.signs_of_kind(k).count()))
                .collect(),
            unicode_keys: table.key_count(),
            primary_keys: table.ipa_to_unicode().len(),
            max_key_length: table.max_key_length(),
        }
    }
}

type CliResult = Result<(), Box<dyn Error>>;

fn codepoints(s: &str) -> String {
    s.chars().map(|c| format!("U+{:04X}", c as u32)).join(" ")
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> CliResult {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn write_segments(out: &mut dyn Write, text: &str, segments: &[Segment<'_>]) -> CliResult {
    writeln!(out, "{}", text)?;
    for segment in segments {
        let name = segment.sign.map(IpaSign::name).unwrap_or("?");
        writeln!(out, "  {}\t{}\t{}", segment.text, codepoints(segment.text), name)?;
    }
    Ok(())
}

fn run(cli: Cli, out: &mut dyn Write) -> CliResult {
    let loaded;
    let table: &IpaTable = match &cli.data {
        Some(path) => {
            loaded = IpaTable::from_path(path)?;
            &loaded
        }
        None => ipa_table(),
    };

    match cli.command {
        Command::Segment { text } => {
            if cli.json {
                let segmented = text
                    .iter()
                    .map(|t| (t.as_str(), table.segment(t)))
                    .collect::<Vec<_>>();
                write_json(out, &segmented)?;
            } else {
                for t in &text {
                    write_segments(out, t, &table.segment(t))?;
                }
            }
        }
        Command::List { kind } => {
            let signs = table
                .signs()
                .iter()
                .filter(|s| kind.map_or(true, |k| s.kind() == k))
                .collect::<Vec<_>>();
            if cli.json {
                write_json(out, &signs)?;
            } else {
                for sign in signs {
                    let unicode = sign.unicode_repr().unwrap_or("");
                    writeln!(out, "{}\t{}\t{}", unicode, codepoints(unicode), sign.name())?;
                }
            }
        }
        Command::Stats => {
            let stats = Stats::of(table);
            if cli.json {
                write_json(out, &stats)?;
            } else {
                writeln!(out, "signs:          {}", stats.signs)?;
                for (kind, count) in &stats.by_kind {
                    writeln!(out, "  {:<14}{}", kind, count)?;
                }
                writeln!(out, "unicode keys:   {}", stats.unicode_keys)?;
                writeln!(out, "primary keys:   {}", stats.primary_keys)?;
                writeln!(out, "max key length: {}", stats.max_key_length)?;
            }
        }
    }
    Ok(())
}

fn exit_code(result: CliResult) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    exit_code(run(Cli::parse(), &mut io::stdout().lock()))
}
