use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use colloquy::{
    AppState, Handle, LeadInSkip, NarrationConfig, ParseConfig, PresetColumn, SpeakerLinePattern,
    TranscriptStore, build_graph, parse, segment, serve,
};

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(author, version, about = "Transcript to columnar graph conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a transcript file into a column/note/edge graph
    Parse {
        /// Input transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the graph (JSON); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        opts: ParseOpts,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a transcript without writing anything
    Analyze {
        /// Input transcript file (plain text)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        opts: ParseOpts,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Serve the parse API over HTTP
    Serve {
        /// Host interface to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// TCP port to listen on
        #[arg(long, default_value_t = 8000)]
        port: u16,

        /// Directory for raw transcripts and parsed graphs
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        #[command(flatten)]
        opts: ParseOpts,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Parse configuration shared by every subcommand.
#[derive(Args)]
struct ParseOpts {
    /// Speaker label style: "bare-name-line" or "caps-colon-line"
    #[arg(long, default_value = "bare-name-line")]
    pattern: String,

    /// Keep lead-in lines instead of skipping to the first speaker label
    #[arg(long)]
    no_lead_in_skip: bool,

    /// Speaker title whose paragraphs are dropped (repeatable)
    #[arg(long = "exclude-title")]
    excluded_titles: Vec<String>,

    /// Line prefix to discard, e.g. "[" for stage directions (repeatable)
    #[arg(long = "exclude-prefix")]
    exclusion_prefixes: Vec<String>,

    /// Preset column title, in display order (repeatable)
    #[arg(long = "preset")]
    presets: Vec<String>,

    /// Append an empty placeholder column after the presets
    #[arg(long)]
    placeholder: bool,

    /// Speaker alias as "written=canonical" (repeatable)
    #[arg(long = "alias")]
    aliases: Vec<String>,

    /// Attribute long unlabeled lines to this pseudo-speaker
    #[arg(long)]
    narration: Option<String>,
}

impl ParseOpts {
    fn to_config(&self) -> Result<ParseConfig> {
        let speaker_line_pattern = match self.pattern.as_str() {
            "bare-name-line" => SpeakerLinePattern::BareNameLine,
            "caps-colon-line" => SpeakerLinePattern::CapsColonLine,
            other => bail!("unknown speaker line pattern: {other}"),
        };

        let mut preset_columns: Vec<PresetColumn> = self
            .presets
            .iter()
            .enumerate()
            .map(|(i, title)| PresetColumn::new(format!("column-{}", i + 1), title))
            .collect();
        if self.placeholder {
            preset_columns.push(PresetColumn::new(
                format!("column-{}", preset_columns.len() + 1),
                "",
            ));
        }

        let mut aliases = HashMap::new();
        for pair in &self.aliases {
            let (written, canonical) = pair
                .split_once('=')
                .with_context(|| format!("alias must be written=canonical, got: {pair}"))?;
            aliases.insert(written.to_string(), canonical.to_string());
        }

        let lead_in_skip = if self.no_lead_in_skip {
            LeadInSkip::None
        } else {
            LeadInSkip::UntilFirstSpeakerLine
        };

        Ok(ParseConfig {
            preset_columns,
            excluded_titles: self.excluded_titles.iter().cloned().collect::<HashSet<_>>(),
            lead_in_skip,
            line_exclusion_prefixes: self
                .exclusion_prefixes
                .iter()
                .cloned()
                .collect::<HashSet<_>>(),
            speaker_line_pattern,
            aliases,
            narration: self.narration.as_ref().map(|title| NarrationConfig {
                title: title.clone(),
                ..Default::default()
            }),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            opts,
            verbose,
        } => {
            setup_logging(verbose);
            parse_transcript(input, output, &opts)
        }
        Commands::Analyze {
            input,
            opts,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_transcript(input, &opts)
        }
        Commands::Serve {
            host,
            port,
            data_dir,
            opts,
            verbose,
        } => {
            setup_logging(verbose);
            serve_api(host, port, data_dir, &opts).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn parse_transcript(input: PathBuf, output: Option<PathBuf>, opts: &ParseOpts) -> Result<()> {
    let config = opts.to_config()?;

    info!("Loading transcript from {:?}", input);
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read transcript: {:?}", input))?;

    let graph = parse(&text, &config).context("Failed to parse transcript")?;

    info!(
        "Parsed {} columns, {} notes, {} edges",
        graph.columns.len(),
        graph.note_count(),
        graph.edges.len()
    );

    let json = serde_json::to_string_pretty(&graph)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write graph: {:?}", path))?;
            info!("Graph written to {:?}", path);
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn analyze_transcript(input: PathBuf, opts: &ParseOpts) -> Result<()> {
    let config = opts.to_config()?;
    config.validate()?;

    info!("Analyzing transcript from {:?}", input);
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read transcript: {:?}", input))?;

    let utterances = segment(&text, &config);
    let graph = build_graph(&utterances, &config);

    println!("Transcript Analysis");
    println!("==================");
    println!("Utterances: {}", utterances.len());
    println!("Columns: {}", graph.columns.len());
    println!("Notes: {}", graph.note_count());
    println!("Edges: {}", graph.edges.len());
    println!();

    println!("Columns");
    println!("-------");
    for (i, column) in graph.columns.iter().enumerate() {
        let title = if column.title.is_empty() {
            "(placeholder)"
        } else {
            column.title.as_str()
        };
        let chars: usize = column.notes.iter().map(|n| n.content.chars().count()).sum();
        println!(
            "{}. {} [{}]: {} notes, {} chars",
            i + 1,
            title,
            column.id,
            column.notes.len(),
            chars
        );
    }
    println!();

    // Edge breakdown: a bottom handle on the source means the same
    // speaker continued, anything else is a hand-off between columns.
    let same_column = graph
        .edges
        .iter()
        .filter(|e| e.source_handle == Handle::Bottom)
        .count();

    println!("Edges");
    println!("-----");
    println!("Same-column continuations: {}", same_column);
    println!("Cross-column hand-offs: {}", graph.edges.len() - same_column);

    Ok(())
}

async fn serve_api(host: String, port: u16, data_dir: PathBuf, opts: &ParseOpts) -> Result<()> {
    let config = opts.to_config()?;
    config.validate().context("Invalid parse configuration")?;

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("invalid host/port bind address")?;

    let store = TranscriptStore::open(&data_dir)
        .with_context(|| format!("Failed to open store at {:?}", data_dir))?;
    info!("Store opened at {:?}", data_dir);

    let state = AppState::new(store, config);
    serve(addr, state).await
}
