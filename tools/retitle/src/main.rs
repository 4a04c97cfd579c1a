//! Retitle CLI
//!
//! Fetches TMDB metadata, compiles rename rules for a show or a movie,
//! prints them and optionally uploads them to a word-group rule API.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use retitle_core::{
    MetadataSource, MovieMetadata, NamingConfig, PartEpisodeMap, PublishReport, RuleBatch,
    RuleCompiler, SeasonSelection, ShowMetadata, StaticMetadata, publish,
};
use retitle_remote::{DEFAULT_LANGUAGE, TmdbClient, WordGroupClient};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// CLI arguments
#[derive(Parser)]
#[command(name = "retitle")]
#[command(about = "Compile TMDB metadata into rename rules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TMDB API read access token
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true, global = true)]
    tmdb_api_key: Option<String>,

    /// Language of names returned by TMDB
    #[arg(long, env = "TMDB_LANGUAGE", default_value = DEFAULT_LANGUAGE, global = true)]
    language: String,

    /// Upload the compiled rules to the word-group API
    #[arg(long, env = "UPLOAD_MS", global = true)]
    upload: bool,

    /// Word-group API root (`/api/v1` is appended when missing)
    #[arg(long, env = "API_BASE_URL", global = true)]
    api_base_url: Option<String>,

    /// Word-group API token
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true, global = true)]
    auth_token: Option<String>,

    /// Print the batch (and upload result) as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rules for the seasons of a TV show
    Tv(TvArgs),
    /// Rule for a movie
    Movie(MovieArgs),
}

#[derive(Args)]
struct TvArgs {
    /// TMDB series id
    id: u64,

    /// Title as it appears in the current file names (e.g. One.Piece)
    #[arg(short = 't', long)]
    file_title: String,

    /// Match episodes by air date (YYYYMMDD) instead of episode number
    #[arg(long, conflicts_with_all = ["offset", "parts"])]
    date_mode: bool,

    /// Require the original season marker (S01) in file names
    #[arg(long)]
    original_seasons: bool,

    /// Canonical minus file episode number
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i32,

    /// Zero-pad episode numbers in the patterns
    #[arg(long)]
    pad_zero: bool,

    /// Size the padding from the highest episode number of the whole show
    #[arg(long, requires = "pad_zero")]
    continuous: bool,

    /// Only these seasons (comma separated)
    #[arg(long, value_delimiter = ',')]
    seasons: Vec<u32>,

    /// Include season 0 when compiling all seasons
    #[arg(long, conflicts_with = "seasons")]
    include_specials: bool,

    /// Episodes split into part files, as EPISODE:PARTS (e.g. 5:2,9:3)
    #[arg(long)]
    parts: Option<PartEpisodeMap>,

    /// Read show metadata from a JSON file instead of TMDB
    #[arg(long)]
    metadata: Option<PathBuf>,
}

impl TvArgs {
    fn naming_config(&self) -> Result<NamingConfig> {
        let seasons = if self.seasons.is_empty() {
            SeasonSelection::All {
                include_specials: self.include_specials,
            }
        } else {
            SeasonSelection::only(self.seasons.iter().copied())
        };

        let mut builder = NamingConfig::builder(&self.file_title)
            .with_date_mode(self.date_mode)
            .with_original_season_numbering(self.original_seasons)
            .with_episode_offset(self.offset)
            .with_pad_zero(self.pad_zero)
            .with_episode_continuous(self.continuous)
            .with_target_seasons(seasons);
        if let Some(parts) = &self.parts {
            builder = builder.with_part_episodes(parts.clone());
        }

        builder.build().context("Invalid numbering options")
    }
}

#[derive(Args)]
struct MovieArgs {
    /// TMDB movie id
    id: u64,

    /// Title as it appears in the current file name; a `Part N` label is kept
    #[arg(short = 't', long)]
    file_title: String,

    /// Read movie metadata from a JSON file instead of TMDB
    #[arg(long)]
    metadata: Option<PathBuf>,
}

#[derive(Serialize)]
struct Output<'a> {
    batch: &'a RuleBatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    publish: Option<&'a PublishReport>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn tmdb_client(cli: &Cli) -> Result<TmdbClient> {
    let client = TmdbClient::new(cli.tmdb_api_key.clone().unwrap_or_default())
        .context("Cannot query TMDB")?;
    Ok(client.with_language(&cli.language))
}

fn show_source(cli: &Cli, metadata: Option<&Path>) -> Result<Box<dyn MetadataSource>> {
    match metadata {
        Some(path) => {
            let show: ShowMetadata = read_json(path)?;
            info!(path = %path.display(), id = show.id, "using show metadata file");
            Ok(Box::new(StaticMetadata::new().with_show(show)))
        }
        None => Ok(Box::new(tmdb_client(cli)?)),
    }
}

fn movie_source(cli: &Cli, metadata: Option<&Path>) -> Result<Box<dyn MetadataSource>> {
    match metadata {
        Some(path) => {
            let movie: MovieMetadata = read_json(path)?;
            info!(path = %path.display(), id = movie.id, "using movie metadata file");
            Ok(Box::new(StaticMetadata::new().with_movie(movie)))
        }
        None => Ok(Box::new(tmdb_client(cli)?)),
    }
}

fn compile(cli: &Cli) -> Result<RuleBatch> {
    match &cli.command {
        Commands::Tv(args) => {
            let compiler = RuleCompiler::new(args.naming_config()?)?;
            let source = show_source(cli, args.metadata.as_deref())?;
            compiler
                .compile_show_from(&*source, args.id)
                .with_context(|| format!("Failed to compile rules for tv {}", args.id))
        }
        Commands::Movie(args) => {
            let config = NamingConfig::builder(&args.file_title)
                .build()
                .context("Invalid file title")?;
            let compiler = RuleCompiler::new(config)?;
            let source = movie_source(cli, args.metadata.as_deref())?;
            compiler
                .compile_movie_from(&*source, args.id)
                .with_context(|| format!("Failed to compile rule for movie {}", args.id))
        }
    }
}

fn upload(cli: &Cli, batch: &RuleBatch) -> Result<Option<PublishReport>> {
    if !cli.upload {
        return Ok(None);
    }
    if batch.is_empty() {
        warn!("No rules compiled, nothing to upload");
        return Ok(None);
    }

    let base_url = cli.api_base_url.as_deref().unwrap_or_default();
    let token = cli.auth_token.clone().unwrap_or_default();
    let mut store = WordGroupClient::new(base_url, token).context("Cannot upload rules")?;

    info!(base_url = %store.base_url(), rules = batch.len(), "Uploading rules");
    let report = publish(&mut store, batch).context("Failed to upload rules")?;
    Ok(Some(report))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let batch = compile(&cli)?;
    let report = upload(&cli, &batch)?;

    if cli.json {
        let output = Output {
            batch: &batch,
            publish: report.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{batch}");
        if let Some(report) = &report {
            println!();
            print!("{report}");
        }
    }

    if let Some(report) = &report {
        if !report.is_complete() {
            bail!("{} rule(s) were rejected", report.rejected.len());
        }
    }
    Ok(())
}
