use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use sps_service::SearchService;
use sps_storage::{
	db::Db,
	ingest,
	models::{NewCategory, NewChannel, NewContent},
};

#[derive(Debug, Parser)]
#[command(
	version = sps_cli::VERSION,
	rename_all = "kebab",
	styles = sps_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE", global = true, default_value = "sps.toml")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Create the search tables if they are missing.
	Init,
	/// Drop every search table.
	Reset {
		/// Required; the reset cannot be undone.
		#[arg(long)]
		yes: bool,
	},
	/// Create the search indexes and report each outcome.
	CreateIndexes,
	/// Print row counts and existing indexes.
	Stats,
	/// Load channel, video, and category batches from a JSON file.
	Import {
		#[arg(long, short = 'f', value_name = "FILE")]
		file: PathBuf,
	},
}

/// One producer batch: a channel with its videos and their facet rows.
#[derive(Debug, Deserialize)]
pub struct ImportBatch {
	pub channel: NewChannel,
	#[serde(default)]
	pub videos: Vec<NewContent>,
	#[serde(default)]
	pub categories: Vec<NewCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImportFile {
	One(ImportBatch),
	Many(Vec<ImportBatch>),
}
impl ImportFile {
	pub fn into_batches(self) -> Vec<ImportBatch> {
		match self {
			Self::One(batch) => vec![batch],
			Self::Many(batches) => batches,
		}
	}
}

#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
	pub channels: usize,
	pub videos_received: usize,
	pub videos_inserted: u64,
	pub categories_received: usize,
	pub categories_inserted: u64,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sps_config::load(&args.config)?;

	init_tracing(&config);

	let db = Db::connect(&config.storage.postgres).await?;
	let service = SearchService::new(config, db);

	match args.command {
		Command::Init => print_json(&service.init_schema().await?)?,
		Command::Reset { yes } => {
			if !yes {
				return Err(color_eyre::eyre::eyre!("Refusing to drop tables without --yes."));
			}

			print_json(&service.reset().await?)?;
		},
		Command::CreateIndexes => print_json(&service.create_indexes().await?)?,
		Command::Stats => {
			let stats = service.stats().await?;
			let indexes = sps_storage::indexes::list_indexes(&service.db).await?;

			print_json(&serde_json::json!({ "stats": stats, "indexes": indexes }))?;
		},
		Command::Import { file } => {
			let batches = read_import_file(&file)?;

			service.db.ensure_schema().await?;

			print_json(&import(&service.db, batches).await?)?;
		},
	}

	Ok(())
}

pub fn read_import_file(path: &Path) -> color_eyre::Result<Vec<ImportBatch>> {
	let raw = fs::read_to_string(path)?;
	let file: ImportFile = serde_json::from_str(&raw)?;

	Ok(file.into_batches())
}

async fn import(db: &Db, batches: Vec<ImportBatch>) -> color_eyre::Result<ImportReport> {
	let mut report = ImportReport::default();

	for batch in batches {
		let channel = ingest::insert_channel(&db.pool, &batch.channel).await?;

		report.channels += 1;
		report.videos_received += batch.videos.len();
		report.videos_inserted += ingest::insert_contents(db, &batch.videos, channel).await?;
		report.categories_received += batch.categories.len();
		report.categories_inserted +=
			ingest::insert_categories(db, &batch.categories, channel).await?;

		tracing::info!(cid = %batch.channel.cid, channel, "Batch imported.");
	}

	Ok(report)
}

fn print_json<T>(value: &T) -> color_eyre::Result<()>
where
	T: Serialize,
{
	println!("{}", serde_json::to_string_pretty(value)?);

	Ok(())
}

fn init_tracing(config: &sps_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
