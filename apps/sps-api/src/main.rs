use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sps_api::Args::parse();

	sps_api::run(args).await
}
