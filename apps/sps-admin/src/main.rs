use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = sps_admin::Args::parse();

	sps_admin::run(args).await
}
