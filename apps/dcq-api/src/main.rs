use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = dcq_api::Args::parse();

	dcq_api::run(args).await
}
