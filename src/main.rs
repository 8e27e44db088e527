use clap::Parser;

mod cli;
mod config;
mod errors;
mod extract;
mod feed;
mod upstream;
mod web;
use config::Config;
use feed::VideoFeed;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "clipfeed=info,tower_http=info".into()),
        )
        .init();

    let args = cli::Args::parse();

    let mut config = Config::load_with(config::config_path(args.config)?)?;
    log::debug!("using config {}", config.path().display());

    match args.command {
        cli::Command::Serve { listen } => {
            if let Some(listen) = listen {
                config.listen = listen;
            }
            web::start_daemon(config)
        }

        cli::Command::Videos { tag } => {
            let feed = VideoFeed::new(config.upstream.clone())?;
            let urls = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(feed.videos(&tag))?;

            let payload = web::encode_videos(config.response_shape, urls);
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }

        cli::Command::Url { tag } => {
            println!("{}", upstream::build_url(&tag, &config.upstream));
            Ok(())
        }
    }
}
