use anyhow::{Context, Result, bail};
use newsclip::{
    config::Config,
    runner::CrawlRunner,
    session::{FsStore, SessionAssembler},
};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(seed) = args.next() else {
        bail!("usage: newsclip <seed-url> [max-articles]");
    };
    let seed = Url::parse(&seed).context("invalid seed URL")?;

    let mut config = Config::from_env()?;
    if let Some(max) = args.next() {
        config.max_articles = max.parse().context("max-articles must be a number")?;
        config.validate()?;
    }

    let session_id = SessionAssembler::session_id(chrono::Utc::now());
    let store = Arc::new(FsStore::new(&config.output_dir, &session_id));
    info!(session = %session_id, output = %store.root().display(), "session created");

    // Ctrl-C aborts in-flight work; partially processed articles are
    // discarded, already-persisted ones remain.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("stop requested, cancelling run");
                cancel.cancel();
            }
        });
    }

    let runner = CrawlRunner::new(config, session_id, store, cancel);
    let report = runner.run(seed).await?;

    info!(
        session = %report.session_id,
        saved = report.stats.articles_saved,
        rejected = report.stats.articles_rejected,
        images = report.stats.images_saved,
        fetch_failures = report.stats.fetch_failures,
        "run complete"
    );
    Ok(())
}
