//! book-replay: drive a session from recorded feed frames.
//!
//! Reads newline-delimited `book_ui_1` frames from FRAMES (or stdin), feeds
//! them through a session actor and prints the final depth view as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use order_book::actor::{SessionActor, SessionError};
use order_book::config::BookConfig;
use order_book::events::SessionEvent;
use order_book::feed::SubscriptionRequest;
use order_book::machine::Session;
use order_book::snapshot::BookSnapshot;
use order_book::view::DepthView;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use types::numeric::Grouping;
use types::product::ProductId;

/// Replay recorded order book frames through a session
#[derive(Parser, Debug)]
#[command(name = "book-replay")]
#[command(about = "Replay recorded book_ui_1 frames and print the resulting depth view")]
struct Cli {
    /// Newline-delimited frames file; reads stdin when omitted
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    frames: Option<PathBuf>,

    /// JSON config file
    #[arg(long, value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Product to replay, overriding the configured default (PI_XBTUSD or PI_ETHUSD)
    #[arg(long, value_parser = clap::value_parser!(ProductId))]
    product: Option<ProductId>,

    /// Bucket width; must be one of the product's grouping options
    #[arg(long, value_parser = clap::value_parser!(Grouping))]
    grouping: Option<Grouping>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let config = match &args.config {
        Some(path) => BookConfig::from_json_file(path)?,
        None => BookConfig::default(),
    };

    let product = args.product.unwrap_or(config.default_product);
    let grouping = match args.grouping {
        Some(grouping) => product.validate_grouping(grouping)?,
        None => product.default_grouping(),
    };
    let display_depth = config.display_depth;

    tracing::info!(%product, %grouping, "Starting book replay");

    let (actor, handle) = SessionActor::new(Session::with_grouping(product, grouping), Arc::new(config));
    let join = tokio::spawn(actor.run());

    handle.send(SessionEvent::OpenConnection).await?;
    tracing::info!(
        request = %SubscriptionRequest::subscribe(product).to_json()?,
        "Subscribing"
    );

    let (forwarded, rejected) = match &args.frames {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            replay(BufReader::new(file), &handle).await?
        }
        None => replay(BufReader::new(tokio::io::stdin()), &handle).await?,
    };

    drop(handle);
    let session = join.await?;
    let snapshot = BookSnapshot::from_session(&session);

    tracing::info!(
        forwarded,
        rejected,
        state = snapshot.state.label(),
        asks = snapshot.asks.len(),
        bids = snapshot.bids.len(),
        "Replay finished"
    );

    let view = DepthView::from_snapshot(&snapshot, display_depth);
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

/// Feed every non-empty line to the session. Returns (forwarded, rejected).
async fn replay<R>(reader: R, handle: &order_book::actor::SessionHandle) -> anyhow::Result<(u64, u64)>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0u64;
    let mut rejected = 0u64;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match handle.send_frame(line).await {
            Ok(true) => forwarded += 1,
            Ok(false) => {}
            Err(SessionError::Feed(err)) => {
                rejected += 1;
                tracing::warn!(error = %err, "Rejected frame");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok((forwarded, rejected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_typed_flags() {
        let cli = Cli::try_parse_from([
            "book-replay",
            "frames.jsonl",
            "--product",
            "PI_ETHUSD",
            "--grouping",
            "0.1",
        ])
        .unwrap();
        assert_eq!(cli.frames, Some(PathBuf::from("frames.jsonl")));
        assert_eq!(cli.product, Some(ProductId::EthUsd));
        assert_eq!(cli.grouping, Some("0.1".parse().unwrap()));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["book-replay", "--grouping", "0"]).is_err());
        assert!(Cli::try_parse_from(["book-replay", "--product", "PI_DOGEUSD"]).is_err());
        assert!(Cli::try_parse_from(["book-replay", "--unknown"]).is_err());
    }

    #[test]
    fn test_cli_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["book-replay"]).unwrap();
        assert!(cli.frames.is_none());
        assert!(cli.product.is_none());
    }
}
