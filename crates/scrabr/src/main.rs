use std::path::PathBuf;

use clap::Parser;
use scrabr::{ScrabrError, ScrabrServerBuilder};
use scrabr_room::RoomConfig;
use scrabr_rules::WordList;
use tracing_subscriber::EnvFilter;

/// Multiplayer word-board game server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "SCRABR_BIND", default_value = "127.0.0.1:8080")]
    bind: String,

    /// Word list, one word per line.
    #[arg(long, env = "SCRABR_WORDS")]
    words: PathBuf,

    /// Most players a room will seat.
    #[arg(long, env = "SCRABR_MAX_PLAYERS", default_value_t = RoomConfig::default().max_players)]
    max_players: usize,
}

#[tokio::main]
async fn main() -> Result<(), ScrabrError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let words = WordList::load(&args.words)?;
    if words.is_empty() {
        tracing::warn!(path = %args.words.display(), "word list is empty, every play will be rejected");
    }

    let server = ScrabrServerBuilder::new()
        .bind(&args.bind)
        .room_config(RoomConfig {
            max_players: args.max_players,
            ..RoomConfig::default()
        })
        .build(words)
        .await?;
    tracing::info!(addr = %server.local_addr()?, "scrabr ready");

    server.run().await
}
