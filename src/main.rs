mod args;
mod audio;
mod decode;
mod pcm;
mod playback;
mod tts;
mod wav;

use anyhow::Context;
use args::Args;
use audio::wav_duration_seconds;
use clap::Parser;
use playback::{PlaybackOptions, play_mp3};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tts::TtsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args).await {
        error!("{:?}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let client = TtsClient::new(&args.endpoint, args.thread, args.shard_length)?;
    let mp3 = client.synthesize(&args.text).await?;

    let output = (!args.no_save).then(|| PathBuf::from(&args.out));
    let options = PlaybackOptions {
        play: !args.no_play,
        output: output.clone(),
    };

    let stats = tokio::task::spawn_blocking(move || play_mp3(mp3, &options))
        .await
        .context("playback task panicked")??;

    info!(
        "Audio playback finished: {} frames, {} bytes of PCM",
        stats.frames, stats.bytes
    );

    if let Some(path) = output {
        let secs = wav_duration_seconds(&path)?;
        info!("WAV written to {} ({:.2} seconds)", path.display(), secs);
    }
    Ok(())
}
