use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use scrivo::{list_input_devices, Config, NullEngine, RealtimeSession, SessionEvent};

#[derive(Parser)]
#[command(name = "scrivo", version, about = "Live microphone capture with sliding-window transcription")]
struct Cli {
    /// Configuration file stem (TOML); defaults apply when absent.
    #[arg(long, default_value = "config/scrivo")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available input devices.
    Devices,
    /// Capture from the microphone, then export the recording.
    Record {
        /// Seconds to record.
        #[arg(long, default_value_t = 10)]
        duration: u64,

        /// Output WAV path.
        #[arg(long, default_value = "recording.wav")]
        output: PathBuf,

        /// Input device index (platform default when omitted).
        #[arg(long)]
        device: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    info!("{} starting", cfg.service.name);

    match cli.command {
        Command::Devices => {
            for device in list_input_devices()? {
                println!("{:3}  {}", device.index, device.name);
            }
        }
        Command::Record {
            duration,
            output,
            device,
        } => {
            let mut realtime = cfg.realtime.clone();
            if device.is_some() {
                realtime.device_index = device;
            }

            // No model wired up here; the null engine keeps the capture
            // and export paths running. Hosts inject their own engine.
            let mut session = RealtimeSession::with_microphone(realtime, Arc::new(NullEngine));
            let mut events = session.subscribe();
            let printer = tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(SessionEvent::Text(text)) => println!("{}", text),
                        Ok(SessionEvent::Level(level)) => debug!("input level {:.2}", level),
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
            });

            session.start().await?;
            info!("recording for {}s...", duration);
            tokio::time::sleep(Duration::from_secs(duration)).await;
            session.stop().await;
            printer.abort();

            match session.export_wav(&output)? {
                Some(path) => info!("recording saved to {}", path.display()),
                None => info!("nothing captured, no file written"),
            }

            let transcript = session.transcript().await;
            if !transcript.segments.is_empty() {
                let json_path = output.with_extension("json");
                std::fs::write(&json_path, serde_json::to_string_pretty(&transcript)?)?;
                info!("transcript saved to {}", json_path.display());
            }

            let stats = session.stats().await;
            info!(
                "captured {} blocks ({} dropped), {} inference windows",
                stats.frames_captured, stats.frames_dropped, stats.windows_transcribed
            );
        }
    }

    Ok(())
}
