//! stylus-calibrate - pressure calibration backend
//!
//! Reads UI messages as JSON lines from stdin (or the file given as the
//! first argument) and writes backend messages as JSON lines to stdout.
//! Logs go to stderr; set `RUST_LOG` to adjust the filter.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use pressure::CalibrationSession;
use stylus_config::CalibrationConfig;
use stylus_ipc::encode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod handler;
mod sink;

use handler::CalibrationHandler;
use sink::OutboundDeviceSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stylus_calibrate=info,pressure=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = CalibrationConfig::from_env();
    info!(
        "Starting stylus calibration backend (fit mode: {}, {} segments)",
        config.fit_mode.as_str(),
        config.control_segments
    );

    let session = CalibrationSession::open(config, OutboundDeviceSink::new());
    let mut handler = CalibrationHandler::new(session);

    let input: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => {
            info!("Reading messages from {}", path);
            Box::new(BufReader::new(File::open(path)?))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        for reply in handler.handle_line(&line) {
            match encode(&reply) {
                Ok(json) => writeln!(out, "{}", json)?,
                Err(e) => error!("Failed to encode reply: {}", e),
            }
        }
        out.flush()?;
    }

    handler.shutdown();
    Ok(())
}
