//! Plays one replay without a UI and logs what the world looks like.
//!
//! ```text
//! headless-viewer [server_url] <match_id>
//! ```
//!
//! The server URL falls back to `DEMOSCOPE_SERVER_URL`, then to the local
//! default. `RUST_LOG` controls verbosity. The final world is printed as
//! JSON on stdout when the replay ends.

use std::time::{Duration, Instant};

use demoscope::prelude::*;
use tracing_subscriber::EnvFilter;

/// How often ephemeral entries are expired; roughly one rendered frame.
const FRAME: Duration = Duration::from_millis(50);
const REPORT_EVERY: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Args {
    server_url: Option<String>,
    match_id: String,
}

fn parse_args(mut args: Vec<String>) -> Result<Args, String> {
    match args.len() {
        1 => Ok(Args {
            server_url: None,
            match_id: args.remove(0),
        }),
        2 => {
            let match_id = args.remove(1);
            Ok(Args {
                server_url: Some(args.remove(0)),
                match_id,
            })
        }
        _ => Err("usage: headless-viewer [server_url] <match_id>".into()),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args(std::env::args().skip(1).collect())?;
    let mut config = SessionConfig::from_env()?;
    if let Some(url) = args.server_url {
        config.server_url = url;
    }
    tracing::info!(server_url = %config.server_url, match_id = %args.match_id, "starting replay");

    let viewer = Viewer::builder().config(config).build();
    viewer.select_replay(&args.match_id).await?;

    let mut frame = tokio::time::interval(FRAME);
    let mut last_report = Instant::now();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = frame.tick() => {}
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
        }

        viewer.expire(Instant::now()).await;
        if last_report.elapsed() >= REPORT_EVERY {
            last_report = Instant::now();
            report(&viewer.snapshot().await);
        }
        if viewer.connection_state().await.is_terminal() {
            break;
        }
    }

    let state = viewer.connection_state().await;
    let world = viewer.snapshot().await;
    viewer.reset_session().await;
    tracing::info!(?state, "replay stopped");
    println!("{}", serde_json::to_string_pretty(&world)?);
    Ok(())
}

fn report(world: &WorldSnapshot) {
    tracing::info!(
        map = world.map.asset_key(),
        tick = world.entities.tick,
        round_time = %world.playback.round_time,
        score = %format!("{} {}:{} {}", world.scoreboard.t_name, world.scoreboard.t_score, world.scoreboard.ct_score, world.scoreboard.ct_name),
        t_alive = world.roster.t.iter().filter(|p| p.alive).count(),
        ct_alive = world.roster.ct.iter().filter(|p| p.alive).count(),
        shots = world.shots.list.live_count(),
        explosions = world.explosions.visible().count(),
        kills = world.kill_feed.list.live_count(),
        progress = world.playback.progress,
        "world"
    );
}
