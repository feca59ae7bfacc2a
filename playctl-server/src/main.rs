//! Standalone driver for `playctl-core`: wires the real crate up against
//! simulated collaborators so the playloop can run end to end without any
//! real decode/render backend. Structure mirrors termusic's
//! `server/src/server.rs` (`actual_main` / `player_loop` / `ticker_thread`),
//! generalized from gRPC command dispatch to posting closures onto the
//! dispatch queue.

mod cli;
mod command;
mod config;
mod logger;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use playctl_core::sim::{PassthroughFilterGraph, SimAudioOutput, SimDecoder, SimDemuxer, SimVideoOutput};
use playctl_core::{FnEventSink, PlayerContext, PlayerEvent};

use command::PlayerCmd;

const DEMO_DURATION_SECS: f64 = 30.0;
const DEMO_FRAME_COUNT: u32 = 900;

fn main() -> Result<()> {
    if let Err(err) = actual_main() {
        log::error!("Error: {err:?}");
        return Err(err);
    }
    Ok(())
}

fn actual_main() -> Result<()> {
    let args = cli::Args::parse();
    let _logger = logger::setup(&args);
    let overlay = config::load(&args)?;

    log::info!("playctl-server starting");

    let mut pc = PlayerContext::new(overlay.options);
    pc.demuxer = Some(Box::new(SimDemuxer::new(DEMO_DURATION_SECS)));
    pc.audio_output = Some(Box::new(SimAudioOutput::default()));
    pc.video_output = Some(Box::new(SimVideoOutput::default()));
    pc.video_decoder = Some(Box::new(SimDecoder::new(DEMO_FRAME_COUNT)));
    pc.audio_decoder = Some(Box::new(SimDecoder::new(DEMO_FRAME_COUNT)));
    pc.filter_graph = Some(Box::new(PassthroughFilterGraph));

    pc.has_current_entry = true;
    pc.player_idle_mode = false;

    let dispatch = pc.dispatch_handle();
    let ctrlc_dispatch = dispatch.clone();
    ctrlc::set_handler(move || {
        ctrlc_dispatch.post(Box::new(|pc: &mut PlayerContext| {
            command::apply(pc, PlayerCmd::Quit);
        }));
    })
    .expect("Error setting Ctrl-C handler");

    ticker_thread(dispatch);

    log::info!("playctl-server ready");

    let mut events = FnEventSink(|event: PlayerEvent| {
        log::debug!("event: {event:?}");
    });
    pc.run_playloop(&mut events);

    log::info!("Bye");
    Ok(())
}

/// Keeps the playloop's `wait_events` from sleeping indefinitely when
/// nothing else is happening, the way termusic's `ticker_thread` keeps
/// pushing `PlayerCmd::Tick` on an interval.
fn ticker_thread(dispatch: playctl_core::DispatchHandle) {
    std::thread::Builder::new()
        .name("ticker".into())
        .spawn(move || loop {
            std::thread::sleep(Duration::from_millis(500));
            dispatch.interrupt();
        })
        .expect("failed to spawn ticker thread");
}
