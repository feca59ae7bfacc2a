//! Error taxonomy for the playback control core.
//!
//! Handlers never propagate these to their caller — they are surfaced here
//! so the handful of call sites that *do* need to observe a failure (the
//! seek executor, force-window setup) can log and fold it back into
//! `PlayerContext` state.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlaybotError {
    #[error("no demuxer attached")]
    NoDemuxer,
    #[error("current time is unknown, cannot resolve a relative seek")]
    UnknownCurrentTime,
    #[error("seek amount is NOPTS")]
    UnknownSeekAmount,
    #[error("demuxer seek failed: {0}")]
    DemuxSeek(String),
    #[error("video output reconfiguration failed: {0}")]
    VoReconfig(String),
}
