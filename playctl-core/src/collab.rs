//! Collaborator contracts.
//!
//! These are the "out of scope, treated as external collaborators" pieces:
//! demuxer, audio output, video output, decoders, the complex-filter graph
//! and input. The core only ever talks to them through these traits — a
//! dynamic-dispatch capability set in place of a closed backend enum,
//! grounded on how termusic itself dispatches across backends through
//! `dyn PlayerTrait` (`playback/src/lib.rs`, `Backend::as_player_mut`).

use crate::error::PlaybotError;
use crate::time::Pts;

/// Demuxer reader-state snapshot (`control(READER_STATE)`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReaderState {
    pub idle: bool,
    pub underrun: bool,
    pub eof: bool,
    pub ts_duration: f64,
}

/// Demuxer cache-info snapshot (`control(CACHE_INFO)`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CacheInfo {
    pub idle: bool,
    pub size: i64,
}

/// Flags passed to `Demuxer::seek`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DemuxSeekFlags {
    pub forward: bool,
    pub factor: bool,
    pub hr: bool,
    pub cached: bool,
}

pub trait Demuxer: Send {
    fn duration(&self) -> Pts;
    fn seekable(&self) -> bool;
    fn ts_resets_possible(&self) -> bool;
    fn is_network(&self) -> bool;
    fn filepos(&self) -> i64;
    fn seek(&mut self, pts: Pts, flags: DemuxSeekFlags) -> Result<(), PlaybotError>;
    fn reader_state(&self) -> ReaderState;
    fn cache_info(&self) -> CacheInfo;
    fn stream_size(&self) -> Option<i64>;
    /// Per-track negative seek offsets for any externally demuxed tracks.
    fn external_track_offsets(&self) -> &[f64] {
        &[]
    }
    /// Seek an externally demuxed track to the same target.
    fn seek_external_track(&mut self, _index: usize, _pts: Pts) -> Result<(), PlaybotError> {
        Ok(())
    }
}

pub trait AudioOutput: Send {
    fn pause(&mut self);
    fn resume(&mut self);
    fn drain(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoParams {
    pub width: u32,
    pub height: u32,
    pub par_num: u32,
    pub par_den: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoEvents {
    pub resize: bool,
    pub state_change: bool,
}

pub trait VideoOutput: Send {
    fn set_paused(&mut self, paused: bool);
    fn reconfig(&mut self, params: VideoParams) -> Result<(), PlaybotError>;
    fn redraw(&mut self);
    /// Any format the VO supports; force-window just needs the first one.
    fn query_formats(&self) -> Vec<u32>;
    fn query_and_reset_events(&mut self) -> VoEvents;
    fn set_cursor_visible(&mut self, visible: bool);
    fn set_screensaver_inhibited(&mut self, inhibited: bool);
    fn has_frame(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameResult {
    DataOk,
    Underrun,
    Eof,
}

pub trait Decoder: Send {
    fn reset(&mut self);
    fn work(&mut self);
    fn get_frame(&mut self) -> FrameResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStatus {
    Ok,
    Eof,
    Failed,
}

pub trait FilterGraph: Send {
    fn process(&mut self);
    fn send_frame(&mut self);
    fn send_status(&self) -> FilterStatus;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCmd {
    TogglePause,
    SeekRelative(i64),
    Quit,
}

pub trait Input: Send {
    fn read_cmd(&mut self) -> Option<InputCmd>;
    fn get_delay(&self) -> f64;
    fn mouse_event_counter(&self) -> u64;
}
