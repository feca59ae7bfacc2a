//! Simulated collaborators: minimal in-memory `Demuxer`/`AudioOutput`/
//! `VideoOutput`/`Decoder`/`FilterGraph`/`Input` implementations.
//!
//! These don't touch any real decode/render backend — they exist so the
//! playloop can be driven end to end (by unit tests and by
//! `playctl-server`'s demo binary) without the real collaborators this
//! core treats as out of scope. Grounded on termusic's `Rusty` backend
//! (`playback/src/rusty_backend/`), which is itself a pure-Rust, no
//! external-decoder-library stand-in for the same kind of playback
//! surface.

use std::collections::VecDeque;

use crate::collab::{
    AudioOutput, CacheInfo, DemuxSeekFlags, Demuxer, FilterGraph, FilterStatus, FrameResult,
    Input, InputCmd, ReaderState, VideoOutput, VideoParams, VoEvents,
};
use crate::error::PlaybotError;
use crate::time::Pts;

/// A demuxer over an in-memory, fixed-duration timeline.
pub struct SimDemuxer {
    pub duration: f64,
    pub seekable: bool,
    pub network: bool,
    pub position: f64,
    pub cache_size: i64,
    pub underrun: bool,
}

impl SimDemuxer {
    #[must_use]
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            seekable: true,
            network: false,
            position: 0.0,
            cache_size: 1024 * 1024,
            underrun: false,
        }
    }
}

impl Demuxer for SimDemuxer {
    fn duration(&self) -> Pts {
        Some(self.duration)
    }
    fn seekable(&self) -> bool {
        self.seekable
    }
    fn ts_resets_possible(&self) -> bool {
        false
    }
    fn is_network(&self) -> bool {
        self.network
    }
    fn filepos(&self) -> i64 {
        (self.position * 1_000_000.0) as i64
    }
    fn seek(&mut self, pts: Pts, flags: DemuxSeekFlags) -> Result<(), PlaybotError> {
        if !self.seekable && !flags.cached {
            return Err(PlaybotError::DemuxSeek("stream is not seekable".into()));
        }
        self.position = pts.unwrap_or(self.position).clamp(0.0, self.duration);
        Ok(())
    }
    fn reader_state(&self) -> ReaderState {
        ReaderState {
            idle: false,
            underrun: self.underrun,
            eof: self.position >= self.duration,
            ts_duration: if self.underrun { 0.0 } else { 2.0 },
        }
    }
    fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            idle: false,
            size: self.cache_size,
        }
    }
    fn stream_size(&self) -> Option<i64> {
        Some((self.duration * 1_000_000.0) as i64)
    }
}

/// An audio output that just tracks pause/resume/drain calls.
#[derive(Debug, Default)]
pub struct SimAudioOutput {
    pub paused: bool,
    pub drains: u32,
}

impl AudioOutput for SimAudioOutput {
    fn pause(&mut self) {
        self.paused = true;
    }
    fn resume(&mut self) {
        self.paused = false;
    }
    fn drain(&mut self) {
        self.drains += 1;
    }
}

/// A video output that records its last reconfig and paused state.
#[derive(Debug, Default)]
pub struct SimVideoOutput {
    pub paused: bool,
    pub params: Option<VideoParams>,
    pub cursor_visible: bool,
    pub screensaver_inhibited: bool,
    pub frame_available: bool,
    pub pending_events: VoEvents,
}

impl VideoOutput for SimVideoOutput {
    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
    fn reconfig(&mut self, params: VideoParams) -> Result<(), PlaybotError> {
        self.params = Some(params);
        Ok(())
    }
    fn redraw(&mut self) {}
    fn query_formats(&self) -> Vec<u32> {
        vec![0]
    }
    fn query_and_reset_events(&mut self) -> VoEvents {
        std::mem::take(&mut self.pending_events)
    }
    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }
    fn set_screensaver_inhibited(&mut self, inhibited: bool) {
        self.screensaver_inhibited = inhibited;
    }
    fn has_frame(&self) -> bool {
        self.frame_available
    }
}

/// A decoder that reports `DATA_OK` for `frames` calls to `work`, then EOF.
pub struct SimDecoder {
    pub frames_remaining: u32,
}

impl SimDecoder {
    #[must_use]
    pub fn new(frames: u32) -> Self {
        Self {
            frames_remaining: frames,
        }
    }
}

impl crate::collab::Decoder for SimDecoder {
    fn reset(&mut self) {}
    fn work(&mut self) {
        if self.frames_remaining > 0 {
            self.frames_remaining -= 1;
        }
    }
    fn get_frame(&mut self) -> FrameResult {
        if self.frames_remaining > 0 {
            FrameResult::DataOk
        } else {
            FrameResult::Eof
        }
    }
}

/// A filter graph that just passes everything through unchanged.
#[derive(Debug, Default)]
pub struct PassthroughFilterGraph;

impl FilterGraph for PassthroughFilterGraph {
    fn process(&mut self) {}
    fn send_frame(&mut self) {}
    fn send_status(&self) -> FilterStatus {
        FilterStatus::Eof
    }
}

/// An input collaborator backed by a plain queue — tests and the demo
/// binary push commands onto it from whatever thread originates them.
#[derive(Debug, Default)]
pub struct QueueInput {
    queue: VecDeque<InputCmd>,
    mouse_events: u64,
}

impl QueueInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: InputCmd) {
        self.queue.push_back(cmd);
    }

    pub fn bump_mouse(&mut self) {
        self.mouse_events += 1;
    }
}

impl Input for QueueInput {
    fn read_cmd(&mut self) -> Option<InputCmd> {
        self.queue.pop_front()
    }
    fn get_delay(&self) -> f64 {
        0.0
    }
    fn mouse_event_counter(&self) -> u64 {
        self.mouse_events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_demuxer_seek_clamps_to_duration() {
        let mut d = SimDemuxer::new(100.0);
        d.seek(Some(500.0), DemuxSeekFlags::default()).unwrap();
        assert_eq!(d.position, 100.0);
    }

    #[test]
    fn sim_demuxer_rejects_seek_when_unseekable_and_uncached() {
        let mut d = SimDemuxer::new(100.0);
        d.seekable = false;
        let result = d.seek(Some(10.0), DemuxSeekFlags::default());
        assert!(result.is_err());
    }

    #[test]
    fn queue_input_drains_in_order() {
        let mut input = QueueInput::new();
        input.push(InputCmd::TogglePause);
        input.push(InputCmd::Quit);
        assert_eq!(input.read_cmd(), Some(InputCmd::TogglePause));
        assert_eq!(input.read_cmd(), Some(InputCmd::Quit));
        assert_eq!(input.read_cmd(), None);
    }
}
