//! `PlayerContext` (PC): the single mutable hub.

use std::time::Duration;

use crate::collab::{AudioOutput, Decoder, Demuxer, FilterGraph, Input, VideoOutput};
use crate::dispatch::{DispatchHandle, DispatchQueue};
use crate::events::{NullEventSink, PlayerEventSink};
use crate::options::PlaybackOptions;
use crate::time::{Clock, Pts, Timekeeper};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekType {
    #[default]
    None,
    Relative,
    Absolute,
    Factor,
    Backstep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Precision {
    Keyframe,
    #[default]
    Default,
    Exact,
    VeryExact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeekFlags {
    pub delay: bool,
    pub noflush: bool,
}

impl SeekFlags {
    pub fn or(self, other: SeekFlags) -> SeekFlags {
        SeekFlags {
            delay: self.delay || other.delay,
            noflush: self.noflush || other.noflush,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeekRequest {
    pub kind: SeekType,
    pub amount: f64,
    pub exact: Precision,
    pub flags: SeekFlags,
}

impl SeekRequest {
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.kind == SeekType::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ChainStatus {
    #[default]
    None,
    Syncing,
    Ready,
    Playing,
    Draining,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopPlay {
    #[default]
    KeepPlaying,
    AtEndOfFile,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub pts: f64,
    pub title: Option<String>,
}

/// The single mutable hub every handler in this crate operates on.
///
/// External collaborators are held behind `Option<Box<dyn Trait>>` —
/// generalizing termusic's `Backend` enum (`playback/src/lib.rs`) from a
/// closed set of concrete backends to an open trait object, since these
/// collaborators (demuxer, AO, VO, decoders, filter graph, input) are each
/// genuinely distinct capabilities rather than interchangeable
/// implementations of one interface.
pub struct PlayerContext {
    pub demuxer: Option<Box<dyn Demuxer>>,
    pub audio_output: Option<Box<dyn AudioOutput>>,
    pub video_output: Option<Box<dyn VideoOutput>>,
    pub video_decoder: Option<Box<dyn Decoder>>,
    pub audio_decoder: Option<Box<dyn Decoder>>,
    pub filter_graph: Option<Box<dyn FilterGraph>>,
    pub input: Option<Box<dyn Input>>,

    pub(crate) clock: Clock,
    pub(crate) timekeeper: Timekeeper,
    dispatch: DispatchQueue,
    pub(crate) self_handle: DispatchHandle,

    pub options: PlaybackOptions,

    // Clocking
    pub sleeptime: f64,
    pub in_dispatch: bool,
    pub start_timestamp: f64,
    /// Accumulator the video scheduler reads; the timekeeper subtracts
    /// elapsed pause time from this on entering pause.
    pub time_frame: f64,

    // Playback state
    pub user_pause: bool,
    pub paused: bool,
    pub paused_for_cache: bool,
    pub playing: bool,
    pub playback_initialized: bool,
    pub restart_complete: bool,
    pub in_playloop: bool,
    pub eof: bool,
    pub stop_play: StopPlay,
    pub step_frames: i32,
    pub video_status: ChainStatus,
    pub audio_status: ChainStatus,

    // Time & PTS
    pub playback_pts: Pts,
    pub last_seek_pts: Pts,
    pub last_vo_pts: Pts,
    pub video_pts: Pts,
    pub hrseek_active: bool,
    pub hrseek_pts: Pts,
    pub hrseek_framedrop: bool,
    pub hrseek_backstep: bool,
    pub hrseek_lastframe: bool,
    /// Set by the seek executor; consumed by the audio pipeline to decide
    /// whether it may retry an overshot backward seek.
    pub audio_allow_second_chance_seek: bool,

    // Seek request
    pub seek: SeekRequest,
    pub current_seek: Option<SeekRequest>,

    // Caching
    pub cache_buffer: f64,
    pub cache_stop_time: Option<f64>,
    pub next_cache_update: f64,

    // Chapters / loop
    pub chapters: Vec<Chapter>,
    pub last_chapter: i64,
    pub last_chapter_seek: i64,
    pub ab_loop_clip: bool,

    // Window / cursor
    pub mouse_event_ts: f64,
    pub mouse_timer: f64,
    pub mouse_cursor_visible: bool,
    pub force_vo_active: bool,

    // Idle-loop / playlist proxy (playlist management itself is out of
    // scope; this is the minimal signal the core needs).
    pub has_current_entry: bool,
    pub has_next_entry: bool,
    pub player_idle_mode: bool,
    /// Set by the cache controller when EOF is reached with a next entry
    /// queued and the cache is idle; the host polls and clears it.
    pub prefetch_ready: bool,

    playing_msg_shown: bool,
}

impl PlayerContext {
    #[must_use]
    pub fn new(options: PlaybackOptions) -> Self {
        let clock = Clock::new();
        let timekeeper = Timekeeper::new(&clock);
        let (dispatch, self_handle) = DispatchQueue::new();
        Self {
            demuxer: None,
            audio_output: None,
            video_output: None,
            video_decoder: None,
            audio_decoder: None,
            filter_graph: None,
            input: None,

            clock,
            timekeeper,
            dispatch,
            self_handle,

            options,

            sleeptime: f64::INFINITY,
            in_dispatch: false,
            start_timestamp: 0.0,
            time_frame: 0.0,

            user_pause: false,
            paused: false,
            paused_for_cache: false,
            playing: false,
            playback_initialized: false,
            restart_complete: false,
            in_playloop: false,
            eof: false,
            stop_play: StopPlay::KeepPlaying,
            step_frames: 0,
            video_status: ChainStatus::None,
            audio_status: ChainStatus::None,

            playback_pts: None,
            last_seek_pts: None,
            last_vo_pts: None,
            video_pts: None,
            hrseek_active: false,
            hrseek_pts: None,
            hrseek_framedrop: false,
            hrseek_backstep: false,
            hrseek_lastframe: false,
            audio_allow_second_chance_seek: false,

            seek: SeekRequest::default(),
            current_seek: None,

            cache_buffer: 100.0,
            cache_stop_time: None,
            next_cache_update: 0.0,

            chapters: Vec::new(),
            last_chapter: -2,
            last_chapter_seek: -2,
            ab_loop_clip: true,

            mouse_event_ts: 0.0,
            mouse_timer: 0.0,
            mouse_cursor_visible: true,
            force_vo_active: false,

            has_current_entry: false,
            has_next_entry: false,
            player_idle_mode: true,
            prefetch_ready: false,

            playing_msg_shown: false,
        }
    }

    /// `playback_active`: the user-facing "is actually advancing" flag.
    #[must_use]
    pub fn playback_active(&self) -> bool {
        !self.paused
            && self.restart_complete
            && self.playing
            && self.in_playloop
            && !self.eof
    }

    #[must_use]
    pub fn dispatch_handle(&self) -> DispatchHandle {
        self.self_handle.clone()
    }

    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// `set_timeout(PC, t)`: tighten the next `wait_events` deadline to at
    /// most `t` seconds from now.
    pub fn set_timeout(&mut self, t: f64) {
        self.sleeptime = self.sleeptime.min(t);
        if self.in_dispatch && t.is_finite() {
            self.wakeup();
        }
    }

    /// `wakeup(PC)`.
    pub fn wakeup(&self) {
        self.self_handle.interrupt();
    }

    /// `wait_events(PC)` — the sole blocking point in the playloop.
    pub fn wait_events(&mut self) {
        self.in_dispatch = true;
        let timeout = self.sleeptime;
        // Temporarily take the queue out so `process` can hand back `&mut
        // self` to queued jobs without a borrow conflict.
        let dispatch = std::mem::replace(&mut self.dispatch, DispatchQueue::new().0);
        dispatch.process(self, timeout);
        self.dispatch = dispatch;
        self.in_dispatch = false;
        self.sleeptime = f64::INFINITY;
    }

    pub(crate) fn mark_playing_msg_shown(&mut self) -> bool {
        let was_shown = self.playing_msg_shown;
        self.playing_msg_shown = true;
        !was_shown
    }

    pub(crate) fn reset_playing_msg(&mut self) {
        self.playing_msg_shown = false;
    }

    #[must_use]
    pub fn sleep_duration(timeout: f64) -> Option<Duration> {
        if timeout.is_finite() && timeout > 0.0 {
            Some(Duration::from_secs_f64(timeout))
        } else {
            None
        }
    }
}
