//! Recognized playback options, the subset of the config surface relevant
//! to the core.
//!
//! Kept as a plain serde struct with `#[serde(default)]` throughout, the way
//! `ServerSettings` is built up in termusic's `lib/src/config/v2/server`
//! — the core crate only ever sees the resolved struct, never the
//! figment/clap machinery that produced it.

use serde::{Deserialize, Serialize};

/// `hr_seek` tri-state: negative disables high-resolution seeking, zero is
/// "default" (let the executor decide based on seek precision), positive
/// forces it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HrSeekMode {
    Off,
    Default,
    On,
}

impl Default for HrSeekMode {
    fn default() -> Self {
        Self::Default
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopFile {
    Off,
    /// Loop a finite number of additional times.
    Count(u64),
    Infinite,
}

impl Default for LoopFile {
    fn default() -> Self {
        Self::Off
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeepOpen {
    /// 0: never keep the window/pipeline open past EOF.
    Never,
    /// 1: keep open only if there is no next playlist entry.
    IfNoNext,
    /// 2: always keep open at EOF regardless of playlist.
    Always,
}

impl Default for KeepOpen {
    fn default() -> Self {
        Self::Never
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceVo {
    Never,
    WhenLoaded,
    Always,
}

impl Default for ForceVo {
    fn default() -> Self {
        Self::Never
    }
}

/// `-2` force hide, `-1` force show, otherwise an autohide delay in
/// milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorAutohide {
    ForceHide,
    ForceShow,
    DelayMs(u64),
}

impl Default for CursorAutohide {
    fn default() -> Self {
        Self::DelayMs(1000)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackOptions {
    pub pause: bool,
    pub correct_pts: bool,
    pub hr_seek: HrSeekMode,
    pub hr_seek_framedrop: bool,
    pub hr_seek_demuxer_offset: f64,
    pub cache_pause: bool,
    pub cache_pause_wait: f64,
    pub cache_pause_initial: bool,
    pub ab_loop: [Option<f64>; 2],
    pub loop_file: LoopFile,
    pub loop_times: i64,
    pub keep_open: KeepOpen,
    pub keep_open_pause: bool,
    pub step_sec: f64,
    pub cursor_autohide: CursorAutohide,
    pub cursor_autohide_fs: bool,
    pub stop_screensaver: bool,
    pub force_vo: ForceVo,
    pub playing_msg: Option<String>,
    pub osd_playing_msg: Option<String>,
    pub play_frames: i64,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            pause: false,
            correct_pts: true,
            hr_seek: HrSeekMode::default(),
            hr_seek_framedrop: true,
            hr_seek_demuxer_offset: 0.0,
            cache_pause: true,
            cache_pause_wait: 1.0,
            cache_pause_initial: false,
            ab_loop: [None, None],
            loop_file: LoopFile::default(),
            loop_times: 1,
            keep_open: KeepOpen::default(),
            keep_open_pause: false,
            step_sec: 0.0,
            cursor_autohide: CursorAutohide::default(),
            cursor_autohide_fs: false,
            stop_screensaver: true,
            force_vo: ForceVo::default(),
            playing_msg: None,
            osd_playing_msg: None,
            play_frames: 0,
        }
    }
}
