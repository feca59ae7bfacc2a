//! Playback control core: the single-threaded event loop that coordinates
//! decoding, rendering, seeking, buffering-pause and EOF/loop semantics for
//! a media player.
//!
//! `playctl-server` is a thin binary around this crate: it supplies the
//! concrete collaborators (or, for the demo, the in-memory ones in
//! [`sim`]), logging, configuration and the thread that calls
//! [`PlayerContext::run_playloop`].

pub mod accessors;
pub mod cache;
pub mod chapters;
pub mod collab;
pub mod context;
pub mod dispatch;
pub mod eof;
pub mod error;
pub mod events;
pub mod idle;
pub mod options;
pub mod pause;
pub mod playloop;
pub mod reset;
pub mod restart;
pub mod seek;
pub mod sim;
pub mod time;
pub mod window;

pub use context::{Chapter, ChainStatus, PlayerContext, Precision, SeekFlags, SeekRequest, SeekType, StopPlay};
pub use dispatch::{DispatchHandle, DispatchJob, DispatchQueue};
pub use error::PlaybotError;
pub use events::{FnEventSink, NullEventSink, PlayerEvent, PlayerEventSink, RecordingEventSink};
pub use options::{CursorAutohide, ForceVo, HrSeekMode, KeepOpen, LoopFile, PlaybackOptions};
pub use time::{pts_add, Clock, Pts, Timekeeper, PTS_INFINITE};
