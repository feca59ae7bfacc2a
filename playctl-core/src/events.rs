//! Events emitted to the client/scripts.
//!
//! Grounded on `GeneralPlayer::send_stream_ev` in termusic (a broadcast
//! send that tolerates "no receivers" as a no-op): the core never assumes
//! anyone is listening, it just calls `PlayerEventSink::emit` and moves on.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    CoreIdle,
    Pause,
    Unpause,
    Seek,
    Tick,
    CacheUpdate,
    ChapterChange,
    PlaybackRestart,
    Idle,
    VideoReconfig,
    WinResize,
    WinState,
}

/// Delivery sink for [`PlayerEvent`]s. Implementations must not block or
/// fail loudly — a missing receiver is normal, not an error.
pub trait PlayerEventSink {
    fn emit(&mut self, event: PlayerEvent);
}

/// A sink that does nothing, useful for tests that don't care about events.
#[derive(Debug, Default)]
pub struct NullEventSink;

impl PlayerEventSink for NullEventSink {
    fn emit(&mut self, _event: PlayerEvent) {}
}

/// A sink that records everything it sees, in order — handy for asserting
/// on emission counts/ordering in tests, e.g. "exactly one
/// `PLAYBACK_RESTART`" style assertions.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    pub events: Vec<PlayerEvent>,
}

impl PlayerEventSink for RecordingEventSink {
    fn emit(&mut self, event: PlayerEvent) {
        self.events.push(event);
    }
}

impl RecordingEventSink {
    #[must_use]
    pub fn count(&self, event: PlayerEvent) -> usize {
        self.events.iter().filter(|e| **e == event).count()
    }
}

/// Wraps a closure as an event sink, the way the binary crate forwards
/// events onto its own broadcast channel without the core needing to know
/// about tokio.
pub struct FnEventSink<F: FnMut(PlayerEvent)>(pub F);

impl<F: FnMut(PlayerEvent)> PlayerEventSink for FnEventSink<F> {
    fn emit(&mut self, event: PlayerEvent) {
        (self.0)(event);
    }
}
