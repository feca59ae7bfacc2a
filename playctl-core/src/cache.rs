//! Cache-pause controller: pauses playback on demuxer underrun and resumes
//! once the reader has buffered back up.

use crate::context::PlayerContext;
use crate::events::{PlayerEvent, PlayerEventSink};

/// How long an active cache-pause re-checks before the next poll.
const RECHECK_INTERVAL: f64 = 0.2;
/// Trailing re-poll interval while the cache is busy or a property push is
/// still due.
const REPOLL_INTERVAL: f64 = 0.25;

impl PlayerContext {
    /// `update_cache_state(PC)`, run each iteration while a demuxer exists.
    pub fn update_cache_state(&mut self, events: &mut dyn PlayerEventSink) {
        let Some(demuxer) = self.demuxer.as_deref() else {
            return;
        };
        let cache = demuxer.cache_info();
        let reader = demuxer.reader_state();
        let use_pause_on_low_cache = cache.size > 0 || demuxer.is_network();

        let prev_buffer = self.cache_buffer;

        if self.restart_complete && use_pause_on_low_cache {
            if self.paused_for_cache {
                let may_resume = !reader.underrun
                    && (!self.options.cache_pause
                        || reader.idle
                        || reader.ts_duration >= self.options.cache_pause_wait);
                if may_resume {
                    log::debug!("cache recovered, leaving cache-pause");
                    self.paused_for_cache = false;
                    self.cache_stop_time = None;
                    self.update_internal_pause_state(events);
                } else {
                    self.set_timeout(RECHECK_INTERVAL);
                }
            } else if self.options.cache_pause && reader.underrun {
                log::debug!("demuxer underrun, entering cache-pause");
                self.paused_for_cache = true;
                self.cache_stop_time = Some(self.now());
                self.update_internal_pause_state(events);
            }
        }

        self.cache_buffer = if self.paused_for_cache {
            100.0 * (reader.ts_duration / self.options.cache_pause_wait).clamp(0.0, 0.99)
        } else {
            100.0
        };

        let cache_busy = !reader.idle && cache.size > 0;
        let trailing_update_due = self.now() >= self.next_cache_update;
        let crossed_full = prev_buffer < 100.0 && self.cache_buffer >= 100.0;
        let mut should_emit = trailing_update_due && self.next_cache_update > 0.0;

        if cache_busy || trailing_update_due {
            self.next_cache_update = self.now() + REPOLL_INTERVAL;
            self.set_timeout(REPOLL_INTERVAL);
        }

        if (self.cache_buffer - prev_buffer).abs() > f64::EPSILON || crossed_full {
            should_emit = true;
        }
        if should_emit {
            events.emit(PlayerEvent::CacheUpdate);
        }

        if self.eof && !cache_busy && self.has_next_entry {
            // Prefetch of the next playlist entry: playlist management is
            // out of scope, so this only flags readiness for the host to
            // act on; it owns `has_next_entry` and polls it here.
            self.prefetch_ready = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{CacheInfo, Demuxer, DemuxSeekFlags, ReaderState};
    use crate::error::PlaybotError;
    use crate::events::RecordingEventSink;
    use crate::options::PlaybackOptions;
    use crate::time::Pts;

    struct FakeDemuxer {
        cache: CacheInfo,
        reader: ReaderState,
        network: bool,
    }

    impl Demuxer for FakeDemuxer {
        fn duration(&self) -> Pts {
            Some(100.0)
        }
        fn seekable(&self) -> bool {
            true
        }
        fn ts_resets_possible(&self) -> bool {
            false
        }
        fn is_network(&self) -> bool {
            self.network
        }
        fn filepos(&self) -> i64 {
            0
        }
        fn seek(&mut self, _pts: Pts, _flags: DemuxSeekFlags) -> Result<(), PlaybotError> {
            Ok(())
        }
        fn reader_state(&self) -> ReaderState {
            self.reader
        }
        fn cache_info(&self) -> CacheInfo {
            self.cache
        }
        fn stream_size(&self) -> Option<i64> {
            None
        }
    }

    fn pc_with(reader: ReaderState, cache: CacheInfo) -> PlayerContext {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.demuxer = Some(Box::new(FakeDemuxer {
            cache,
            reader,
            network: false,
        }));
        pc.restart_complete = true;
        pc
    }

    #[derive(Debug, PartialEq)]
    struct PauseSnapshot {
        paused_for_cache: bool,
        paused: bool,
        has_cache_stop_time: bool,
    }

    #[test]
    fn enters_cache_pause_on_underrun() {
        let mut pc = pc_with(
            ReaderState {
                underrun: true,
                ..Default::default()
            },
            CacheInfo { idle: false, size: 1024 },
        );
        pc.options.cache_pause = true;
        let mut events = RecordingEventSink::default();

        pc.update_cache_state(&mut events);

        let got = PauseSnapshot {
            paused_for_cache: pc.paused_for_cache,
            paused: pc.paused,
            has_cache_stop_time: pc.cache_stop_time.is_some(),
        };
        let want = PauseSnapshot {
            paused_for_cache: true,
            paused: true,
            has_cache_stop_time: true,
        };
        pretty_assertions::assert_eq!(got, want);
    }

    #[test]
    fn resumes_once_cache_recovers() {
        let mut pc = pc_with(
            ReaderState {
                underrun: false,
                ts_duration: 5.0,
                ..Default::default()
            },
            CacheInfo { idle: false, size: 1024 },
        );
        pc.options.cache_pause = true;
        pc.options.cache_pause_wait = 1.0;
        pc.paused_for_cache = true;
        pc.paused = true;
        let mut events = RecordingEventSink::default();

        pc.update_cache_state(&mut events);

        assert!(!pc.paused_for_cache);
        assert_eq!(events.count(PlayerEvent::Pause), 0);
        assert_eq!(events.count(PlayerEvent::Unpause), 1);
    }

    #[test]
    fn cache_buffer_bounded_while_paused() {
        let mut pc = pc_with(
            ReaderState {
                underrun: true,
                ts_duration: 10.0,
                ..Default::default()
            },
            CacheInfo { idle: false, size: 1024 },
        );
        pc.options.cache_pause_wait = 1.0;
        pc.paused_for_cache = true;
        let mut events = RecordingEventSink::default();

        pc.update_cache_state(&mut events);

        assert!(pc.cache_buffer <= 99.0);
        assert!(pc.cache_buffer >= 0.0);
    }
}
