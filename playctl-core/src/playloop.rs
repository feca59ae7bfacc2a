//! The fixed-order playloop body and `run_playloop`, the top-level driver a
//! host binds to a thread. Ported from termusic's
//! `player_loop` (`server/src/server.rs`), which alternates command-queue
//! draining with a blocking `recv` the same way this alternates handler
//! passes with `wait_events`.

use crate::context::{PlayerContext, StopPlay};
use crate::events::{PlayerEvent, PlayerEventSink};

/// How often a dummy `TICK` is emitted while paused or at EOF, so clients
/// polling position don't stall.
const DUMMY_TICK_INTERVAL: f64 = 0.05;
/// OSD redraw's self-imposed refresh cadence.
const OSD_REDRAW_INTERVAL: f64 = 0.1;

impl PlayerContext {
    /// One playloop iteration, in the exact fixed step order below.
    /// Returns `false` once `stop_play` has moved away from `KEEP_PLAYING`
    /// and the loop should exit (the idle loop is driven separately).
    pub fn playloop_step(&mut self, events: &mut dyn PlayerEventSink) -> bool {
        self.in_playloop = true;

        // 1. Fail-fast on encoder error.
        if self.stop_play == StopPlay::Quit {
            return false;
        }

        // 2. Refresh demuxer properties.
        // Handled implicitly: every handler below reads straight through the
        // `Demuxer` trait, so there is no separate cached snapshot to
        // refresh in this design.

        // 3. Push/pull frames through the complex filter graph.
        if let Some(filter) = self.filter_graph.as_deref_mut() {
            filter.send_frame();
        }

        // 4. Cursor autohide; VO event drain; command-queue updates.
        self.update_cursor_autohide();
        self.drain_vo_events(events);

        // 5. Process the complex filter graph; reflect failure as EOF.
        if let Some(filter) = self.filter_graph.as_deref_mut() {
            filter.process();
            if filter.send_status() == crate::collab::FilterStatus::Failed {
                self.video_status = crate::context::ChainStatus::Eof;
                self.audio_status = crate::context::ChainStatus::Eof;
            }
        }

        // 6. Fill audio output; write video.
        self.drive_decoders();

        // 7. Playback-restart sync.
        self.handle_playback_restart(events);

        // 8. Update playback_pts.
        self.update_playback_time();

        // 9. Emit a dummy tick if EOF/paused and the interval has elapsed.
        if (self.eof || self.paused) && self.now() - self.last_tick_at() >= DUMMY_TICK_INTERVAL {
            events.emit(PlayerEvent::Tick);
            self.set_timeout(DUMMY_TICK_INTERVAL);
        }

        // 10. Update OSD; push subtitles if video at EOF.
        // No OSD/subtitle surface owned by this core (client concern).

        // 11. EOF / loop-file / keep-open / step handlers.
        self.handle_eof();
        self.handle_loop_file(events);
        self.handle_keep_open(events);
        self.handle_sstep(events);

        // 12. Update idle; bail if stop_play.
        self.update_core_idle_state(events);
        if self.stop_play != StopPlay::KeepPlaying {
            return false;
        }

        // 13. OSD redraw handler (may set a 100 ms timeout).
        self.set_timeout(OSD_REDRAW_INTERVAL);

        // 14. wait_events — the sole blocking point.
        self.wait_events();

        // 15. Cache-pause controller; input drain; chapter change notify;
        // force-window(false); execute queued seek.
        self.update_cache_state(events);
        self.drain_input_during_playback(events);
        self.notify_chapter_change(events);
        self.force_window(false, events);
        self.execute_queued_seek(events);

        true
    }

    fn last_tick_at(&self) -> f64 {
        self.start_timestamp
    }

    /// Decoder init itself (the `NONE → READY` transition) is out of scope —
    /// decoders are an external collaborator this core only drives, never
    /// initializes — so this promotes a freshly attached chain to `READY`
    /// on its first `work()`
    /// so `handle_playback_restart` has something to synchronize on.
    fn drive_decoders(&mut self) {
        if let Some(decoder) = self.video_decoder.as_deref_mut() {
            decoder.work();
            match decoder.get_frame() {
                crate::collab::FrameResult::Eof => {
                    self.video_status = crate::context::ChainStatus::Eof;
                }
                _ if self.video_status == crate::context::ChainStatus::None => {
                    self.video_status = crate::context::ChainStatus::Ready;
                }
                _ => {}
            }
        }
        if let Some(decoder) = self.audio_decoder.as_deref_mut() {
            decoder.work();
            match decoder.get_frame() {
                crate::collab::FrameResult::Eof => {
                    self.audio_status = crate::context::ChainStatus::Eof;
                }
                _ if self.audio_status == crate::context::ChainStatus::None => {
                    self.audio_status = crate::context::ChainStatus::Ready;
                }
                _ => {}
            }
        }
    }

    fn drain_input_during_playback(&mut self, events: &mut dyn PlayerEventSink) {
        let Some(input) = self.input.as_deref_mut() else {
            return;
        };
        while let Some(cmd) = input.read_cmd() {
            match cmd {
                crate::collab::InputCmd::Quit => {
                    self.stop_play = StopPlay::Quit;
                    break;
                }
                crate::collab::InputCmd::TogglePause => {
                    let next = !self.user_pause;
                    self.set_pause_state(next, events);
                }
                crate::collab::InputCmd::SeekRelative(secs) => {
                    self.queue_seek(
                        crate::context::SeekType::Relative,
                        secs as f64,
                        crate::context::Precision::Default,
                        crate::context::SeekFlags::default(),
                    );
                }
            }
        }
    }

    /// `run_playloop(PC)`: drives the playloop until `stop_play` leaves
    /// `KEEP_PLAYING`, then — if the caller is still in idle mode — drives
    /// the trimmed idle loop instead of returning. Returns once
    /// `stop_play == PT_QUIT`.
    pub fn run_playloop(&mut self, events: &mut dyn PlayerEventSink) {
        loop {
            if self.should_run_idle_loop() {
                self.enter_idle_loop(events);
                while self.should_run_idle_loop() {
                    self.idle(events);
                }
                if self.stop_play == StopPlay::Quit {
                    return;
                }
                continue;
            }

            self.in_playloop = true;
            while self.playloop_step(events) {}
            self.in_playloop = false;

            if self.stop_play == StopPlay::Quit {
                return;
            }
            if !self.should_run_idle_loop() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingEventSink;
    use crate::options::PlaybackOptions;

    #[test]
    fn playloop_step_stops_on_quit() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.stop_play = StopPlay::Quit;
        let mut events = RecordingEventSink::default();
        assert!(!pc.playloop_step(&mut events));
    }

    #[test]
    fn run_playloop_enters_idle_with_no_entry_and_then_quits() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.player_idle_mode = true;
        pc.has_current_entry = false;
        pc.input = Some(Box::new(QuitAfterOneRead { served: false }));
        // Pre-arm the wakeup so `wait_events` inside the idle loop returns
        // immediately instead of blocking on the condvar forever.
        pc.wakeup();
        let mut events = RecordingEventSink::default();

        pc.run_playloop(&mut events);

        assert_eq!(pc.stop_play, StopPlay::Quit);
    }

    struct QuitAfterOneRead {
        served: bool,
    }
    impl crate::collab::Input for QuitAfterOneRead {
        fn read_cmd(&mut self) -> Option<crate::collab::InputCmd> {
            if self.served {
                None
            } else {
                self.served = true;
                Some(crate::collab::InputCmd::Quit)
            }
        }
        fn get_delay(&self) -> f64 {
            0.0
        }
        fn mouse_event_counter(&self) -> u64 {
            0
        }
    }
}
