//! Idle loop: a trimmed playloop that runs while there is no current
//! playlist entry to actually play.

use crate::context::{PlayerContext, StopPlay};
use crate::events::{PlayerEvent, PlayerEventSink};

impl PlayerContext {
    #[must_use]
    pub fn should_run_idle_loop(&self) -> bool {
        self.player_idle_mode && !self.has_current_entry && self.stop_play != StopPlay::Quit
    }

    /// One entry into the idle loop: tear down AO, force a window, wake, and
    /// emit `IDLE` once.
    pub fn enter_idle_loop(&mut self, events: &mut dyn PlayerEventSink) {
        self.audio_output = None;
        self.force_window(true, events);
        self.wakeup();
        events.emit(PlayerEvent::Idle);
    }

    /// `idle(PC)` — one trimmed iteration: dummy ticks, `wait_events`, input,
    /// command updates, cursor autohide, VO events, OSD message, OSD redraw.
    pub fn idle(&mut self, events: &mut dyn PlayerEventSink) {
        events.emit(PlayerEvent::Tick);
        self.wait_events();
        self.drain_input_commands(events);
        self.update_cursor_autohide();
        self.drain_vo_events(events);
        // OSD message/redraw: the core has no OSD surface of its own (that's
        // a client concern); this is the seam a host renders into.
    }

    fn drain_input_commands(&mut self, events: &mut dyn PlayerEventSink) {
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
                crate::collab::InputCmd::SeekRelative(_) => {
                    // Nothing to seek in while idle: no demuxer is loaded.
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{PlayerEvent, RecordingEventSink};
    use crate::options::PlaybackOptions;

    #[test]
    fn idle_loop_condition_respects_quit() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        assert!(pc.should_run_idle_loop());
        pc.stop_play = StopPlay::Quit;
        assert!(!pc.should_run_idle_loop());
    }

    #[test]
    fn entering_idle_loop_tears_down_audio_and_emits_once() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.audio_output = Some(Box::new(NoopAo));
        let mut events = RecordingEventSink::default();

        pc.enter_idle_loop(&mut events);

        assert!(pc.audio_output.is_none());
        assert_eq!(events.count(PlayerEvent::Idle), 1);
    }

    struct NoopAo;
    impl crate::collab::AudioOutput for NoopAo {
        fn pause(&mut self) {}
        fn resume(&mut self) {}
        fn drain(&mut self) {}
    }
}
