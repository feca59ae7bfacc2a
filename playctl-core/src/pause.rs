//! Pause reconciler.

use crate::context::PlayerContext;
use crate::events::{PlayerEvent, PlayerEventSink};

impl PlayerContext {
    /// `set_pause_state(PC, user_pause)`. `PAUSE`/`UNPAUSE` track the
    /// *effective* pause flag (`user_pause ∨ paused_for_cache`), not
    /// `user_pause` alone — a cache-driven pause/resume with no user input
    /// still gets exactly one event each way.
    pub fn set_pause_state(&mut self, user_pause: bool, events: &mut dyn PlayerEventSink) {
        self.user_pause = user_pause;

        let effective = self.user_pause || self.paused_for_cache;
        let changed = effective != self.paused;

        if changed {
            self.paused = effective;
            log::debug!(
                "pause state changed: user_pause={} paused_for_cache={} -> paused={}",
                self.user_pause, self.paused_for_cache, effective
            );

            if effective {
                if let Some(ao) = self.audio_output.as_deref_mut() {
                    ao.pause();
                }
            } else if let Some(ao) = self.audio_output.as_deref_mut() {
                ao.resume();
            }
            if let Some(vo) = self.video_output.as_deref_mut() {
                vo.set_paused(effective);
            }

            self.wakeup();

            if effective {
                self.step_frames = 0;
                // time_frame must not keep accruing while paused.
                let elapsed = self.timekeeper.relative_time(&self.clock);
                self.time_frame -= elapsed;
            } else {
                // Discard whatever accumulated while we were blocked.
                self.timekeeper.discard(&self.clock);
            }
        }

        self.update_core_idle_state(events);

        if changed {
            events.emit(if effective {
                PlayerEvent::Pause
            } else {
                PlayerEvent::Unpause
            });
        }
    }

    /// `update_internal_pause_state`: re-run reconciliation when
    /// `paused_for_cache` changed without the user touching pause.
    pub fn update_internal_pause_state(&mut self, events: &mut dyn PlayerEventSink) {
        let user_pause = self.user_pause;
        self.set_pause_state(user_pause, events);
    }

    /// Screensaver/idle-property bookkeeping alongside `playback_active`
    /// transitions; kept minimal since screensaver control is an
    /// out-of-scope VO capability the core only needs to *call*, not
    /// implement.
    pub fn update_core_idle_state(&mut self, events: &mut dyn PlayerEventSink) {
        let active = self.playback_active();
        if let Some(vo) = self.video_output.as_deref_mut() {
            vo.set_screensaver_inhibited(active && self.options.stop_screensaver);
        }
        if !active {
            events.emit(PlayerEvent::CoreIdle);
        }
    }
}
