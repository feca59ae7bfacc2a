//! Playback-restart synchronization.

use crate::context::ChainStatus;
use crate::context::PlayerContext;
use crate::events::{PlayerEvent, PlayerEventSink};

impl PlayerContext {
    /// `handle_playback_restart`, called each playloop iteration.
    pub fn handle_playback_restart(&mut self, events: &mut dyn PlayerEventSink) {
        let video_present = self.video_decoder.is_some();
        let audio_present = self.audio_decoder.is_some();

        let video_ready = !video_present || self.video_status >= ChainStatus::Ready;
        let audio_ready = !audio_present || self.audio_status >= ChainStatus::Ready;
        if !video_ready || !audio_ready {
            return;
        }

        if self.options.cache_pause_initial
            && (self.video_status == ChainStatus::Ready || self.audio_status == ChainStatus::Ready)
        {
            self.paused_for_cache = true;
            self.cache_buffer = 0.0;
            self.update_internal_pause_state(events);
        }

        if self.video_status == ChainStatus::Ready {
            // Consume the accumulated delta so promoting to PLAYING doesn't
            // look like a frame-time jump.
            let _ = self.timekeeper.relative_time(&self.clock);
            self.video_status = ChainStatus::Playing;
            self.wakeup();
        }

        if self.audio_status == ChainStatus::Ready {
            if !self.seek.is_none() && self.video_status == ChainStatus::Playing {
                self.update_playback_time();
                self.execute_queued_seek(events);
                return;
            }
            // Commit the prepared audio buffer.
            self.audio_status = ChainStatus::Playing;
        }

        if !self.restart_complete {
            self.hrseek_active = false;
            self.restart_complete = true;
            self.current_seek = None;
            self.update_playback_time();
            events.emit(PlayerEvent::PlaybackRestart);
            self.update_core_idle_state(events);
            if self.mark_playing_msg_shown() {
                log::info!(
                    "{}",
                    self.options
                        .playing_msg
                        .as_deref()
                        .unwrap_or("Playing")
                );
            }
            self.reevaluate_ab_loop_clip();
            self.wakeup();
        }
    }

    fn reevaluate_ab_loop_clip(&mut self) {
        if let (Some(p), Some(b)) = (self.last_seek_pts.or(self.playback_pts), self.options.ab_loop[1]) {
            self.ab_loop_clip = p < b;
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingEventSink;
    use crate::options::PlaybackOptions;

    #[test]
    fn restart_promotes_both_chains_and_emits_once() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.video_decoder = Some(Box::new(NoopDecoder));
        pc.audio_decoder = Some(Box::new(NoopDecoder));
        pc.video_status = ChainStatus::Ready;
        pc.audio_status = ChainStatus::Ready;

        let mut events = RecordingEventSink::default();
        pc.handle_playback_restart(&mut events);

        assert_eq!(pc.video_status, ChainStatus::Playing);
        assert_eq!(pc.audio_status, ChainStatus::Playing);
        assert!(pc.restart_complete);
        assert_eq!(events.count(PlayerEvent::PlaybackRestart), 1);

        // Calling again must not re-emit.
        pc.handle_playback_restart(&mut events);
        assert_eq!(events.count(PlayerEvent::PlaybackRestart), 1);
    }

    #[test]
    fn restart_waits_for_both_chains() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.video_decoder = Some(Box::new(NoopDecoder));
        pc.audio_decoder = Some(Box::new(NoopDecoder));
        pc.video_status = ChainStatus::Ready;
        pc.audio_status = ChainStatus::Syncing;

        let mut events = RecordingEventSink::default();
        pc.handle_playback_restart(&mut events);
        assert!(!pc.restart_complete);
        assert_eq!(pc.video_status, ChainStatus::Ready, "must not promote alone");
    }

    struct NoopDecoder;
    impl crate::collab::Decoder for NoopDecoder {
        fn reset(&mut self) {}
        fn work(&mut self) {}
        fn get_frame(&mut self) -> crate::collab::FrameResult {
            crate::collab::FrameResult::DataOk
        }
    }
}
