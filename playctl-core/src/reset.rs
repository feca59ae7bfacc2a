//! Pipeline reset.

use crate::context::{PlayerContext, SeekRequest};
use crate::events::PlayerEventSink;

impl PlayerContext {
    /// `reset_playback_state(PC)`.
    pub fn reset_playback_state(&mut self, events: &mut dyn PlayerEventSink) {
        if let Some(filter) = self.filter_graph.as_deref_mut() {
            // Drain: push until nothing more comes out, bounded so a
            // collaborator that never reports non-`Ok` can't hang us.
            const MAX_DRAIN_STEPS: u32 = 64;
            for _ in 0..MAX_DRAIN_STEPS {
                filter.process();
                if filter.send_status() != crate::collab::FilterStatus::Ok {
                    break;
                }
            }
        }
        if let Some(decoder) = self.video_decoder.as_deref_mut() {
            decoder.reset();
        }
        if let Some(decoder) = self.audio_decoder.as_deref_mut() {
            decoder.reset();
        }

        self.video_status = crate::context::ChainStatus::None;
        self.audio_status = crate::context::ChainStatus::None;
        self.video_pts = None;
        self.last_vo_pts = None;
        self.eof = false;

        self.hrseek_active = false;
        self.hrseek_pts = None;
        self.hrseek_framedrop = false;
        self.hrseek_backstep = false;
        self.hrseek_lastframe = false;
        self.current_seek = None;

        self.playback_pts = None;
        self.last_seek_pts = None;
        self.step_frames = 0;
        self.ab_loop_clip = true;
        self.restart_complete = false;
        self.reset_playing_msg();

        // Encoder discontinuity notification: out of scope collaborator,
        // nothing to call here.

        self.update_core_idle_state(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEventSink;
    use crate::options::PlaybackOptions;

    #[test]
    fn reset_clears_pts_and_hrseek_flags() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.playback_pts = Some(5.0);
        pc.last_seek_pts = Some(5.0);
        pc.hrseek_active = true;
        pc.hrseek_pts = Some(5.0);
        pc.hrseek_framedrop = true;
        pc.hrseek_backstep = true;
        pc.step_frames = 3;
        pc.current_seek = Some(SeekRequest::default());

        pc.reset_playback_state(&mut NullEventSink);

        assert_eq!(pc.playback_pts, None);
        assert_eq!(pc.last_seek_pts, None);
        assert!(!pc.hrseek_active);
        assert_eq!(pc.hrseek_pts, None);
        assert!(!pc.hrseek_framedrop);
        assert!(!pc.hrseek_backstep);
        assert_eq!(pc.step_frames, 0);
        assert!(pc.current_seek.is_none());
        assert!(pc.ab_loop_clip);
        assert!(!pc.restart_complete);
    }
}
