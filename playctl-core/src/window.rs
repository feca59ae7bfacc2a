//! Force-window, cursor autohide and VO event pump.

use crate::collab::VideoParams;
use crate::context::PlayerContext;
use crate::events::{PlayerEvent, PlayerEventSink};
use crate::options::{CursorAutohide, ForceVo};

/// Force-window's picked geometry when there's no real video track.
const FORCE_WIDTH: u32 = 960;
const FORCE_HEIGHT: u32 = 480;

impl PlayerContext {
    /// `force_window(PC, loaded)` — creates or tears down the VO when there's
    /// no video chain to drive one.
    pub fn force_window(&mut self, loaded: bool, events: &mut dyn PlayerEventSink) {
        let has_video_chain = self.video_decoder.is_some();
        let should_force = match self.options.force_vo {
            ForceVo::Never => false,
            ForceVo::WhenLoaded => loaded,
            ForceVo::Always => true,
        } && !has_video_chain;

        let Some(vo) = self.video_output.as_deref_mut() else {
            return;
        };

        if should_force && !self.force_vo_active {
            let formats = vo.query_formats();
            let Some(_format) = formats.first().copied() else {
                self.options.force_vo = ForceVo::Never;
                return;
            };
            let params = VideoParams {
                width: FORCE_WIDTH,
                height: FORCE_HEIGHT,
                par_num: 1,
                par_den: 1,
            };
            if let Err(err) = vo.reconfig(params) {
                log::error!("force-window reconfig failed: {err}");
                self.options.force_vo = ForceVo::Never;
                self.force_vo_active = false;
                return;
            }
            vo.set_paused(true);
            vo.redraw();
            self.force_vo_active = true;
            events.emit(PlayerEvent::VideoReconfig);
        } else if !should_force && self.force_vo_active {
            self.force_vo_active = false;
        }
    }

    /// Drain VO-reported events (resize/state-change) into player events.
    pub fn drain_vo_events(&mut self, events: &mut dyn PlayerEventSink) {
        let Some(vo) = self.video_output.as_deref_mut() else {
            return;
        };
        let reported = vo.query_and_reset_events();
        if reported.resize {
            events.emit(PlayerEvent::WinResize);
        }
        if reported.state_change {
            events.emit(PlayerEvent::WinState);
        }
    }

    /// `update_cursor_autohide(PC)`.
    pub fn update_cursor_autohide(&mut self) {
        let counter = self
            .input
            .as_deref()
            .map(crate::collab::Input::mouse_event_counter);
        if let Some(counter) = counter {
            let ts = counter as f64;
            if ts != self.mouse_event_ts {
                self.mouse_event_ts = ts;
                self.mouse_timer = self.now();
                self.set_cursor_visible(true);
            }
        }

        let delay_ms = match self.options.cursor_autohide {
            CursorAutohide::ForceHide => {
                self.set_cursor_visible(false);
                return;
            }
            CursorAutohide::ForceShow => {
                self.set_cursor_visible(true);
                return;
            }
            CursorAutohide::DelayMs(ms) => ms,
        };

        let elapsed = (self.now() - self.mouse_timer) * 1000.0;
        if elapsed >= delay_ms as f64 {
            self.set_cursor_visible(false);
        } else {
            self.set_timeout((delay_ms as f64 - elapsed) / 1000.0);
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if self.mouse_cursor_visible != visible {
            self.mouse_cursor_visible = visible;
            if let Some(vo) = self.video_output.as_deref_mut() {
                vo.set_cursor_visible(visible);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{VideoOutput, VoEvents};
    use crate::error::PlaybotError;
    use crate::events::RecordingEventSink;
    use crate::options::PlaybackOptions;

    struct FakeVo {
        formats: Vec<u32>,
        reconfigured: bool,
        cursor_visible: bool,
        events: VoEvents,
    }

    impl VideoOutput for FakeVo {
        fn set_paused(&mut self, _paused: bool) {}
        fn reconfig(&mut self, _params: VideoParams) -> Result<(), PlaybotError> {
            self.reconfigured = true;
            Ok(())
        }
        fn redraw(&mut self) {}
        fn query_formats(&self) -> Vec<u32> {
            self.formats.clone()
        }
        fn query_and_reset_events(&mut self) -> VoEvents {
            std::mem::take(&mut self.events)
        }
        fn set_cursor_visible(&mut self, visible: bool) {
            self.cursor_visible = visible;
        }
        fn set_screensaver_inhibited(&mut self, _inhibited: bool) {}
        fn has_frame(&self) -> bool {
            false
        }
    }

    #[test]
    fn force_window_creates_vo_when_no_video_chain() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.options.force_vo = ForceVo::Always;
        pc.video_output = Some(Box::new(FakeVo {
            formats: vec![1],
            reconfigured: false,
            cursor_visible: true,
            events: VoEvents::default(),
        }));
        let mut events = RecordingEventSink::default();

        pc.force_window(true, &mut events);

        assert!(pc.force_vo_active);
        assert_eq!(events.count(PlayerEvent::VideoReconfig), 1);
    }

    #[test]
    fn force_window_skips_when_real_video_chain_present() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.options.force_vo = ForceVo::Always;
        pc.video_decoder = Some(Box::new(NoopDecoder));
        pc.video_output = Some(Box::new(FakeVo {
            formats: vec![1],
            reconfigured: false,
            cursor_visible: true,
            events: VoEvents::default(),
        }));
        let mut events = RecordingEventSink::default();

        pc.force_window(true, &mut events);

        assert!(!pc.force_vo_active);
    }

    #[test]
    fn vo_events_translate_to_player_events() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.video_output = Some(Box::new(FakeVo {
            formats: vec![1],
            reconfigured: false,
            cursor_visible: true,
            events: VoEvents {
                resize: true,
                state_change: true,
            },
        }));
        let mut events = RecordingEventSink::default();

        pc.drain_vo_events(&mut events);

        assert_eq!(events.count(PlayerEvent::WinResize), 1);
        assert_eq!(events.count(PlayerEvent::WinState), 1);
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
