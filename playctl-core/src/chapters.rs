//! Chapter tracking.

use crate::context::{Chapter, PlayerContext};
use crate::events::{PlayerEvent, PlayerEventSink};

impl PlayerContext {
    /// Populate the chapter list, grounded on how termusic's `Playlist::new`
    /// loads state at construction time rather than mutating it piecemeal.
    /// Resets `last_chapter`/`last_chapter_seek` so tracking starts fresh.
    pub fn set_chapters(&mut self, chapters: Vec<Chapter>) {
        self.chapters = chapters;
        self.last_chapter = -2;
        self.last_chapter_seek = -2;
    }

    /// `current_chapter()`: `max(last_chapter_seek, i-1)` where `i` is the
    /// smallest index with `chapters[i].pts > now`; `-2` with no chapters.
    #[must_use]
    pub fn current_chapter(&self) -> i64 {
        if self.chapters.is_empty() {
            return -2;
        }
        let now = self.get_current_time().unwrap_or(0.0);
        let i = self
            .chapters
            .iter()
            .position(|c| c.pts > now)
            .unwrap_or(self.chapters.len());
        let from_index = i as i64 - 1;
        self.last_chapter_seek.max(from_index)
    }

    /// `notify_chapter_change(PC)`, run once per playloop iteration.
    pub fn notify_chapter_change(&mut self, events: &mut dyn PlayerEventSink) {
        let current = self.current_chapter();
        if current != self.last_chapter {
            log::debug!("chapter changed: {} -> {current}", self.last_chapter);
            self.last_chapter = current;
            events.emit(PlayerEvent::ChapterChange);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Chapter;
    use crate::events::RecordingEventSink;
    use crate::options::PlaybackOptions;

    fn chapters() -> Vec<Chapter> {
        vec![
            Chapter { pts: 0.0, title: None },
            Chapter { pts: 10.0, title: None },
            Chapter { pts: 20.0, title: None },
        ]
    }

    #[test]
    fn set_chapters_resets_tracking_state() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.last_chapter = 3;
        pc.last_chapter_seek = 2;

        pc.set_chapters(chapters());

        assert_eq!(pc.last_chapter, -2);
        assert_eq!(pc.last_chapter_seek, -2);
        assert_eq!(pc.chapters.len(), 3);
    }

    #[test]
    fn no_chapters_reports_minus_two() {
        let pc = PlayerContext::new(PlaybackOptions::default());
        assert_eq!(pc.current_chapter(), -2);
    }

    #[test]
    fn chapter_tracks_playback_position() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.chapters = chapters();
        pc.playback_pts = Some(15.0);
        assert_eq!(pc.current_chapter(), 1);

        pc.playback_pts = Some(25.0);
        assert_eq!(pc.current_chapter(), 2);
    }

    #[test]
    fn emits_change_exactly_when_value_changes() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.chapters = chapters();
        pc.playback_pts = Some(1.0);
        let mut events = RecordingEventSink::default();

        pc.notify_chapter_change(&mut events);
        assert_eq!(events.count(PlayerEvent::ChapterChange), 1);

        pc.notify_chapter_change(&mut events);
        assert_eq!(events.count(PlayerEvent::ChapterChange), 1, "no spurious re-emit");

        pc.playback_pts = Some(15.0);
        pc.notify_chapter_change(&mut events);
        assert_eq!(events.count(PlayerEvent::ChapterChange), 2);
    }
}
