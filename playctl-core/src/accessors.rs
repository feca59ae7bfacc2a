//! Time/position accessors: `playback_pts` vs `last_seek_pts`, ratio;
//! chapter lookup lives in `chapters.rs`.

use crate::context::PlayerContext;
use crate::time::Pts;

impl PlayerContext {
    /// The authoritative current time: `playback_pts` once playing, else
    /// the still-pending seek target.
    #[must_use]
    pub fn get_current_time(&self) -> Pts {
        self.playback_pts.or(self.last_seek_pts)
    }

    /// Update the externally-visible "playback time" accessor.
    ///
    /// No decoder-reported PTS is modeled by this core (decoding itself is
    /// out of scope per spec.md §1), so in its absence this derives a
    /// position from the demuxer's byte-granular `filepos`/`stream_size`
    /// (spec.md §6) as a fraction of `duration` — the same fallback a
    /// demuxer without per-frame PTS tracking falls back to. Leaves
    /// `playback_pts` untouched (so callers keep falling through to
    /// `last_seek_pts` via `get_current_time`) when any of duration,
    /// stream size or demuxer itself is unavailable.
    pub fn update_playback_time(&mut self) {
        let Some(demuxer) = self.demuxer.as_deref() else {
            return;
        };
        let Some(duration) = demuxer.duration() else {
            return;
        };
        let Some(size) = demuxer.stream_size().filter(|&s| s > 0) else {
            return;
        };
        let fraction = (demuxer.filepos() as f64 / size as f64).clamp(0.0, 1.0);
        self.playback_pts = Some(fraction * duration);
    }

    /// Position as a fraction of total duration, if both are known.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        let pos = self.get_current_time()?;
        let dur = self.demuxer.as_deref()?.duration()?;
        if dur > 0.0 {
            Some((pos / dur).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{DemuxSeekFlags, Demuxer};
    use crate::options::PlaybackOptions;
    use crate::sim::SimDemuxer;

    #[test]
    fn update_playback_time_derives_position_from_filepos() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        let mut demuxer = SimDemuxer::new(100.0);
        demuxer
            .seek(Some(25.0), DemuxSeekFlags::default())
            .unwrap();
        pc.demuxer = Some(Box::new(demuxer));

        pc.update_playback_time();

        assert_eq!(pc.playback_pts, Some(25.0));
        assert_eq!(pc.get_current_time(), Some(25.0));
    }

    #[test]
    fn update_playback_time_leaves_pts_untouched_without_demuxer() {
        let mut pc = PlayerContext::new(PlaybackOptions::default());
        pc.last_seek_pts = Some(7.0);

        pc.update_playback_time();

        assert_eq!(pc.playback_pts, None);
        assert_eq!(pc.get_current_time(), Some(7.0));
    }
}
