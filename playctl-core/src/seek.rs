//! Seek queue + executor: coalescing requests into `PC.seek`, then
//! dispatching them against the demuxer with the right
//! hr-seek/flush/chapter fallout.

use crate::collab::DemuxSeekFlags;
use crate::context::{ChainStatus, PlayerContext, Precision, SeekFlags, SeekRequest, SeekType, StopPlay};
use crate::events::{PlayerEvent, PlayerEventSink};
use crate::options::HrSeekMode;
use crate::time::pts_add;

/// How long a `DELAY`-flagged seek may sit unexecuted before we decide it's
/// been coalesced enough.
const SEEK_DELAY_GATE: f64 = 0.3;

impl PlayerContext {
    /// `queue_seek(type, amount, exact, flags)`.
    pub fn queue_seek(&mut self, kind: SeekType, amount: f64, exact: Precision, flags: SeekFlags) {
        self.wakeup();
        if self.stop_play == StopPlay::AtEndOfFile {
            self.stop_play = StopPlay::KeepPlaying;
        }

        match kind {
            SeekType::Relative => match self.seek.kind {
                SeekType::Factor => {
                    // Deliberate: coalescing a relative seek into a pending
                    // factor seek isn't common enough to be worth it. Drop
                    // the new request outright.
                }
                SeekType::Absolute => {
                    self.seek.flags = self.seek.flags.or(flags);
                }
                _ => {
                    self.seek.amount += amount;
                    self.seek.flags = self.seek.flags.or(flags);
                    self.seek.exact = self.seek.exact.max(exact);
                    self.seek.kind = SeekType::Relative;
                }
            },
            SeekType::Absolute | SeekType::Factor | SeekType::Backstep => {
                self.seek = SeekRequest {
                    kind,
                    amount,
                    exact,
                    flags,
                };
            }
            SeekType::None => {
                self.seek = SeekRequest::default();
            }
        }
    }

    fn reached_playing(&self) -> bool {
        self.video_status == ChainStatus::Playing || self.audio_status == ChainStatus::Playing
    }

    /// `execute_queued_seek(PC)`.
    pub fn execute_queued_seek(&mut self, events: &mut dyn PlayerEventSink) {
        if self.seek.is_none() {
            return;
        }
        let req = self.seek;

        if req.flags.delay
            && !self.reached_playing()
            && (self.now() - self.start_timestamp) < SEEK_DELAY_GATE
        {
            // Coalesce further DELAY seeks; retried on the next iteration.
            self.set_timeout(SEEK_DELAY_GATE);
            return;
        }

        if req.exact == Precision::Keyframe && self.hrseek_active {
            self.start_timestamp = f64::NEG_INFINITY;
        }

        self.seek(req, events);
        self.seek = SeekRequest::default();
    }

    /// `seek(PC, req)` — the executor.
    fn seek(&mut self, req: SeekRequest, events: &mut dyn PlayerEventSink) {
        if self.demuxer.is_none() || req.is_none() || req.amount.is_nan() {
            return;
        }

        let current_time = self.get_current_time();
        if req.kind == SeekType::Relative && current_time.is_none() {
            log::warn!("relative seek requested but current time is unknown, dropping");
            return;
        }
        let current_time = current_time.unwrap_or(0.0);

        let mut exact = req.exact;
        let mut flags = DemuxSeekFlags::default();
        let duration = self.demuxer.as_deref().and_then(|d| d.duration());

        let seek_pts = match req.kind {
            SeekType::Absolute => Some(req.amount),
            SeekType::Backstep => {
                exact = Precision::VeryExact;
                Some(current_time)
            }
            SeekType::Relative => {
                flags.forward = req.amount > 0.0;
                Some(current_time + req.amount)
            }
            SeekType::Factor => duration.map(|d| req.amount * d),
            SeekType::None => unreachable!("checked above"),
        };

        let hr_seek = self.options.correct_pts
            && exact != Precision::Keyframe
            && seek_pts.is_some()
            && ((self.options.hr_seek == HrSeekMode::Off && req.kind == SeekType::Absolute)
                || self.options.hr_seek == HrSeekMode::On
                || exact >= Precision::Exact);

        self.invalidate_chapter_seek(req.kind, req.amount, seek_pts);

        let ts_resets = self
            .demuxer
            .as_deref()
            .map(|d| d.ts_resets_possible())
            .unwrap_or(false);

        let mut demux_pts = seek_pts;
        if req.kind == SeekType::Factor && !hr_seek && (ts_resets || seek_pts.is_none()) {
            // Pass the factor straight through: by convention the demuxer
            // interprets `pts` as the 0..1 factor itself when `flags.factor`
            // is set (mirrors mpv's `MPSEEK_FACTOR`).
            flags.factor = true;
            demux_pts = Some(req.amount);
        } else if hr_seek {
            let very_exact = exact == Precision::VeryExact;
            let mut bias = self
                .options
                .hr_seek_demuxer_offset
                .max(if very_exact { 0.5 } else { 0.0 });
            if let Some(demuxer) = self.demuxer.as_deref() {
                for off in demuxer.external_track_offsets() {
                    if *off < 0.0 {
                        bias = bias.max(-off);
                    }
                }
            }
            demux_pts = pts_add(seek_pts, -bias);
            flags.hr = true;
            flags.forward = false;
        }

        if !self.demuxer.as_deref().map(|d| d.seekable()).unwrap_or(false) {
            flags.cached = true;
        }

        let Some(demuxer) = self.demuxer.as_deref_mut() else {
            return;
        };
        if let Err(err) = demuxer.seek(demux_pts, flags) {
            log::error!("demuxer seek failed: {err}");
            return;
        }
        log::debug!("seek dispatched: {req:?} -> demux_pts={demux_pts:?} hr_seek={hr_seek}");

        let offsets = demuxer.external_track_offsets().to_vec();
        for (index, offset) in offsets.into_iter().enumerate() {
            let target = pts_add(seek_pts, -offset);
            if let Some(demuxer) = self.demuxer.as_deref_mut() {
                let _ = demuxer.seek_external_track(index, target);
            }
        }

        if !req.flags.noflush {
            if let Some(ao) = self.audio_output.as_deref_mut() {
                ao.drain();
            }
        }

        self.reset_playback_state(events);
        // Recorder discontinuity notification: out of scope collaborator,
        // nothing to call here.

        self.last_seek_pts = seek_pts;
        if hr_seek {
            let very_exact = exact == Precision::VeryExact;
            self.hrseek_framedrop = !very_exact && self.options.hr_seek_framedrop;
            self.hrseek_backstep = req.kind == SeekType::Backstep;
            self.hrseek_pts = seek_pts;
            self.hrseek_active = true;
        }

        if self.stop_play == StopPlay::AtEndOfFile {
            self.stop_play = StopPlay::KeepPlaying;
        }
        self.start_timestamp = self.now();
        self.wakeup();
        events.emit(PlayerEvent::Seek);
        events.emit(PlayerEvent::Tick);

        self.audio_allow_second_chance_seek = !hr_seek && !flags.forward;

        if let (Some(p), Some(b)) = (self.last_seek_pts, self.options.ab_loop[1]) {
            self.ab_loop_clip = p < b;
        }
    }

    fn invalidate_chapter_seek(&mut self, kind: SeekType, amount: f64, seek_pts: Option<f64>) {
        let backward = matches!(kind, SeekType::Backstep)
            || (kind == SeekType::Relative && amount < 0.0);
        let before_last_chapter = kind == SeekType::Absolute
            && seek_pts.is_some_and(|p| {
                self.chapters
                    .get(usize::try_from(self.last_chapter).unwrap_or(0))
                    .is_some_and(|c| p < c.pts)
            });
        if backward || kind == SeekType::Factor || before_last_chapter {
            self.last_chapter_seek = -2;
        }
    }
}
