//! PTS and wall-clock plumbing.
//!
//! `Pts` models mpv's `NOPTS` sentinel as an explicit "unknown time" option
//! type (see DESIGN.md, "NOPTS sentinel") instead of a magic float, so every
//! accessor that touches it is forced to handle the unknown case.

use std::time::Instant;

/// A presentation timestamp, or "unknown" (mpv's `NOPTS` sentinel).
pub type Pts = Option<f64>;

/// `+∞`, used for `hrseek_pts` when retaining whatever last frame is found
/// (see `seek_to_last_frame`).
pub const PTS_INFINITE: f64 = f64::INFINITY;

/// Add a relative offset to a `Pts`, preserving `None` through the arithmetic.
#[must_use]
pub fn pts_add(pts: Pts, offset: f64) -> Pts {
    pts.map(|p| p + offset)
}

/// Monotonic wall clock used for `sleeptime`/`start_timestamp` bookkeeping.
///
/// Wraps `Instant` behind an arbitrary epoch so that the rest of the core can
/// deal in plain `f64` seconds, matching the `sleeptime`/`start_timestamp`
/// arithmetic and the `-∞`/`+∞` sentinels used throughout.
#[derive(Debug)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    #[must_use]
    pub fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks `last_time_us` and hands back the elapsed delta since the previous
/// call, the way `relative_time` does.
#[derive(Debug)]
pub struct Timekeeper {
    last_time: f64,
}

impl Timekeeper {
    #[must_use]
    pub fn new(clock: &Clock) -> Self {
        Self {
            last_time: clock.now(),
        }
    }

    /// Seconds elapsed since the previous call (or construction), advancing
    /// the anchor.
    pub fn relative_time(&mut self, clock: &Clock) -> f64 {
        let now = clock.now();
        let delta = now - self.last_time;
        self.last_time = now;
        delta
    }

    /// Consume the elapsed time without letting it feed back into a
    /// `time_frame` accumulator — used when leaving pause, where the
    /// accumulated delta must be discarded rather than subtracted.
    pub fn discard(&mut self, clock: &Clock) {
        self.last_time = clock.now();
    }
}
