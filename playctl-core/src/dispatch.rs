//! Dispatch & wakeup.
//!
//! A single-threaded cooperative queue: any thread can post a closure to run
//! on the playloop thread, or just `interrupt()` an in-progress sleep.
//! Modeled on mpv's `mp_dispatch_queue`, generalized from termusic's
//! channel-based wakeup (`server/src/server.rs`'s `ticker_thread` /
//! `ctrlc::set_handler`, both of which only ever reach the playloop thread
//! by posting onto a queue, never by touching player state directly).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::context::PlayerContext;

pub type DispatchJob = Box<dyn FnOnce(&mut PlayerContext) + Send + 'static>;

struct Inner {
    queue: Mutex<VecDeque<DispatchJob>>,
    condvar: Condvar,
    interrupted: AtomicBool,
}

/// Owned by the playloop thread; drives `process`.
pub struct DispatchQueue {
    inner: Arc<Inner>,
}

/// A cheap, `Clone`-able, `Send + Sync` handle any thread may hold to wake
/// the player or post work onto it — the "weak back-reference" from
/// DESIGN.md's cyclic-collaborator note. It never dereferences
/// `PlayerContext` directly.
#[derive(Clone)]
pub struct DispatchHandle {
    inner: Arc<Inner>,
}

impl DispatchQueue {
    #[must_use]
    pub fn new() -> (Self, DispatchHandle) {
        let inner = Arc::new(Inner {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            interrupted: AtomicBool::new(false),
        });
        (
            Self {
                inner: inner.clone(),
            },
            DispatchHandle { inner },
        )
    }

    /// Drain pending closures, running each against `pc`, then block up to
    /// `timeout` seconds (`+∞` meaning indefinitely, `<= 0` meaning don't
    /// sleep at all) or until `interrupt` fires.
    ///
    /// Ordering guarantee: any `interrupt`/post that lands
    /// before this call finishes draining causes it to return without
    /// sleeping out the full budget, because the interrupted flag and any
    /// newly queued job are checked again right before and right after the
    /// actual sleep.
    pub fn process(&self, pc: &mut PlayerContext, timeout: f64) {
        self.drain(pc);

        if self.inner.interrupted.swap(false, Ordering::AcqRel) {
            return;
        }
        if timeout <= 0.0 {
            return;
        }

        let mut guard = self.inner.queue.lock();
        // Re-check under the same lock `interrupt()`/`post()` take: an
        // interrupt landing between the early check above and this lock
        // acquisition would otherwise go unseen by `wait_for`, which (unlike
        // `wait_while`) has no predicate of its own to catch it.
        if !guard.is_empty() || self.inner.interrupted.swap(false, Ordering::AcqRel) {
            drop(guard);
            self.drain(pc);
            return;
        }

        if timeout.is_infinite() {
            self.inner
                .condvar
                .wait_while(&mut guard, |q| {
                    q.is_empty() && !self.inner.interrupted.load(Ordering::Acquire)
                });
        } else {
            let _ = self.inner.condvar.wait_for(&mut guard, Duration::from_secs_f64(timeout));
        }
        drop(guard);

        self.inner.interrupted.store(false, Ordering::Release);
        self.drain(pc);
    }

    fn drain(&self, pc: &mut PlayerContext) {
        loop {
            let job = self.inner.queue.lock().pop_front();
            match job {
                Some(job) => job(pc),
                None => break,
            }
        }
    }
}

impl DispatchHandle {
    /// Safe from any thread; idempotent.
    pub fn interrupt(&self) {
        // Hold the queue lock across the store+notify, the same way `post`
        // does for its push+notify: `wait_for`/`wait_while` only release
        // this lock once they're registered with the condvar, so taking it
        // here closes the window where a notify could land between the
        // sleeper's predicate check and its actual wait.
        let _guard = self.inner.queue.lock();
        self.inner.interrupted.store(true, Ordering::Release);
        self.inner.condvar.notify_all();
    }

    /// Post a job to run on the playloop thread, then wake it.
    pub fn post(&self, job: DispatchJob) {
        self.inner.queue.lock().push_back(job);
        self.interrupt();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc as StdArc;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::options::PlaybackOptions;

    #[test]
    fn interrupt_racing_process_never_sleeps_out_the_full_timeout() {
        let (queue, handle) = DispatchQueue::new();
        let queue = StdArc::new(queue);
        let mut pc = PlayerContext::new(PlaybackOptions::default());

        // Fire the interrupt from another thread right as `process` is about
        // to acquire the queue lock, simulating the ticker-thread wakeup
        // this fix targets. Regardless of scheduling, `process` must not
        // block for anywhere near the full 30s timeout.
        let interrupter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.interrupt();
        });

        let start = Instant::now();
        queue.process(&mut pc, 30.0);
        let elapsed = start.elapsed();

        interrupter.join().unwrap();
        assert!(
            elapsed < Duration::from_secs(5),
            "process() blocked for {elapsed:?}, interrupt was lost"
        );
    }

    #[test]
    fn post_before_process_runs_job_without_blocking() {
        let (queue, handle) = DispatchQueue::new();
        let mut pc = PlayerContext::new(PlaybackOptions::default());

        handle.post(Box::new(|pc| pc.prefetch_ready = true));

        let start = Instant::now();
        queue.process(&mut pc, 30.0);
        let elapsed = start.elapsed();

        assert!(pc.prefetch_ready);
        assert!(elapsed < Duration::from_secs(5));
    }
}
