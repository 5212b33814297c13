//! Single-threaded frame loop
//!
//! Queues frame requests and delayed callbacks, and fires them when ticked.
//! The host either calls [`FrameLoop::tick`] once per display refresh, or hands
//! control to [`FrameLoop::run`], which ticks on a fixed interval instead.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use slotmap::SlotMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::frame::{
    DelayTimer, FrameCallback, FrameScheduler, FrameToken, TimerCallback, TimerToken,
};

/// Default tick interval for the fallback driver (ms)
pub const DEFAULT_INTERVAL_MS: f64 = 20.0;

/// Frame loop configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameLoopConfig {
    /// Interval between ticks when driven by [`FrameLoop::run`] (ms)
    pub interval_ms: f64,
}

impl FrameLoopConfig {
    /// Builder: set the fallback tick interval
    pub fn with_interval_ms(mut self, interval_ms: f64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Builder: derive the fallback tick interval from a frame rate
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.interval_ms = 1000.0 / fps.max(1) as f64;
        self
    }
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

struct PendingFrame {
    seq: u64,
    callback: FrameCallback,
}

struct PendingTimer {
    seq: u64,
    deadline: f64,
    callback: TimerCallback,
}

/// Queue of frame requests and timers sharing one clock
///
/// Frames requested while a tick is running are served on the following
/// tick, so a callback that reschedules itself fires once per frame.
/// Timers fire on the first tick at or after their deadline, before that
/// tick's frames.
pub struct FrameLoop {
    clock: Rc<dyn Clock>,
    config: FrameLoopConfig,
    frames: RefCell<SlotMap<FrameToken, PendingFrame>>,
    timers: RefCell<SlotMap<TimerToken, PendingTimer>>,
    next_seq: Cell<u64>,
    frame_count: Cell<u64>,
}

impl FrameLoop {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self::with_config(clock, FrameLoopConfig::default())
    }

    pub fn with_config(clock: Rc<dyn Clock>, config: FrameLoopConfig) -> Self {
        Self {
            clock,
            config,
            frames: RefCell::new(SlotMap::with_key()),
            timers: RefCell::new(SlotMap::with_key()),
            next_seq: Cell::new(0),
            frame_count: Cell::new(0),
        }
    }

    /// Frame loop on the monotonic wall clock with default configuration
    pub fn system() -> Self {
        Self::new(Rc::new(SystemClock::new()))
    }

    pub fn config(&self) -> &FrameLoopConfig {
        &self.config
    }

    /// Number of ticks run so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count.get()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Check if anything is waiting to fire
    pub fn has_pending(&self) -> bool {
        self.pending_frames() > 0 || self.pending_timers() > 0
    }

    fn next_seq(&self) -> u64 {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        seq
    }

    /// Run one frame: fire due timers, then every frame requested before
    /// this tick began. Returns the number of callbacks fired.
    pub fn tick(&self) -> usize {
        let now = self.clock.now();
        let frame = self.frame_count.get() + 1;
        self.frame_count.set(frame);

        let mut frame_batch: SmallVec<[(u64, FrameToken); 8]> = self
            .frames
            .borrow()
            .iter()
            .map(|(token, pending)| (pending.seq, token))
            .collect();
        frame_batch.sort_unstable_by_key(|(seq, _)| *seq);

        let mut due: SmallVec<[(f64, u64, TimerToken); 4]> = self
            .timers
            .borrow()
            .iter()
            .filter(|(_, pending)| pending.deadline <= now)
            .map(|(token, pending)| (pending.deadline, pending.seq, token))
            .collect();
        due.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        // No borrow may be held while callbacks run: they schedule and cancel.
        let mut fired = 0;
        for (_, _, token) in due {
            let pending = self.timers.borrow_mut().remove(token);
            if let Some(pending) = pending {
                (pending.callback)();
                fired += 1;
            }
        }
        for (_, token) in frame_batch {
            let pending = self.frames.borrow_mut().remove(token);
            if let Some(pending) = pending {
                (pending.callback)(now);
                fired += 1;
            }
        }

        trace!(frame, now, fired, "frame loop tick");
        fired
    }

    /// Fallback driver: tick every `interval_ms` until nothing is pending.
    ///
    /// Sleeps the current thread between ticks, so it only makes progress with
    /// a clock that follows wall time. Returns the number of ticks run.
    pub fn run(&self) -> u64 {
        let interval = Duration::from_secs_f64(self.config.interval_ms.max(0.0) / 1000.0);
        debug!(interval_ms = self.config.interval_ms, "frame loop running on fixed interval");

        let mut ticks = 0;
        while self.has_pending() {
            std::thread::sleep(interval);
            self.tick();
            ticks += 1;
        }

        debug!(ticks, "frame loop idle");
        ticks
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::system()
    }
}

impl FrameScheduler for FrameLoop {
    fn now(&self) -> f64 {
        self.clock.now()
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameToken {
        let seq = self.next_seq();
        self.frames
            .borrow_mut()
            .insert(PendingFrame { seq, callback })
    }

    fn cancel_frame(&self, token: FrameToken) -> bool {
        self.frames.borrow_mut().remove(token).is_some()
    }
}

impl DelayTimer for FrameLoop {
    fn schedule_once(&self, callback: TimerCallback, delay_ms: f64) -> TimerToken {
        let seq = self.next_seq();
        let deadline = self.clock.now() + delay_ms.max(0.0);
        self.timers.borrow_mut().insert(PendingTimer {
            seq,
            deadline,
            callback,
        })
    }

    fn cancel_timer(&self, token: TimerToken) -> bool {
        self.timers.borrow_mut().remove(token).is_some()
    }
}
