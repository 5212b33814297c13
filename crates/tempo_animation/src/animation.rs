//! Frame-driven timing animation
//!
//! An [`Animation`] turns wall-clock time into eased progress. Once started it
//! requests one frame at a time from its [`FrameScheduler`]; every frame adds
//! the time since the request to the elapsed total, maps `elapsed / duration`
//! through the bezier curve, and reports the result to `on_progress`. When the
//! elapsed total reaches the duration it reports `on_end` and stops asking for
//! frames.
//!
//! States: `Inited → Started → Running ⇄ Waiting`, terminal `Finished`.
//!
//! Every transition away from `Running` cancels the pending frame request, and
//! each request carries the generation it was made in, so at most one frame
//! loop is ever live per animation. Callbacks run with no internal borrow held
//! and may call back into the animation.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tempo_core::{DelayTimer, FrameScheduler, FrameToken, TimerToken};
use tracing::{debug, trace, warn};

use crate::bezier::CubicBezier;
use crate::config::Callbacks;

/// Lifecycle status of an animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationStatus {
    /// Created, never started
    #[default]
    Inited,
    /// Transient marker while `start()` resets the run
    Started,
    /// Frames are being requested
    Running,
    /// Paused by `wait()`
    Waiting,
    /// Reached the end of its duration
    Finished,
}

/// Mutable run state
#[derive(Debug)]
struct AnimationState {
    status: AnimationStatus,
    duration: f64,
    elapsed: f64,
    progress: f64,
    /// Clock reading when the pending frame was requested
    scheduled_at: f64,
    frame_token: Option<FrameToken>,
    delay_token: Option<TimerToken>,
    /// Bumped on every transition; frames from older generations are stale
    generation: u64,
}

struct Inner {
    curve: CubicBezier,
    callbacks: Callbacks,
    scheduler: Rc<dyn FrameScheduler>,
    timer: Rc<dyn DelayTimer>,
    state: RefCell<AnimationState>,
}

/// A single timing animation
///
/// Cloning yields another handle to the same animation. When the last handle
/// is dropped any pending frame or delayed start is cancelled.
#[derive(Clone)]
pub struct Animation {
    inner: Rc<Inner>,
}

impl Animation {
    /// Create an animation over `duration_ms` milliseconds.
    ///
    /// A zero or negative duration completes on the first frame.
    pub fn new(
        curve: CubicBezier,
        duration_ms: f64,
        callbacks: Callbacks,
        scheduler: Rc<dyn FrameScheduler>,
        timer: Rc<dyn DelayTimer>,
    ) -> Self {
        let duration = if duration_ms > 0.0 {
            duration_ms
        } else {
            warn!(duration_ms, "non-positive animation duration, completing on first frame");
            0.0
        };

        Self {
            inner: Rc::new(Inner {
                curve,
                callbacks,
                scheduler,
                timer,
                state: RefCell::new(AnimationState {
                    status: AnimationStatus::Inited,
                    duration,
                    elapsed: 0.0,
                    progress: 0.0,
                    scheduled_at: 0.0,
                    frame_token: None,
                    delay_token: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Start (or restart) from zero.
    ///
    /// Fires `on_start`, then `on_progress(0)`, then requests the first frame.
    /// Calling this on a running animation abandons the current run.
    pub fn start(&self) {
        let generation = {
            let mut state = self.inner.state.borrow_mut();
            self.inner.cancel_frame(&mut state);
            state.progress = 0.0;
            state.elapsed = 0.0;
            state.status = AnimationStatus::Started;
            state.status = AnimationStatus::Running;
            state.generation += 1;
            state.generation
        };
        debug!(duration = self.duration(), "animation started");

        (self.inner.callbacks.on_start)();
        if !self.inner.is_current(generation) {
            return;
        }
        (self.inner.callbacks.on_progress)(0.0);
        if !self.inner.is_current(generation) {
            return;
        }
        Inner::schedule_frame(&self.inner);
    }

    /// Start after `delay_ms` milliseconds.
    ///
    /// Status is untouched until the delay elapses. Calling again replaces the
    /// pending delayed start.
    pub fn delay(&self, delay_ms: f64) {
        let weak = Rc::downgrade(&self.inner);
        let mut state = self.inner.state.borrow_mut();
        if let Some(token) = state.delay_token.take() {
            self.inner.timer.cancel_timer(token);
        }
        state.delay_token = Some(self.inner.timer.schedule_once(
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.state.borrow_mut().delay_token = None;
                    Animation { inner }.start();
                }
            }),
            delay_ms,
        ));
        debug!(delay_ms, "animation start delayed");
    }

    /// Pause a running animation.
    ///
    /// The pending frame is cancelled immediately, so no further progress is
    /// reported until [`continue_animation`](Self::continue_animation).
    pub fn wait(&self) {
        let mut state = self.inner.state.borrow_mut();
        if state.status != AnimationStatus::Running {
            debug!(status = ?state.status, "wait ignored, animation not running");
            return;
        }
        self.inner.cancel_frame(&mut state);
        state.status = AnimationStatus::Waiting;
        state.generation += 1;
        debug!(elapsed = state.elapsed, "animation waiting");
    }

    /// Resume a paused animation. Time spent waiting is not counted.
    pub fn continue_animation(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.status != AnimationStatus::Waiting {
                debug!(status = ?state.status, "continue ignored, animation not waiting");
                return;
            }
            state.status = AnimationStatus::Running;
            state.generation += 1;
            debug!(elapsed = state.elapsed, "animation resumed");
        }
        Inner::schedule_frame(&self.inner);
    }

    /// Jump to the end.
    ///
    /// Reports the final progress and `on_end` right away, exactly once. Any
    /// pending frame or delayed start is cancelled.
    pub fn finish(&self) {
        let (progress, generation) = {
            let mut state = self.inner.state.borrow_mut();
            if state.status == AnimationStatus::Finished {
                debug!("finish ignored, animation already finished");
                return;
            }
            self.inner.cancel_frame(&mut state);
            if let Some(token) = state.delay_token.take() {
                self.inner.timer.cancel_timer(token);
            }
            state.elapsed = state.duration;
            state.progress = self.inner.curve.evaluate(1.0);
            state.generation += 1;
            (state.progress, state.generation)
        };
        debug!("animation finished early");

        (self.inner.callbacks.on_progress)(progress);
        if self.inner.is_current(generation) {
            Inner::complete(&self.inner);
        }
    }

    pub fn status(&self) -> AnimationStatus {
        self.inner.state.borrow().status
    }

    /// Last eased progress reported
    pub fn progress(&self) -> f64 {
        self.inner.state.borrow().progress
    }

    /// Elapsed running time (ms)
    pub fn elapsed(&self) -> f64 {
        self.inner.state.borrow().elapsed
    }

    /// Duration (ms)
    pub fn duration(&self) -> f64 {
        self.inner.state.borrow().duration
    }

    pub fn curve(&self) -> &CubicBezier {
        &self.inner.curve
    }

    pub fn is_running(&self) -> bool {
        self.status() == AnimationStatus::Running
    }

    pub fn is_finished(&self) -> bool {
        self.status() == AnimationStatus::Finished
    }

    /// Whether a frame request is outstanding
    pub fn has_pending_frame(&self) -> bool {
        self.inner.state.borrow().frame_token.is_some()
    }

    /// Whether a delayed start is outstanding
    pub fn has_pending_delay(&self) -> bool {
        self.inner.state.borrow().delay_token.is_some()
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("curve", &self.inner.curve)
            .field("state", &self.inner.state)
            .finish()
    }
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().generation == generation
    }

    fn cancel_frame(&self, state: &mut AnimationState) {
        if let Some(token) = state.frame_token.take() {
            self.scheduler.cancel_frame(token);
        }
    }

    /// Request the next frame for the current generation
    fn schedule_frame(inner: &Rc<Inner>) {
        let weak = Rc::downgrade(inner);
        let mut state = inner.state.borrow_mut();
        inner.cancel_frame(&mut state);

        let generation = state.generation;
        state.scheduled_at = inner.scheduler.now();
        state.frame_token = Some(
            inner
                .scheduler
                .request_frame(Box::new(move |_| Inner::on_frame(&weak, generation))),
        );
    }

    fn on_frame(weak: &Weak<Inner>, generation: u64) {
        let Some(inner) = weak.upgrade() else {
            return;
        };

        let (progress, done) = {
            let mut state = inner.state.borrow_mut();
            if state.status != AnimationStatus::Running || state.generation != generation {
                trace!(status = ?state.status, "stale frame ignored");
                return;
            }
            state.frame_token = None;

            let now = inner.scheduler.now();
            let delta = (now - state.scheduled_at).max(0.0);
            let elapsed = (state.elapsed + delta).min(state.duration);
            state.elapsed = elapsed;

            let t = if state.duration > 0.0 {
                elapsed / state.duration
            } else {
                1.0
            };
            state.progress = inner.curve.evaluate(t);
            trace!(elapsed, progress = state.progress, "animation frame");

            (state.progress, elapsed >= state.duration)
        };

        (inner.callbacks.on_progress)(progress);
        if !inner.is_current(generation) {
            return;
        }

        if done {
            Inner::complete(&inner);
        } else {
            Inner::schedule_frame(&inner);
        }
    }

    fn complete(inner: &Rc<Inner>) {
        {
            let mut state = inner.state.borrow_mut();
            state.status = AnimationStatus::Finished;
            state.generation += 1;
        }
        debug!("animation ended");
        (inner.callbacks.on_end)();
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(token) = state.frame_token.take() {
            self.scheduler.cancel_frame(token);
        }
        if let Some(token) = state.delay_token.take() {
            self.timer.cancel_timer(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempo_core::{FrameLoop, ManualClock};

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Start,
        Progress(f64),
        End,
    }

    struct Harness {
        clock: Rc<ManualClock>,
        frame_loop: Rc<FrameLoop>,
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl Harness {
        fn new() -> Self {
            let clock = Rc::new(ManualClock::new());
            let frame_loop = Rc::new(FrameLoop::new(clock.clone()));
            Self {
                clock,
                frame_loop,
                events: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn callbacks(&self) -> Callbacks {
            let (on_start, on_progress, on_end) =
                (self.events.clone(), self.events.clone(), self.events.clone());
            Callbacks {
                on_start: Rc::new(move || on_start.borrow_mut().push(Event::Start)),
                on_progress: Rc::new(move |p: f64| on_progress.borrow_mut().push(Event::Progress(p))),
                on_end: Rc::new(move || on_end.borrow_mut().push(Event::End)),
            }
        }

        fn animation(&self, points: [f64; 4], duration_ms: f64) -> Animation {
            Animation::new(
                CubicBezier::try_from(points).unwrap(),
                duration_ms,
                self.callbacks(),
                self.frame_loop.clone(),
                self.frame_loop.clone(),
            )
        }

        fn frame_at(&self, ms: f64) {
            self.clock.set(ms);
            self.frame_loop.tick();
        }

        fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }

        fn count(&self, event: &Event) -> usize {
            self.events.borrow().iter().filter(|e| *e == event).count()
        }
    }

    const IDENTITY: [f64; 4] = [0.0, 0.0, 1.0, 1.0];

    #[test]
    fn test_runs_to_completion() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);
        assert_eq!(animation.status(), AnimationStatus::Inited);

        animation.start();
        assert!(animation.is_running());
        assert!(animation.has_pending_frame());

        h.frame_at(0.0);
        h.frame_at(50.0);
        assert_eq!(animation.progress(), 0.5);
        h.frame_at(100.0);

        assert_eq!(
            h.events(),
            vec![
                Event::Start,
                Event::Progress(0.0),
                Event::Progress(0.0),
                Event::Progress(0.5),
                Event::Progress(1.0),
                Event::End,
            ]
        );
        assert!(animation.is_finished());
        assert!(!animation.has_pending_frame());
        assert_eq!(h.frame_loop.pending_frames(), 0);
    }

    #[test]
    fn test_elapsed_is_clamped_to_duration() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.start();
        h.frame_at(250.0);

        assert_eq!(animation.elapsed(), 100.0);
        assert_eq!(animation.progress(), 1.0);
        assert_eq!(h.count(&Event::End), 1);
    }

    #[test]
    fn test_clock_going_backwards_does_not_reduce_elapsed() {
        let h = Harness::new();
        h.clock.set(100.0);
        let animation = h.animation(IDENTITY, 100.0);

        animation.start();
        h.frame_at(130.0);
        assert_eq!(animation.elapsed(), 30.0);

        h.frame_at(90.0);
        assert_eq!(animation.elapsed(), 30.0);
        assert!(animation.is_running());
    }

    #[test]
    fn test_zero_duration_completes_on_first_frame() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 0.0);

        animation.start();
        h.frame_at(0.0);

        assert!(animation.is_finished());
        assert_eq!(animation.progress(), 1.0);
        assert_eq!(h.count(&Event::End), 1);
    }

    #[test]
    fn test_negative_duration_is_normalized() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, -50.0);
        assert_eq!(animation.duration(), 0.0);

        animation.start();
        h.frame_at(5.0);
        assert!(animation.is_finished());
        assert_eq!(animation.elapsed(), 0.0);
    }

    #[test]
    fn test_wait_cancels_pending_frame() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.start();
        h.frame_at(20.0);
        animation.wait();

        assert_eq!(animation.status(), AnimationStatus::Waiting);
        assert!(!animation.has_pending_frame());
        assert_eq!(h.frame_loop.pending_frames(), 0);

        let before = h.events().len();
        h.frame_at(60.0);
        assert_eq!(h.events().len(), before);
    }

    #[test]
    fn test_continue_resumes_without_counting_pause() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.start();
        h.frame_at(20.0);
        animation.wait();

        h.clock.set(500.0);
        animation.continue_animation();
        assert!(animation.is_running());

        h.frame_at(530.0);
        assert_eq!(animation.elapsed(), 50.0);
        assert_eq!(animation.progress(), 0.5);
    }

    #[test]
    fn test_wait_and_continue_ignored_in_wrong_state() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.wait();
        assert_eq!(animation.status(), AnimationStatus::Inited);

        animation.start();
        animation.continue_animation();
        assert_eq!(h.frame_loop.pending_frames(), 1);

        h.frame_at(100.0);
        animation.wait();
        animation.continue_animation();
        assert!(animation.is_finished());
        assert!(!animation.has_pending_frame());
    }

    #[test]
    fn test_finish_mid_run_ends_once() {
        let h = Harness::new();
        let animation = h.animation([0.42, 0.0, 0.58, 1.0], 100.0);

        animation.start();
        h.frame_at(30.0);
        animation.finish();

        assert!(animation.is_finished());
        assert_eq!(animation.elapsed(), 100.0);
        assert_eq!(animation.progress(), 1.0);
        assert_eq!(h.events().last(), Some(&Event::End));
        assert_eq!(h.count(&Event::End), 1);

        h.frame_at(60.0);
        animation.finish();
        assert_eq!(h.count(&Event::End), 1);
        assert_eq!(h.frame_loop.pending_frames(), 0);
    }

    #[test]
    fn test_finish_while_waiting() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.start();
        h.frame_at(10.0);
        animation.wait();
        animation.finish();

        assert!(animation.is_finished());
        assert_eq!(h.count(&Event::End), 1);
    }

    #[test]
    fn test_restart_keeps_single_frame_loop() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.start();
        h.frame_at(10.0);
        animation.start();
        assert_eq!(h.frame_loop.pending_frames(), 1);

        let before = h.events().len();
        h.frame_at(20.0);
        assert_eq!(h.events().len(), before + 1);
        assert_eq!(animation.elapsed(), 10.0);
        assert_eq!(h.count(&Event::Start), 2);
    }

    #[test]
    fn test_delay_starts_later() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.delay(50.0);
        assert!(animation.has_pending_delay());
        assert_eq!(animation.status(), AnimationStatus::Inited);

        h.frame_at(49.0);
        assert!(h.events().is_empty());

        h.frame_at(50.0);
        assert!(animation.is_running());
        assert!(!animation.has_pending_delay());
        assert_eq!(h.events(), vec![Event::Start, Event::Progress(0.0)]);

        h.frame_at(100.0);
        assert_eq!(animation.progress(), 0.5);
    }

    #[test]
    fn test_delay_replaces_pending_delay() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.delay(50.0);
        animation.delay(80.0);
        assert_eq!(h.frame_loop.pending_timers(), 1);

        h.frame_at(60.0);
        assert_eq!(animation.status(), AnimationStatus::Inited);
        h.frame_at(80.0);
        assert!(animation.is_running());
        assert_eq!(h.count(&Event::Start), 1);
    }

    #[test]
    fn test_finish_cancels_delayed_start() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.delay(50.0);
        animation.finish();
        h.frame_at(60.0);

        assert!(animation.is_finished());
        assert_eq!(h.count(&Event::Start), 0);
        assert_eq!(h.frame_loop.pending_timers(), 0);
    }

    #[test]
    fn test_drop_cancels_pending_work() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);

        animation.start();
        animation.delay(30.0);
        assert_eq!(h.frame_loop.pending_frames(), 1);
        assert_eq!(h.frame_loop.pending_timers(), 1);

        drop(animation);
        assert!(!h.frame_loop.has_pending());
    }

    #[test]
    fn test_clones_share_one_run() {
        let h = Harness::new();
        let animation = h.animation(IDENTITY, 100.0);
        let other = animation.clone();

        animation.start();
        h.frame_at(40.0);
        assert_eq!(other.elapsed(), 40.0);

        drop(animation);
        assert_eq!(h.frame_loop.pending_frames(), 1);
        other.wait();
        assert_eq!(h.frame_loop.pending_frames(), 0);
    }

    #[test]
    fn test_callback_may_pause_animation() {
        let h = Harness::new();
        let slot: Rc<RefCell<Option<Animation>>> = Rc::new(RefCell::new(None));
        let frames = Rc::new(Cell::new(0));

        let slot_clone = slot.clone();
        let frames_clone = frames.clone();
        let callbacks = Callbacks {
            on_progress: Rc::new(move |p: f64| {
                frames_clone.set(frames_clone.get() + 1);
                if p >= 0.5 {
                    if let Some(animation) = slot_clone.borrow().as_ref() {
                        animation.wait();
                    }
                }
            }),
            ..Callbacks::default()
        };
        let animation = Animation::new(
            CubicBezier::try_from(IDENTITY).unwrap(),
            100.0,
            callbacks,
            h.frame_loop.clone(),
            h.frame_loop.clone(),
        );
        *slot.borrow_mut() = Some(animation.clone());

        animation.start();
        h.frame_at(50.0);
        h.frame_at(80.0);

        assert_eq!(animation.status(), AnimationStatus::Waiting);
        assert_eq!(frames.get(), 2);
        assert_eq!(h.frame_loop.pending_frames(), 0);

        // Break the handle cycle
        slot.borrow_mut().take();
    }

    #[test]
    fn test_callback_may_finish_animation() {
        let h = Harness::new();
        let slot: Rc<RefCell<Option<Animation>>> = Rc::new(RefCell::new(None));
        let ends = Rc::new(Cell::new(0));

        let slot_clone = slot.clone();
        let ends_clone = ends.clone();
        let callbacks = Callbacks {
            on_progress: Rc::new(move |p: f64| {
                if p > 0.0 && p < 1.0 {
                    if let Some(animation) = slot_clone.borrow().as_ref() {
                        animation.finish();
                    }
                }
            }),
            on_end: Rc::new(move || ends_clone.set(ends_clone.get() + 1)),
            ..Callbacks::default()
        };
        let animation = Animation::new(
            CubicBezier::try_from(IDENTITY).unwrap(),
            100.0,
            callbacks,
            h.frame_loop.clone(),
            h.frame_loop.clone(),
        );
        *slot.borrow_mut() = Some(animation.clone());

        animation.start();
        h.frame_at(10.0);

        assert!(animation.is_finished());
        assert_eq!(ends.get(), 1);
        assert_eq!(h.frame_loop.pending_frames(), 0);

        slot.borrow_mut().take();
    }
}
