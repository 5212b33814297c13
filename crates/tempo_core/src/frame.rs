//! Scheduling interfaces consumed by animations
//!
//! Animations never talk to a display or a timer directly. They are handed a
//! [`FrameScheduler`] and a [`DelayTimer`], which makes the same animation code
//! run against a vsync-driven host, a fixed-interval fallback, or a test clock.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a pending frame request, used for cancellation
    pub struct FrameToken;
    /// Handle to a pending delayed callback, used for cancellation
    pub struct TimerToken;
}

/// Callback fired on the next frame with the frame timestamp (ms)
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Callback fired once a delay elapses
pub type TimerCallback = Box<dyn FnOnce()>;

/// Something that can call back approximately once per display refresh
pub trait FrameScheduler {
    /// Current time on the scheduler's clock, in milliseconds
    fn now(&self) -> f64;

    /// Request a one-shot callback on the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameToken;

    /// Cancel a pending frame request
    ///
    /// Returns `false` if the request already fired or was cancelled.
    fn cancel_frame(&self, token: FrameToken) -> bool;
}

/// Something that can call back once after a delay
pub trait DelayTimer {
    /// Schedule `callback` to run once `delay_ms` milliseconds from now
    fn schedule_once(&self, callback: TimerCallback, delay_ms: f64) -> TimerToken;

    /// Cancel a pending timer
    ///
    /// Returns `false` if the timer already fired or was cancelled.
    fn cancel_timer(&self, token: TimerToken) -> bool;
}
