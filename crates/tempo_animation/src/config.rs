//! Timing animation configuration

use std::fmt;
use std::rc::Rc;

use tempo_core::{DelayTimer, FrameLoop, FrameScheduler};

use crate::easing::Easing;

/// Default duration applied by [`timing`](crate::timing) (ms)
pub const DEFAULT_DURATION_MS: f64 = 500.0;

/// Default easing applied by [`timing`](crate::timing)
pub const DEFAULT_EASING: Easing = Easing::Linear;

/// Callback with no arguments (`on_start`, `on_end`)
pub type LifecycleCallback = Rc<dyn Fn()>;

/// Callback receiving the eased progress
pub type ProgressCallback = Rc<dyn Fn(f64)>;

/// The data half of a timing configuration
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingOptions {
    /// Duration in milliseconds
    pub duration: Option<f64>,
    pub easing: Option<Easing>,
}

impl TimingOptions {
    /// Fill unset fields from `defaults`
    pub fn or(self, defaults: TimingOptions) -> Self {
        Self {
            duration: self.duration.or(defaults.duration),
            easing: self.easing.or(defaults.easing),
        }
    }
}

/// Lifecycle callbacks of an animation
///
/// Callbacks are `Fn` behind `Rc` so they can be invoked while the animation
/// itself is being driven; a callback may call back into the animation.
#[derive(Clone)]
pub struct Callbacks {
    pub on_start: LifecycleCallback,
    pub on_progress: ProgressCallback,
    pub on_end: LifecycleCallback,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            on_start: Rc::new(|| {}),
            on_progress: Rc::new(|_| {}),
            on_end: Rc::new(|| {}),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Everything needed to build an [`Animation`](crate::Animation)
///
/// # Example
///
/// ```ignore
/// let config = TimingConfig::from_frame_loop(&frame_loop)
///     .duration(300.0)
///     .easing(Easing::EaseOut)
///     .on_progress(|p| println!("progress {p}"));
/// let animation = tempo_animation::timing(config)?;
/// ```
pub struct TimingConfig {
    pub(crate) options: TimingOptions,
    pub(crate) callbacks: Callbacks,
    pub(crate) scheduler: Rc<dyn FrameScheduler>,
    pub(crate) timer: Rc<dyn DelayTimer>,
}

impl TimingConfig {
    /// Create a configuration driven by the given scheduler and timer
    pub fn new(scheduler: Rc<dyn FrameScheduler>, timer: Rc<dyn DelayTimer>) -> Self {
        Self {
            options: TimingOptions::default(),
            callbacks: Callbacks::default(),
            scheduler,
            timer,
        }
    }

    /// Create a configuration using one frame loop for frames and delays
    pub fn from_frame_loop(frame_loop: &Rc<FrameLoop>) -> Self {
        Self::new(frame_loop.clone(), frame_loop.clone())
    }

    /// Builder: set duration in milliseconds
    pub fn duration(mut self, duration_ms: f64) -> Self {
        self.options.duration = Some(duration_ms);
        self
    }

    /// Builder: set the easing
    pub fn easing(mut self, easing: impl Into<Easing>) -> Self {
        self.options.easing = Some(easing.into());
        self
    }

    /// Builder: apply loaded options; fields set in `options` win
    pub fn options(mut self, options: TimingOptions) -> Self {
        self.options = options.or(self.options);
        self
    }

    /// Builder: called once when the animation starts
    pub fn on_start<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.callbacks.on_start = Rc::new(callback);
        self
    }

    /// Builder: called with the eased progress on start and every frame
    pub fn on_progress<F: Fn(f64) + 'static>(mut self, callback: F) -> Self {
        self.callbacks.on_progress = Rc::new(callback);
        self
    }

    /// Builder: called once when the animation finishes
    pub fn on_end<F: Fn() + 'static>(mut self, callback: F) -> Self {
        self.callbacks.on_end = Rc::new(callback);
        self
    }

    /// Get the configured options
    pub fn timing_options(&self) -> &TimingOptions {
        &self.options
    }
}

impl fmt::Debug for TimingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimingConfig")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
