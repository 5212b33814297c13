//! Animation factories and named easing presets
//!
//! [`create`] builds exactly what it is given. [`timing`] fills in the
//! default duration and easing first, and each preset pins the easing before
//! delegating to [`timing`].

use tracing::debug;

use crate::animation::Animation;
use crate::config::{TimingConfig, TimingOptions, DEFAULT_DURATION_MS, DEFAULT_EASING};
use crate::easing::Easing;
use crate::error::{AnimationError, Result};

/// Build an animation from a complete configuration.
///
/// Both duration and easing must be set. Fails if the easing's control points
/// are out of range.
pub fn create(config: TimingConfig) -> Result<Animation> {
    let TimingConfig {
        options,
        callbacks,
        scheduler,
        timer,
    } = config;

    let duration = options
        .duration
        .ok_or(AnimationError::MissingOption("duration"))?;
    let easing = options
        .easing
        .ok_or(AnimationError::MissingOption("easing"))?;
    let curve = easing.curve()?;

    debug!(duration, %easing, "animation created");
    Ok(Animation::new(curve, duration, callbacks, scheduler, timer))
}

/// Build an animation, defaulting to a 500 ms [`Easing::Linear`] timing.
pub fn timing(mut config: TimingConfig) -> Result<Animation> {
    config.options = config.options.or(TimingOptions {
        duration: Some(DEFAULT_DURATION_MS),
        easing: Some(DEFAULT_EASING),
    });
    create(config)
}

fn with_easing(config: TimingConfig, easing: Easing) -> Result<Animation> {
    timing(config.easing(easing))
}

/// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`
pub fn linear(config: TimingConfig) -> Result<Animation> {
    with_easing(config, Easing::Linear)
}

/// `cubic-bezier(0, 0, 1, 1)`
pub fn ease(config: TimingConfig) -> Result<Animation> {
    with_easing(config, Easing::Ease)
}

/// `cubic-bezier(0.42, 0, 1, 1)`
pub fn ease_in(config: TimingConfig) -> Result<Animation> {
    with_easing(config, Easing::EaseIn)
}

/// `cubic-bezier(0, 0, 0.58, 1)`
pub fn ease_out(config: TimingConfig) -> Result<Animation> {
    with_easing(config, Easing::EaseOut)
}

/// `cubic-bezier(0.42, 0, 0.58, 1)`
pub fn ease_in_out(config: TimingConfig) -> Result<Animation> {
    with_easing(config, Easing::EaseInOut)
}
