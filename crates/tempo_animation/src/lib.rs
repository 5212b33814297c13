//! Tempo Animation System
//!
//! Time-based progress animations eased by cubic bezier curves.
//!
//! # Features
//!
//! - **Cubic Bezier Easing**: table-seeded Newton-Raphson solver with a
//!   bisection fallback, bounded cost per evaluation
//! - **Timing Animations**: frame-driven start/wait/continue/finish lifecycle
//!   with `on_start`, `on_progress` and `on_end` callbacks
//! - **Presets**: `linear`, `ease`, `ease_in`, `ease_out`, `ease_in_out`
//! - **Injected Scheduling**: frames and delays come from a
//!   [`tempo_core::FrameScheduler`] and [`tempo_core::DelayTimer`]
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tempo_animation::{ease, TimingConfig};
//! use tempo_core::{FrameLoop, ManualClock};
//!
//! let clock = Rc::new(ManualClock::new());
//! let frame_loop = Rc::new(FrameLoop::new(clock.clone()));
//!
//! let last = Rc::new(Cell::new(0.0));
//! let last_clone = last.clone();
//! let animation = ease(
//!     TimingConfig::from_frame_loop(&frame_loop)
//!         .duration(100.0)
//!         .on_progress(move |p| last_clone.set(p)),
//! )
//! .unwrap();
//!
//! animation.start();
//! clock.set(50.0);
//! frame_loop.tick();
//! assert_eq!(last.get(), 0.5);
//! ```

pub mod animation;
pub mod bezier;
pub mod config;
pub mod easing;
pub mod error;
pub mod presets;

pub use animation::{Animation, AnimationStatus};
pub use bezier::CubicBezier;
pub use config::{Callbacks, TimingConfig, TimingOptions, DEFAULT_DURATION_MS, DEFAULT_EASING};
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use presets::{create, ease, ease_in, ease_in_out, ease_out, linear, timing};
