//! Tempo Core Runtime
//!
//! Frame-driven scheduling primitives for the Tempo animation crates:
//!
//! - **Frame Scheduling**: one-shot callbacks fired once per display refresh
//! - **Delay Timers**: one-shot callbacks fired after a delay
//! - **Clocks**: monotonic wall clock, or a manual clock for deterministic tests
//! - **Frame Loop**: a single-threaded queue implementing both schedulers,
//!   ticked by the host on vsync or by a fixed-interval fallback driver
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tempo_core::{FrameLoop, FrameScheduler, ManualClock};
//!
//! let clock = Rc::new(ManualClock::new());
//! let frame_loop = FrameLoop::new(clock.clone());
//!
//! let fired = Rc::new(Cell::new(None));
//! let fired_clone = fired.clone();
//! frame_loop.request_frame(Box::new(move |timestamp| fired_clone.set(Some(timestamp))));
//!
//! clock.advance(16.0);
//! frame_loop.tick();
//! assert_eq!(fired.get(), Some(16.0));
//! ```

pub mod clock;
pub mod frame;
pub mod frame_loop;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame::{DelayTimer, FrameCallback, FrameScheduler, FrameToken, TimerCallback, TimerToken};
pub use frame_loop::{FrameLoop, FrameLoopConfig};
