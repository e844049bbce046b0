//! Event-camera log-intensity image reconstruction.
//!
//! This crate turns a stream of asynchronous brightness-change events
//! (the kind a DVS/event camera emits - an `(x, y, t, polarity)` tuple per
//! pixel change) into a dense, per-pixel log-intensity image. It implements:
//!
//! - a causal two-state IIR temporal high-pass filter per pixel
//!   ([`temporal`]),
//! - an optional spatial Gaussian blur applied when a pixel leaves the
//!   active window ([`spatial`]),
//! - tile-level activity tracking piggybacked on pixel state ([`tile`]),
//! - an adaptive event-window controller that grows or shrinks the
//!   buffered-event horizon to hold a target fill ratio ([`controller`],
//!   [`queue`]),
//! - optional per-pixel gain calibration ([`calibration`]), and
//! - grayscale/heatmap rendering of the current state ([`render`]).
//!
//! [`Reconstructor`] is the single entry point tying these together; build
//! one from a [`ReconstructorConfig`] and feed it events:
//!
//! ```
//! use fibar_core::{Reconstructor, ReconstructorConfig};
//!
//! let config = ReconstructorConfig::new(640, 480, 10_000.0);
//! let mut reconstructor = Reconstructor::new(config)?;
//! reconstructor.event(0, 100, 200, true)?;
//! let image = reconstructor.to_intensity_image(640);
//! assert_eq!(image.len(), 640 * 480);
//! # Ok::<(), fibar_core::Error>(())
//! ```
//!
//! # Non-goals
//!
//! This crate does not decode any particular camera's wire format, does
//! not provide a CLI or file-encoding path for the rendered images, and
//! performs no internal threading or async I/O - it is a single-threaded,
//! synchronous core meant to be driven by a caller that owns those
//! concerns.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod calibration;
pub mod config;
pub mod controller;
pub mod error;
pub mod queue;
pub mod reconstructor;
pub mod render;
pub mod spatial;
pub mod state;
pub mod temporal;
pub mod tile;

pub use calibration::CalibrationStats;
pub use config::{KernelSize, ReconstructorConfig};
pub use controller::ActivityController;
pub use error::{Error, Result};
pub use queue::{Event, EventQueue};
pub use reconstructor::Reconstructor;
pub use spatial::Kernel;
pub use state::{PixelState, StateBuffer};
pub use temporal::TemporalFilter;

/// Commonly used types, re-exported for glob import.
pub mod prelude {
    pub use crate::{
        CalibrationStats, Error, Event, EventQueue, KernelSize, PixelState, Reconstructor,
        ReconstructorConfig, Result, StateBuffer,
    };
}
