//! # tidebloom
//!
//! Small generative-art and data-visualization sketches rendered into a
//! software framebuffer and shown in the terminal or written to GIF/PNG.
//!
//! Every sketch follows the same shape:
//!
//! 1. **Loader**: a small dataset (iris CSV, tide series, city rainfall) is
//!    read once into immutable records ([`dataset`]).
//! 2. **Mapper**: records become sizes, colors and counts through fixed scale
//!    factors ([`visual`]).
//! 3. **Render loop**: a fixed-rate loop ticks an animation clock, recomputes
//!    time-varying parameters and draws a frame ([`app::RenderLoop`]).
//! 4. **Input handler**: key presses and mouse events select views and tweak
//!    effects ([`app::InputHandler`]).
//!
//! ## Sketches
//!
//! - [`sketches::SpiralSketch`]: tidal readings on a turning spiral
//! - [`sketches::FlowerSketch`]: iris species as rotating, pulsing flowers
//! - [`sketches::RainfallMapSketch`]: monthly rainfall bubbles on a world map
//! - [`sketches::RainfallChartSketch`]: a century of rainfall as a density map
//!   beside a line chart
//! - [`sketches::BiovisSketch`]: heartbeat rings and growing stems
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tidebloom::prelude::*;
//!
//! let config = Config::default();
//! let sketch = BiovisSketch::new(config.biovis.clone())?;
//! let sink = file_sink("biovis.gif".as_ref(), 60)?;
//! let summary = RenderLoop::new(sketch, sink, ScriptedEvents::new())?
//!     .headless()
//!     .with_frame_budget(120)
//!     .run()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `fetch`: load the rainfall table from a JSON endpoint

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles).
pub mod geometry;

/// Scale functions and the map projection.
pub mod scale;

// ============================================================================
// Data and Mapping
// ============================================================================

/// Dataset loaders (iris, tide, rainfall).
pub mod dataset;

/// Record to visual-attribute mapping.
pub mod visual;

// ============================================================================
// Animation and Runtime
// ============================================================================

/// Animation clock, view selection and wave helpers.
pub mod anim;

/// Render loop, input handling, sinks and configuration.
pub mod app;

/// The sketches.
pub mod sketches;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization of primitives.
pub mod render;

/// Output encoders (PNG, GIF, terminal).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for tidebloom operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use tidebloom::prelude::*;
/// ```
pub mod prelude {
    pub use crate::anim::{AnimationClock, AnimationState, View};
    pub use crate::app::{
        file_sink, Action, Config, EventSource, FrameSink, InputHandler, RenderLoop, RunState, RunSummary,
        ScriptedEvents, Sketch,
    };
    pub use crate::color::{Hsla, Rgba};
    pub use crate::dataset::{IrisTable, RainfallHistory, RainfallTable, Species, SpeciesStats, TideSeries};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Point, Rect};
    pub use crate::scale::{ColorScale, LinearScale, MapProjection, Scale};
    pub use crate::sketches::{BiovisSketch, FlowerSketch, RainfallChartSketch, RainfallMapSketch, SpiralSketch};
    pub use crate::visual::{MappingScales, VisualAttributes};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
