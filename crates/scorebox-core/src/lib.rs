//! scorebox-core - Scene renderer for score distribution box plots
//!
//! This crate turns tournament results into an interactive box-and-whisker
//! plot held as a retained scene graph.
//!
//! # Key Components
//!
//! - **Scales**: band, linear and quantile colour scales
//! - **Axis**: tick and label layout for the player and score axes
//! - **Scene**: box groups of typed primitives with opacity transitions
//! - **Session**: the event-driven plot state (load, pan/zoom, reset, clock)
//! - **Export**: SVG rendering of the scene and JSON statistics
//!
//! # Events
//!
//! - **LoadDataset**: reload scores, recompute every domain, join the new groups
//! - **Transform**: move the player axis and primitive container only
//! - **Reset**: drop the scene and view, then reload the selected dataset
//! - **Advance**: step the transition clock and drop faded-out groups

pub mod axis;
pub mod colormap;
pub mod config;
pub mod error;
pub mod export;
pub mod render;
pub mod scale;
pub mod scene;
pub mod session;
pub mod view;

pub use axis::*;
pub use colormap::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use render::*;
pub use scale::*;
pub use scene::*;
pub use session::*;
pub use view::*;
