//! baseline-pane: baseline series pane view for a Lightweight Charts style
//! chart engine.
//!
//! A [`BaselinePaneView`] turns one baseline series plus its price and time
//! scales into an ordered pair of pane renderers (filled area, then outline)
//! that emit backend-agnostic draw commands into a [`render::RenderFrame`].

pub mod core;
pub mod error;
pub mod lwc;
pub mod render;
pub mod telemetry;

pub use error::{ChartError, ChartResult};
pub use lwc::model::{BaselineSeries, BaselineStyleOptions, ChartModel};
pub use lwc::renderers::{CompositeRenderer, PaneRenderer};
pub use lwc::views::{BaselinePaneView, SeriesScales, SeriesUpdateKind};
