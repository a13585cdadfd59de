pub mod artifact;
pub mod canvas;
pub mod context;
pub mod render;
pub mod types;

pub use artifact::{ArtifactCapture, ArtifactError};
pub use canvas::Canvas;
pub use context::figure_count;
pub use render::{render_canvas, render_png};
pub use types::{Figure, FigureSet, Series, SeriesKind};
