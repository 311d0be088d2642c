//! # Mirror of Dreams Artifact Renderer
//!
//! Turns an [`AnalysisResult`] (tone, three sentences, palette, hints) into
//! a 1080×1080 opaque image:
//!
//! 1. the tone is resolved (unknown tones render as `fusion`)
//! 2. the tone routine draws background, decoration and sentences through
//!    the [`Canvas`] trait
//! 3. the branding footer is drawn last
//!
//! Drawing is backend-agnostic. [`RasterCanvas`] executes operations into
//! pixels; [`RecordingCanvas`] keeps them for inspection.
//!
//! ```no_run
//! use mirror_art::{generate_artifact, AnalysisResult};
//!
//! # fn main() -> mirror_art::Result<()> {
//! let analysis = AnalysisResult::new("gentle", ["A short line.", "Another.", "Third one here."]);
//! let artifact = generate_artifact(&analysis)?;
//! assert_eq!((artifact.width(), artifact.height()), (1080, 1080));
//! let png: Vec<u8> = artifact.to_png()?;
//! # let _ = png;
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod canvas;
pub mod color;
pub mod error;
pub mod raster;
pub mod recording;
pub mod render;
pub mod tone;
pub mod wrap;

pub use analysis::{AnalysisResult, ColorPalette};
pub use canvas::{Canvas, DrawOp, FontSpec, FontWeight, Layer, Paint, Path2D, Point, Shape, TextAlign};
pub use color::{add_alpha, Color};
pub use error::{RenderError, Result};
pub use raster::{Artifact, FontBook, FontFace, RasterCanvas};
pub use recording::RecordingCanvas;
pub use render::{generate_artifact, render_artifact, render_tone, ArtifactGenerator, ARTIFACT_SIZE};
pub use tone::Tone;
pub use wrap::wrap_text;
