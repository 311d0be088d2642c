//! Artifact rendering entry points
//!
//! Tone routines paint background, decoration and sentences; the footer
//! is always painted last so nothing can cover it.

mod footer;
mod fusion;
mod gentle;
mod intense;
mod scene;

pub use footer::{FOOTER_MARK, FOOTER_OFFSET};

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::analysis::AnalysisResult;
use crate::canvas::Canvas;
use crate::error::{RenderError, Result};
use crate::raster::{Artifact, FontBook, RasterCanvas};
use crate::tone::Tone;

use scene::Scene;

/// Edge length of the square artifact in pixels
pub const ARTIFACT_SIZE: u32 = 1080;

/// Renders artifacts with a fixed set of fonts
///
/// Cheap to clone and safe to share across threads; every call to
/// [`ArtifactGenerator::generate`] uses its own surface.
#[derive(Debug, Clone)]
pub struct ArtifactGenerator {
    fonts: Arc<FontBook>,
}

impl Default for ArtifactGenerator {
    fn default() -> Self {
        Self::with_builtin_font()
    }
}

impl ArtifactGenerator {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts: Arc::new(fonts),
        }
    }

    pub fn with_builtin_font() -> Self {
        Self::new(FontBook::builtin())
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Draw `analysis` onto a caller-supplied canvas
    pub fn render_into(&self, canvas: &mut dyn Canvas, analysis: &AnalysisResult) -> Result<()> {
        render_artifact(canvas, analysis)
    }

    /// Render `analysis` into a new [`ARTIFACT_SIZE`] square image
    pub fn generate(&self, analysis: &AnalysisResult) -> Result<Artifact> {
        let start = Instant::now();

        let mut canvas = RasterCanvas::new(ARTIFACT_SIZE, ARTIFACT_SIZE, Arc::clone(&self.fonts))?;
        self.render_into(&mut canvas, analysis)?;

        info!(
            "Generated {} artifact in {}ms",
            analysis.tone(),
            start.elapsed().as_millis()
        );
        Ok(canvas.into_artifact())
    }
}

/// Render with the embedded font
pub fn generate_artifact(analysis: &AnalysisResult) -> Result<Artifact> {
    ArtifactGenerator::with_builtin_font().generate(analysis)
}

/// Validate `analysis` and draw it onto any canvas
pub fn render_artifact(canvas: &mut dyn Canvas, analysis: &AnalysisResult) -> Result<()> {
    if canvas.width() == 0 || canvas.height() == 0 {
        return Err(RenderError::Surface(format!(
            "Canvas is empty ({}x{})",
            canvas.width(),
            canvas.height()
        )));
    }
    analysis.validate()?;

    if Tone::from_name(&analysis.tone).is_none() {
        debug!("Unknown tone '{}', rendering as fusion", analysis.tone);
    }

    render_tone(analysis.tone(), canvas, analysis)
}

/// Draw one tone's composition followed by the footer
///
/// Does not validate the sentence count; missing sentences are skipped and
/// extras beyond the third are ignored.
pub fn render_tone(tone: Tone, canvas: &mut dyn Canvas, analysis: &AnalysisResult) -> Result<()> {
    let mut scene = Scene::new(tone, analysis, canvas.width(), canvas.height());

    match tone {
        Tone::Fusion => fusion::draw(canvas, &mut scene)?,
        Tone::Gentle => gentle::draw(canvas, &mut scene)?,
        Tone::Intense => intense::draw(canvas, &mut scene)?,
    }

    footer::draw(canvas, &scene)
}
