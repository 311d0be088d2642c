//! End-to-end rendering tests
//!
//! Layout is checked on a RecordingCanvas; pixel properties on the raster
//! backend with the embedded font.

use mirror_art::canvas::{Canvas, DrawOp, Layer, Paint, Shape};
use mirror_art::render::{FOOTER_MARK, FOOTER_OFFSET};
use mirror_art::{
    add_alpha, generate_artifact, render_artifact, wrap_text, AnalysisResult, ArtifactGenerator,
    ColorPalette, FontSpec, RecordingCanvas, RenderError, TextAlign, Tone, ARTIFACT_SIZE,
};

fn sample(tone: &str) -> AnalysisResult {
    AnalysisResult::new(
        tone,
        [
            "I keep dreaming of a house with endless rooms.",
            "Every door opens onto the sea.",
            "Maybe I am looking for somewhere to rest.",
        ],
    )
}

fn record(analysis: &AnalysisResult) -> RecordingCanvas {
    let mut canvas = RecordingCanvas::new(ARTIFACT_SIZE, ARTIFACT_SIZE);
    render_artifact(&mut canvas, analysis).unwrap();
    canvas
}

fn text_baselines(canvas: &RecordingCanvas, layer: Layer) -> Vec<f32> {
    canvas
        .ops_in(layer)
        .filter_map(|op| match op {
            DrawOp::Text { origin, .. } => Some(origin.y),
            _ => None,
        })
        .collect()
}

// ========================================
// Raster output
// ========================================

#[test]
fn test_every_tone_renders_opaque_square() {
    for tone in Tone::all_variants() {
        let artifact = generate_artifact(&sample(tone.as_str())).unwrap();
        assert_eq!(artifact.width(), 1080, "{}", tone);
        assert_eq!(artifact.height(), 1080, "{}", tone);
        assert!(artifact.is_opaque(), "{} left transparent pixels", tone);
    }
}

#[test]
fn test_unknown_tone_matches_fusion_pixels() {
    let fusion = generate_artifact(&sample("fusion")).unwrap();
    let unknown = generate_artifact(&sample("melancholy")).unwrap();
    assert_eq!(fusion.data(), unknown.data());
}

#[test]
fn test_same_input_same_pixels() {
    let generator = ArtifactGenerator::with_builtin_font();
    let a = generator.generate(&sample("intense")).unwrap();
    let b = generator.generate(&sample("intense")).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn test_translucent_background_still_opaque() {
    let analysis = sample("gentle").with_palette(ColorPalette {
        background: Some("rgba(0, 0, 0, 0.1)".to_string()),
        ..ColorPalette::default()
    });
    assert!(generate_artifact(&analysis).unwrap().is_opaque());
}

#[test]
fn test_png_output() {
    let png = generate_artifact(&sample("gentle")).unwrap().to_png().unwrap();
    assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);

    // IHDR is the first chunk: length, type, then big-endian width and height
    assert_eq!(&png[12..16], b"IHDR");
    assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 1080);
    assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 1080);
}

#[test]
fn test_wrong_sentence_count_rejected() {
    let mut analysis = sample("fusion");
    analysis.selected_sentences.push("A fourth sentence.".to_string());
    assert!(matches!(
        generate_artifact(&analysis),
        Err(RenderError::InvalidAnalysis(_))
    ));
}

// ========================================
// Composition
// ========================================

#[test]
fn test_footer_drawn_last_for_every_tone() {
    for tone in Tone::all_variants() {
        let canvas = record(&sample(tone.as_str()));
        let ops = canvas.ops();

        let first_branding = ops
            .iter()
            .position(|op| op.layer() == Layer::Branding)
            .unwrap();
        let last_content = ops
            .iter()
            .rposition(|op| op.layer() == Layer::Content)
            .unwrap();
        assert!(last_content < first_branding, "{}", tone);
        assert!(ops[first_branding..]
            .iter()
            .all(|op| op.layer() == Layer::Branding));

        assert_eq!(canvas.texts_in(Layer::Branding), vec![FOOTER_MARK]);
        let footer = text_baselines(&canvas, Layer::Branding);
        assert_eq!(footer, vec![1080.0 - FOOTER_OFFSET]);
    }
}

#[test]
fn test_background_painted_first_and_full() {
    for tone in Tone::all_variants() {
        let canvas = record(&sample(tone.as_str()));
        match &canvas.ops()[0] {
            DrawOp::Fill {
                layer: Layer::Background,
                shape: Shape::Rect { x, y, width, height },
                paint: Paint::Solid(color),
                ..
            } => {
                assert_eq!((*x, *y, *width, *height), (0.0, 0.0, 1080.0, 1080.0));
                assert_eq!(color.a, 1.0);
            }
            other => panic!("{}: unexpected first op {:?}", tone, other),
        }
    }
}

#[test]
fn test_gentle_scenario() {
    let analysis = AnalysisResult::new("gentle", ["A short line.", "Another.", "Third one here."])
        .with_palette(ColorPalette {
            background: Some("#0F0F23".to_string()),
            accent: Some("#FFFFFF".to_string()),
            ..ColorPalette::default()
        });
    let canvas = record(&analysis);

    let gradients = canvas
        .ops_in(Layer::Background)
        .filter(|op| matches!(op, DrawOp::Fill { paint: Paint::LinearGradient { .. }, .. }))
        .count();
    assert_eq!(gradients, 1);

    let stars = canvas
        .ops_in(Layer::Decoration)
        .filter(|op| matches!(op, DrawOp::Fill { shape: Shape::Circle { .. }, .. }))
        .count();
    assert_eq!(stars, 20);

    assert_eq!(
        canvas.texts_in(Layer::Content),
        vec!["A short line.", "Another.", "Third one here."]
    );
    let baselines = text_baselines(&canvas, Layer::Content);
    let middle = 540.0;
    assert!(baselines[0] < middle);
    assert!(baselines[2] > middle);
    assert!((baselines[1] - middle).abs() <= 40.0);
}

#[test]
fn test_intense_anchors() {
    let canvas = record(&AnalysisResult::new("intense", ["Left.", "Right.", "Bottom."]));
    let texts: Vec<_> = canvas
        .ops_in(Layer::Content)
        .filter_map(|op| match op {
            DrawOp::Text { origin, align, .. } => Some((origin.x, *align)),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0].1, TextAlign::Left);
    assert_eq!(texts[1].1, TextAlign::Right);
    assert_eq!(texts[2].1, TextAlign::Center);
    assert!(texts[0].0 < texts[2].0 && texts[2].0 < texts[1].0);
}

#[test]
fn test_centered_layout_hint() {
    let mut analysis = sample("fusion");
    analysis.layout = Some("centered".to_string());
    let canvas = record(&analysis);
    for op in canvas.ops_in(Layer::Content) {
        if let DrawOp::Text { origin, .. } = op {
            assert_eq!(origin.x, 540.0);
        }
    }
}

#[test]
fn test_all_words_rendered() {
    for tone in Tone::all_variants() {
        let analysis = sample(tone.as_str());
        let canvas = record(&analysis);
        let rendered: Vec<&str> = canvas
            .texts_in(Layer::Content)
            .into_iter()
            .flat_map(str::split_whitespace)
            .collect();
        let expected: Vec<&str> = analysis
            .selected_sentences
            .iter()
            .flat_map(|s| s.split_whitespace())
            .collect();
        assert_eq!(rendered, expected, "{}", tone);
    }
}

// ========================================
// Wrapping and colors
// ========================================

#[test]
fn test_wrap_width_of_one_word() {
    let canvas = RecordingCanvas::new(100, 100);
    let font = FontSpec::new("sans", 10.0, mirror_art::FontWeight::Regular);
    let word_width = canvas.measure_text("abcd", &font).unwrap();

    let lines = wrap_text("abcd efgh ijkl", word_width, |s| canvas.measure_text(s, &font)).unwrap();
    assert_eq!(lines, vec!["abcd", "efgh", "ijkl"]);
}

#[test]
fn test_wrap_wide_enough_for_sentence() {
    let canvas = RecordingCanvas::new(100, 100);
    let font = FontSpec::new("sans", 10.0, mirror_art::FontWeight::Bold);
    let sentence = "every door opens onto the sea";
    let full = canvas.measure_text(sentence, &font).unwrap();

    let lines = wrap_text(sentence, full + 1.0, |s| canvas.measure_text(s, &font)).unwrap();
    assert_eq!(lines, vec![sentence]);
}

#[test]
fn test_wrap_keeps_every_word() {
    let text = "one two three four five six seven eight nine ten eleven";
    for max in [1.0, 8.0, 13.0, 20.0, 500.0] {
        let lines = wrap_text(text, max, |s| Ok(s.len() as f32)).unwrap();
        assert_eq!(lines.join(" "), text, "max width {}", max);
    }
}

#[test]
fn test_add_alpha() {
    assert_eq!(add_alpha("#000000", 0.5), "rgba(0, 0, 0, 0.5)");
    assert_eq!(add_alpha("not-a-hex", 0.5), "not-a-hex");
}

#[test]
fn test_measure_failure_aborts_render() {
    struct BrokenCanvas(RecordingCanvas);

    impl Canvas for BrokenCanvas {
        fn width(&self) -> u32 {
            self.0.width()
        }
        fn height(&self) -> u32 {
            self.0.height()
        }
        fn draw(&mut self, op: DrawOp) -> mirror_art::Result<()> {
            self.0.draw(op)
        }
        fn measure_text(&self, _: &str, _: &FontSpec) -> mirror_art::Result<f32> {
            Err(RenderError::Measure("font unavailable".to_string()))
        }
    }

    let mut canvas = BrokenCanvas(RecordingCanvas::new(ARTIFACT_SIZE, ARTIFACT_SIZE));
    let result = render_artifact(&mut canvas, &sample("gentle"));
    assert!(matches!(result, Err(RenderError::Measure(_))));
    assert!(canvas.0.texts_in(Layer::Branding).is_empty());
}
