//! # Render pipeline
//!
//! Drives the pipeline end to end with real image files on disk.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use cv_disparity_tuner::prelude::*;
use cv_disparity_tuner::{pipeline, scaling, Error};
use image::{GrayImage, Luma};
use tempfile::tempdir;

// -----------------------------------------------------------------------------------------------
// HELPERS
// -----------------------------------------------------------------------------------------------

fn texture(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let h = (x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503))
            .wrapping_mul(2_246_822_519);
        Luma([(h >> 24) as u8])
    })
}

/// Right view of a fronto-parallel scene at constant disparity `shift`.
fn shifted(left: &GrayImage, shift: u32) -> GrayImage {
    GrayImage::from_fn(left.width(), left.height(), |x, y| {
        *left.get_pixel((x + shift).min(left.width() - 1), y)
    })
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[test]
fn default_parameters_render_distinct_sizes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let left_path = dir.path().join("left.png");
    let right_path = dir.path().join("right.jpg");
    texture(640, 480).save(&left_path)?;
    texture(800, 600).save(&right_path)?;

    let mut pipeline = RenderPipeline::new(&TunerConfig::default())?;
    assert_eq!(pipeline.state(), PipelineState::NoImages);

    let result = pipeline.handle(Event::FileChosen { side: Side::Left, path: left_path });
    assert!(matches!(result, RenderResult::Skipped(Error::NotReady)));
    assert_eq!(pipeline.state(), PipelineState::NoImages);
    assert!(pipeline.composite().is_none());

    let result = pipeline.handle(Event::FileChosen { side: Side::Right, path: right_path });
    let expected = scaling::compute_target_size(
        Dimensions::new(640, 480),
        Dimensions::new(800, 600),
        10
    );
    assert!(matches!(result, RenderResult::Rendered(d) if d == expected));
    assert_eq!(pipeline.state(), PipelineState::Rendered);
    assert_eq!(pipeline.composite().map(Dimensions::of), Some(expected));

    Ok(())
}

#[test]
fn labels_follow_interaction() -> Result<(), Box<dyn std::error::Error>> {
    let mut pipeline = RenderPipeline::new(&TunerConfig::default())?;

    pipeline.handle(Event::ParameterStepped {
        parameter: ParameterKind::Opacity,
        direction: Direction::Up
    });
    assert_eq!(pipeline.parameters().label_text(ParameterKind::Opacity), "Opacity: 0.51");

    pipeline.handle(Event::ParameterReleased { parameter: ParameterKind::Opacity });
    assert_eq!(pipeline.parameters().label_text(ParameterKind::Opacity), "Opacity: 0.52");

    Ok(())
}

#[test]
fn block_matching_shows_scene_depth() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let left_path = dir.path().join("left.png");
    let right_path = dir.path().join("right.png");
    let left = texture(120, 80);
    shifted(&left, 6).save(&right_path)?;
    left.save(&left_path)?;

    // Full scale, disparity only
    let mut config = TunerConfig::default();
    config.scaling_factor.default = 100;
    config.opacity.default = 0;
    config.disparities.default = 16;
    config.kernel_size.default = 7;

    let mut pipeline = RenderPipeline::new(&config)?;
    pipeline.choose_file(Side::Left, left_path);
    let result = pipeline.choose_file(Side::Right, right_path);
    assert!(result.is_rendered());

    let composite = pipeline.composite().ok_or("no composite")?;
    let expected = 6.0 * 255.0 / 16.0;
    for y in 10..70 {
        for x in 30..100 {
            let val = f32::from(composite.get_pixel(x, y)[0]);
            assert!((val - expected).abs() < 9.0, "pixel ({}, {}) was {}", x, y, val);
        }
    }

    Ok(())
}

#[test]
fn oversized_kernel_keeps_previous_image() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let left_path = dir.path().join("left.png");
    let right_path = dir.path().join("right.png");
    texture(320, 240).save(&left_path)?;
    texture(320, 240).save(&right_path)?;

    let mut pipeline = RenderPipeline::new(&TunerConfig::default())?;
    pipeline.choose_file(Side::Left, &left_path);
    pipeline.choose_file(Side::Right, &right_path);
    let shown = pipeline.composite().ok_or("no composite")?.clone();
    assert_eq!(Dimensions::of(&shown), Dimensions::new(32, 24));

    // Kernel 25 no longer fits a 24 pixel high image
    for _ in 0..10 {
        pipeline.step(ParameterKind::KernelSize, Direction::Up);
    }
    match pipeline.release(ParameterKind::KernelSize) {
        RenderResult::Warning(w) => {
            assert_eq!(w.title, pipeline::WARNING_TITLE);
            assert_eq!(
                w.message,
                "Kernel size exceeds image Height or Width. Reduce the kernel size."
            );
        },
        other => return Err(format!("expected a warning, got {:?}", other).into())
    }
    assert_eq!(pipeline.state(), PipelineState::Warned);
    assert_eq!(pipeline.composite(), Some(&shown));

    Ok(())
}

#[test]
fn corrupt_image_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let left_path = dir.path().join("left.png");
    let right_path = dir.path().join("right.png");
    texture(64, 64).save(&left_path)?;
    std::fs::write(&right_path, b"definitely not a png")?;

    let mut pipeline = RenderPipeline::new(&TunerConfig::default())?;
    pipeline.choose_file(Side::Left, left_path);
    let result = pipeline.choose_file(Side::Right, right_path);

    assert!(matches!(result, RenderResult::Failed(Error::DecodeFailed { .. })));
    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert!(pipeline.composite().is_none());

    Ok(())
}
