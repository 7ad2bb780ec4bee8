//! # Viewer
//!
//! Minimal interactive front end for the tuner.
//!
//! ```text
//! cargo run --example viewer -- left.png right.png [config.toml]
//! ```
//!
//! Up/Down selects a parameter, Left/Right steps it and PageUp/PageDown page-steps it. The value
//! snaps when the key is released.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use cv_disparity_tuner::prelude::*;
use image::GrayImage;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

// -----------------------------------------------------------------------------------------------
// MAIN
// -----------------------------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let left = args.next().ok_or("usage: viewer <left> <right> [config.toml]")?;
    let right = args.next().ok_or("usage: viewer <left> <right> [config.toml]")?;
    let config = match args.next() {
        Some(path) => TunerConfig::from_file(path)?,
        None => TunerConfig::default()
    };

    let mut pipeline = RenderPipeline::new(&config)?;
    report(pipeline.handle(Event::FileChosen { side: Side::Left, path: left.into() }));
    report(pipeline.handle(Event::FileChosen { side: Side::Right, path: right.into() }));

    let mut window = Window::new(
        "Disparity Image",
        WIDTH,
        HEIGHT,
        WindowOptions::default()
    )?;

    window.set_target_fps(60);

    let mut buffer: Vec<u32> = vec![0; WIDTH * HEIGHT];
    let mut selected = 0usize;
    print_labels(&pipeline, selected);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let parameter = ParameterKind::ALL[selected];

        if window.is_key_pressed(Key::Down, KeyRepeat::No) {
            selected = (selected + 1) % ParameterKind::ALL.len();
            print_labels(&pipeline, selected);
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::No) {
            selected = (selected + ParameterKind::ALL.len() - 1) % ParameterKind::ALL.len();
            print_labels(&pipeline, selected);
        }

        let mut events = Vec::new();
        for (key, direction, page) in [
            (Key::Right, Direction::Up, false),
            (Key::Left, Direction::Down, false),
            (Key::PageUp, Direction::Up, true),
            (Key::PageDown, Direction::Down, true)
        ].iter() {
            if window.is_key_pressed(*key, KeyRepeat::Yes) {
                events.push(match page {
                    true => Event::ParameterPaged { parameter, direction: *direction },
                    false => Event::ParameterStepped { parameter, direction: *direction }
                });
            }
            if window.is_key_released(*key) {
                events.push(Event::ParameterReleased { parameter });
            }
        }

        for event in events {
            report(pipeline.handle(event));
            print_labels(&pipeline, selected);
        }

        if let Some(composite) = pipeline.composite() {
            draw(composite, &mut buffer);
        }

        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }

    Ok(())
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

fn report(result: RenderResult) {
    match result {
        RenderResult::Warning(w) => eprintln!("{}: {}", w.title, w.message),
        RenderResult::Failed(e) => eprintln!("Error: {}", e),
        _ => ()
    }
}

fn print_labels<L: ImageLoader, D: DisparityAlgorithm>(
    pipeline: &RenderPipeline<L, D>,
    selected: usize
) {
    for (i, kind) in ParameterKind::ALL.iter().enumerate() {
        let marker = if i == selected { ">" } else { " " };
        println!("{} {}", marker, pipeline.parameters().label_text(*kind));
    }
    println!();
}

/// Draw the composite into the top left of the frame buffer, cropping anything that doesn't fit.
fn draw(image: &GrayImage, buffer: &mut [u32]) {
    for px in buffer.iter_mut() {
        *px = 0;
    }

    let w = (image.width() as usize).min(WIDTH);
    let h = (image.height() as usize).min(HEIGHT);

    for y in 0..h {
        for x in 0..w {
            buffer[x + y * WIDTH] = luma_to_u32(image.get_pixel(x as u32, y as u32));
        }
    }
}

fn luma_to_u32(luma: &image::Luma<u8>) -> u32 {
    (luma[0] as u32) << 16 | (luma[0] as u32) << 8 | luma[0] as u32 
}
