/// Basic example: Convert a simple test image to a glyph mosaic
///
/// This creates a test image with some basic shapes and asciifies it
use asciify::{AsciifyConfig, asciify};
use image::{Rgb, RgbImage};

fn main() {
    println!("Asciify - Basic Example");
    println!("=======================\n");

    // 100x70 is deliberately not a multiple of the cell size
    let width = 100;
    let height = 70;
    let mut img = RgbImage::from_pixel(width, height, Rgb([30, 30, 60]));

    // Draw an orange disc in the center
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let radius = 25.0;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - center_x;
            let dy = y as f32 - center_y;
            if (dx * dx + dy * dy).sqrt() < radius {
                img.put_pixel(x, y, Rgb([240, 150, 40]));
            }
        }
    }

    // Draw a diagonal line
    for i in 0..height {
        img.put_pixel(i, i, Rgb([255, 255, 255]));
    }

    println!("Created test image: {}x{}", width, height);

    let config = AsciifyConfig {
        cell_size: 10,
        color_budget: 16,
        charset: "01/#".to_string(),
        ..Default::default()
    };

    println!("Processing with config:");
    println!("  - Cell size: {}", config.cell_size);
    println!("  - Color budget: {}", config.color_budget);
    println!("  - Charset: {:?}", config.charset);
    println!();

    let mut progress = |fraction: f64| println!("  {:>3.0}%", fraction * 100.0);
    let output = match asciify(&img, &config, &mut progress) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Failed: {}", e);
            return;
        }
    };

    img.save("basic_input.png").expect("Failed to save input");
    output
        .save("basic_output.png")
        .expect("Failed to save output");

    println!("✓ Saved input to:  basic_input.png");
    println!("✓ Saved output to: basic_output.png");
}
