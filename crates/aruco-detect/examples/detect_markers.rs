//! Detect markers in an image file and print their ids and corners.
//!
//! ```text
//! cargo run --example detect_markers --features image -- photo.png [DICT_6X6_250]
//! ```

use aruco_detect::detect::detect_markers_with_stats;
use aruco_detect::{builtins, DetectorParams};
use image::ImageReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    aruco_detect::core::init_with_level(log::LevelFilter::Info)?;

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: detect_markers <image> [dictionary-name]");
        std::process::exit(2);
    };
    let dict_name = args.next().unwrap_or_else(|| "DICT_6X6_250".to_string());

    let dict = builtins::builtin_dictionary(&dict_name)
        .ok_or_else(|| format!("unknown dictionary {dict_name:?}"))?;
    let img = ImageReader::open(&path)?.decode()?.to_luma8();

    let (markers, stats) = detect_markers_with_stats(&img, dict, DetectorParams::default())?;

    println!(
        "{}: {} contours, {} candidates, {} markers",
        path,
        stats.contours,
        stats.quad_candidates,
        markers.len()
    );
    for m in &markers {
        let c = &m.corners;
        println!(
            "  id {:4}  corners ({:7.1},{:7.1}) ({:7.1},{:7.1}) ({:7.1},{:7.1}) ({:7.1},{:7.1})",
            m.id, c[0].x, c[0].y, c[1].x, c[1].y, c[2].x, c[2].y, c[3].x, c[3].y
        );
    }
    Ok(())
}
