use std::io::Cursor;

use geotrace::{
    BoundaryVectorizer, Channel, GeoBounds, GeoPoint, GeoPolygon, Geotrace, GeotraceError,
    GeotraceResult, MaskProcessingOptions, MaskVectorizer, RasterMask, vectorize,
};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgba, RgbaImage};

fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn gray_png(w: u32, h: u32, f: impl Fn(u32, u32) -> u8) -> Vec<u8> {
    encode_png(&DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, y| {
        Luma([f(x, y)])
    })))
}

fn unit_bounds() -> GeoBounds {
    GeoBounds::new(1.0, 0.0, 1.0, 0.0)
}

#[test]
fn all_background_is_empty() {
    let png = gray_png(32, 24, |_, _| 0);
    let poly = vectorize(&png, &unit_bounds(), 127).unwrap();
    assert!(poly.is_empty());
}

#[test]
fn below_threshold_is_background() {
    let png = gray_png(8, 8, |_, _| 126);
    assert!(vectorize(&png, &unit_bounds(), 127).unwrap().is_empty());
    assert!(!vectorize(&png, &unit_bounds(), 126).unwrap().is_empty());
}

#[test]
fn single_pixel_scenario() {
    let png = gray_png(10, 10, |x, y| if (x, y) == (5, 5) { 255 } else { 0 });
    let poly = vectorize(&png, &unit_bounds(), 127).unwrap();

    let pairs = poly.to_pairs();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0], pairs[1]);
    assert!((pairs[0][0] - 0.444).abs() < 1e-3);
    assert!((pairs[0][1] - 0.556).abs() < 1e-3);
}

#[test]
fn four_by_four_full_scenario() {
    let png = gray_png(4, 4, |_, _| 255);
    let bounds = GeoBounds::new(10.0, 0.0, 10.0, 0.0);
    let poly = vectorize(&png, &bounds, 1).unwrap();

    assert!(poly.is_closed());
    assert_eq!(poly.points().first(), Some(&GeoPoint::new(10.0, 0.0)));
    for p in poly.points() {
        assert!(bounds.contains(p));
        assert!(p.lat == 0.0 || p.lat == 10.0 || p.lon == 0.0 || p.lon == 10.0);
    }
}

#[test]
fn full_frame_reaches_the_corners() {
    let png = gray_png(64, 48, |_, _| 255);
    let bounds = GeoBounds::new(47.61, 47.60, -122.32, -122.34);
    let poly = vectorize(&png, &bounds, 127).unwrap();

    assert!(poly.is_closed());
    assert!(poly.len() <= 201);
    // within one pixel of each corner
    let lat_px = (bounds.north - bounds.south) / 47.0;
    let lon_px = (bounds.east - bounds.west) / 63.0;
    for (lat, lon) in [
        (bounds.north, bounds.west),
        (bounds.north, bounds.east),
        (bounds.south, bounds.east),
        (bounds.south, bounds.west),
    ] {
        let near = poly.points().iter().any(|p| {
            (p.lat - lat).abs() <= lat_px + 1e-12 && (p.lon - lon).abs() <= lon_px + 1e-12
        });
        assert!(near, "no vertex near ({lat}, {lon})");
    }
}

#[test]
fn output_is_deterministic() {
    let png = gray_png(50, 40, |x, y| {
        let (dx, dy) = (x as i32 - 25, y as i32 - 20);
        if dx * dx + dy * dy < 200 { 255 } else { 0 }
    });
    let a = vectorize(&png, &unit_bounds(), 127).unwrap();
    let b = vectorize(&png, &unit_bounds(), 127).unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn alpha_channel_can_drive_the_mask() {
    let img = RgbaImage::from_fn(6, 6, |x, _| {
        if x >= 3 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let png = encode_png(&DynamicImage::ImageRgba8(img));

    let red = Geotrace::new().vectorize_bytes(&png, &unit_bounds()).unwrap();
    assert!(red.is_empty());

    let alpha = Geotrace::new()
        .with_channel(Channel::Alpha)
        .vectorize_bytes(&png, &unit_bounds())
        .unwrap();
    assert!(alpha.is_closed());
    assert!(alpha.points().iter().all(|p| p.lon >= 0.6 - 1e-12));
}

#[test]
fn fill_holes_does_not_change_outer_ring() {
    let png = gray_png(12, 12, |x, y| {
        let ring = (2..10).contains(&x) && (2..10).contains(&y);
        let hole = (4..8).contains(&x) && (4..8).contains(&y);
        if ring && !hole { 255 } else { 0 }
    });
    let plain = Geotrace::new().vectorize_bytes(&png, &unit_bounds()).unwrap();
    let filled = Geotrace::new()
        .with_mask_processing(MaskProcessingOptions {
            fill_holes: true,
            ..Default::default()
        })
        .vectorize_bytes(&png, &unit_bounds())
        .unwrap();
    assert_eq!(plain, filled);
}

#[test]
fn undecodable_bytes_propagate() {
    let err = vectorize(b"\x89PNG not really", &unit_bounds(), 127).unwrap_err();
    assert!(matches!(err, GeotraceError::Image(_)));
}

#[test]
fn vectorize_path_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan-mask.png");
    std::fs::write(&path, gray_png(20, 20, |x, _| if x < 10 { 255 } else { 0 })).unwrap();

    let poly = Geotrace::new()
        .with_max_vertices(8)
        .vectorize_path(&path, &unit_bounds())
        .unwrap();
    assert!(poly.is_closed());
    assert!(poly.len() <= 9);
}

#[test]
fn polygon_json_round_trips_for_map_layers() {
    let png = gray_png(5, 5, |_, _| 255);
    let poly = vectorize(&png, &unit_bounds(), 127).unwrap();
    let json = serde_json::to_string(&poly).unwrap();
    let back: GeoPolygon = serde_json::from_str(&json).unwrap();
    assert_eq!(back, poly);
    assert!(json.starts_with("[[1.0,0.0],"));
}

fn blob_image() -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(60, 45, |x, y| {
        let (dx, dy) = (x as i32 - 30, y as i32 - 22);
        Luma([if dx * dx + 2 * dy * dy < 500 { 255 } else { 0 }])
    }))
}

#[test]
fn vectorize_image_matches_encoded_bytes() {
    let image = blob_image();
    let geotrace = Geotrace::new().with_max_vertices(50);

    let from_image = geotrace.vectorize_image(&image, &unit_bounds());
    let from_bytes = geotrace
        .vectorize_bytes(&encode_png(&image), &unit_bounds())
        .unwrap();
    assert!(from_image.is_closed());
    assert_eq!(from_image, from_bytes);
}

#[test]
fn vectorize_with_boundary_matches_built_in() {
    let geotrace = Geotrace::new().with_max_vertices(32);
    let mask = geotrace.mask_from_image(&blob_image());

    let custom = geotrace
        .vectorize_with(&BoundaryVectorizer::new(32), &mask, &unit_bounds())
        .unwrap();
    assert_eq!(custom, geotrace.vectorize_mask(&mask, &unit_bounds()));
    assert!(custom.len() <= 33);

    let coarser = geotrace
        .vectorize_with(&BoundaryVectorizer::new(8), &mask, &unit_bounds())
        .unwrap();
    assert!(coarser.len() <= 9);
    assert_eq!(coarser.points()[0], custom.points()[0]);
}

/// Counts foreground pixels instead of tracing them.
struct AreaVectorizer;

impl MaskVectorizer for AreaVectorizer {
    type Output = usize;

    fn vectorize(&self, mask: &RasterMask, _bounds: &GeoBounds) -> GeotraceResult<usize> {
        Ok(mask.foreground_count())
    }
}

#[test]
fn vectorize_with_accepts_other_implementations() {
    let geotrace = Geotrace::new();
    let mask = geotrace.mask_from_image(&blob_image());
    let area = geotrace
        .vectorize_with(&AreaVectorizer, &mask, &unit_bounds())
        .unwrap();
    assert_eq!(area, mask.foreground_count());
    assert!(area > 0);
}
