use super::*;

fn checker() -> Bitmap {
    // 2x2: opaque red, half-transparent gray, transparent, opaque white
    Bitmap::from_rgba(
        2,
        2,
        vec![
            255, 0, 0, 255, //
            100, 100, 100, 128, //
            0, 0, 0, 0, //
            255, 255, 255, 255,
        ],
    )
    .unwrap()
}

#[test]
fn from_rgba_checks_buffer_length() {
    assert!(Bitmap::from_rgba(2, 2, vec![0; 15]).is_none());
    let bitmap = checker();
    assert!(bitmap.is_ok());
    assert!(bitmap.alpha());
    assert_eq!(bitmap.pixel(1, 1), Some([255, 255, 255, 255]));
    assert_eq!(bitmap.pixel(2, 0), None);
}

#[test]
fn new_bitmap_is_not_ok_until_written() {
    let mut bitmap = Bitmap::new(3, 3, false, true);
    assert!(!bitmap.is_ok());
    bitmap.set_argb_pixels(0, 0, 1, 1, &[255, 1, 2, 3], false, false);
    assert!(bitmap.is_ok());
    assert_eq!(bitmap.pixel(0, 0), Some([1, 2, 3, 255]));
}

#[test]
fn classification_inspects_pixels() {
    let bitmap = checker();
    assert!(bitmap.is_color());
    assert!(bitmap.has_alpha_channel());
    assert!(!bitmap.is_monochrome());
    assert_eq!(bitmap.depth(), 32);

    let mono = Bitmap::from_rgba(1, 2, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
    assert!(mono.is_monochrome());
    assert!(!mono.is_color());
    assert_eq!(mono.depth(), 1);
}

#[test]
fn loaded_mask_inverts_alpha_into_gray() {
    let mask = checker().loaded_mask();
    assert_eq!(mask.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(mask.pixel(0, 1), Some([255, 255, 255, 255]));
    assert_eq!(mask.pixel(1, 0), Some([127, 127, 127, 255]));
}

#[test]
fn argb_readback_variants() {
    let bitmap = checker();
    let plain = bitmap.get_argb_pixels(0, 0, 2, 1, false, false);
    assert_eq!(plain, vec![255, 255, 0, 0, 128, 100, 100, 100]);

    let alpha = bitmap.get_argb_pixels(0, 0, 2, 1, true, false);
    assert_eq!(alpha, vec![255, 0, 0, 0, 128, 0, 0, 0]);

    let pre = bitmap.get_argb_pixels(1, 0, 1, 1, false, true);
    assert_eq!(pre, vec![128, 50, 50, 50]);
}

#[test]
fn alpha_only_write_without_alpha_channel_gives_inverse_gray() {
    let mut bitmap = Bitmap::new(1, 1, false, false);
    bitmap.set_argb_pixels(0, 0, 1, 1, &[200, 9, 9, 9], true, false);
    assert_eq!(bitmap.pixel(0, 0), Some([55, 55, 55, 255]));

    let mut with_alpha = Bitmap::new(1, 1, false, true);
    with_alpha.set_argb_pixels(0, 0, 1, 1, &[200, 9, 9, 9], true, false);
    assert_eq!(with_alpha.pixel(0, 0).map(|p| p[3]), Some(200));
}

#[test]
fn premultiplied_write_divides_by_alpha() {
    let mut bitmap = Bitmap::new(1, 1, false, true);
    bitmap.set_argb_pixels(0, 0, 1, 1, &[128, 64, 200, 0], false, true);
    // Color bytes above alpha are capped first.
    assert_eq!(bitmap.pixel(0, 0), Some([128, 255, 0, 128]));
}

#[test]
fn surface_conversion_preserves_opaque_pixels() {
    let bitmap = Bitmap::from_rgba(2, 1, vec![10, 20, 30, 255, 200, 100, 50, 255]).unwrap();
    let mut surface = bitmap.to_surface().unwrap();
    let back = Bitmap::from_surface(&mut surface).unwrap();
    assert_eq!(back.pixels(), bitmap.pixels());
    assert!(!back.alpha());
}

#[test]
fn png_save_and_blocking_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");
    checker().save_file(&path, ImageFormat::Png, 90).unwrap();

    let loaded = futures::executor::block_on(Bitmap::load_file(&path)).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (2, 2));
    assert_eq!(loaded.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(loaded.pixel(1, 1), Some([255, 255, 255, 255]));
}

#[test]
fn jpeg_save_writes_a_decodable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.jpg");
    checker().save_file(&path, ImageFormat::Jpeg, 95).unwrap();
    let decoded = Bitmap::decode(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2, 2));
}

#[test]
fn unsupported_formats_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = checker()
        .save_file(&dir.path().join("out.bmp"), ImageFormat::Bmp, 90)
        .unwrap_err();
    assert!(matches!(err, DrawError::UnsupportedFormat(f) if f == "bmp"));
}

#[test]
fn format_guessing_uses_the_extension() {
    assert_eq!(ImageFormat::from_path(Path::new("a.PNG")), Some(ImageFormat::Png));
    assert_eq!(ImageFormat::from_path(Path::new("a.jpg")), Some(ImageFormat::Jpeg));
    assert_eq!(ImageFormat::from_path(Path::new("a.tiff")), None);
    assert_eq!(ImageFormat::from_path(Path::new("noext")), None);
}

#[test]
fn missing_file_never_becomes_ready() {
    let mut pending = Bitmap::load_file("/nonexistent/vecdraw-test.png");
    let result = futures::executor::block_on(&mut pending);
    assert!(matches!(result, Err(DrawError::Load(_))));
}

#[test]
fn non_file_urls_fail_immediately() {
    let mut pending = Bitmap::load_url("https://example.com/a.png");
    assert!(!pending.is_ready());
    assert!(pending.failure().is_some());
}

#[test]
fn polling_reports_readiness_once_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("poll.png");
    checker().save_file(&path, ImageFormat::Png, 90).unwrap();

    let url = url::Url::from_file_path(&path).unwrap();
    let mut pending = Bitmap::load_url(url.as_str());
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    while !pending.is_ready() && std::time::Instant::now() < deadline {
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    assert_eq!(pending.try_ready().map(Bitmap::width), Some(2));
    assert!(pending.failure().is_none());
}
