//! Integration tests for canvas2d-engine.

mod common;

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use canvas2d_engine::{
    Bitmap, Canvas2dContextBuilder, Canvas2dError, CanvasColorType, CanvasPath, ContextSettings,
    DecodedImage, DirtyRect, FloatRect, ImageBitmap, ImageCropParams, ImageData, IntRect, PaintOp,
    Path2D, RectParams, WindingRule,
};
use common::{pixel, raster, recording};

fn rect(x: f32, y: f32, width: f32, height: f32) -> RectParams {
    RectParams {
        x,
        y,
        width,
        height,
    }
}

fn solid_bitmap(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
    let data: Vec<u8> = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    Bitmap::from_rgba8(width, height, &data).unwrap()
}

/// Test creating a canvas and drawing basic shapes.
#[test]
fn test_draw_rectangle() {
    let mut ctx = raster(200, 200);
    assert!(ctx.set_fill_style("#ff0000"));
    ctx.fill_rect(&rect(10.0, 10.0, 100.0, 100.0));

    let data = ctx.get_image_data(0, 0, 200, 200).unwrap();
    let idx = (50 * 200 + 50) * 4;
    assert_eq!(&data.data()[idx..idx + 4], &[255, 0, 0, 255]);
    let idx = (150 * 200 + 150) * 4;
    assert_eq!(&data.data()[idx..idx + 4], &[0, 0, 0, 0]);
}

/// Test path operations.
#[test]
fn test_path_operations() {
    let mut ctx = raster(100, 100);
    ctx.set_fill_style("#00ff00");
    ctx.begin_path();
    ctx.move_to(10.0, 10.0);
    ctx.line_to(90.0, 10.0);
    ctx.line_to(90.0, 90.0);
    ctx.line_to(10.0, 90.0);
    ctx.close_path();
    ctx.fill();

    assert_eq!(pixel(&ctx, 50, 50), [0, 255, 0, 255]);
    assert_eq!(pixel(&ctx, 5, 5), [0, 0, 0, 0]);
}

#[test]
fn test_stroke_operations() {
    let mut ctx = raster(100, 100);
    ctx.set_stroke_style("#0000ff");
    ctx.set_line_width(4.0);
    ctx.begin_path();
    ctx.move_to(10.0, 50.0);
    ctx.line_to(90.0, 50.0);
    ctx.stroke();

    assert_eq!(pixel(&ctx, 50, 50), [0, 0, 255, 255]);
    assert_eq!(pixel(&ctx, 50, 40), [0, 0, 0, 0]);
}

#[test]
fn test_fill_leaves_current_path_open() {
    let mut ctx = recording(100, 100);
    ctx.move_to(0.0, 0.0);
    ctx.line_to(10.0, 0.0);
    ctx.line_to(10.0, 10.0);
    ctx.fill();
    ctx.line_to(0.0, 50.0);
    ctx.fill();

    let bounds: Vec<FloatRect> = ctx
        .painter()
        .paint_ops()
        .map(|op| match op {
            PaintOp::FillPath { path, .. } => path.bounding_box(),
            other => panic!("unexpected op {:?}", other),
        })
        .collect();
    assert_eq!(
        bounds,
        vec![
            FloatRect::new(0.0, 0.0, 10.0, 10.0),
            FloatRect::new(0.0, 0.0, 10.0, 50.0),
        ]
    );
}

#[test]
fn test_transform_applies_to_path_at_construction() {
    let mut ctx = raster(100, 100);
    ctx.set_fill_style("#ff0000");
    ctx.translate(50.0, 50.0);
    ctx.rect(&rect(0.0, 0.0, 10.0, 10.0));
    // Resetting the transform afterwards does not move the path
    ctx.reset_transform();
    ctx.fill();

    assert_eq!(pixel(&ctx, 55, 55), [255, 0, 0, 255]);
    assert_eq!(pixel(&ctx, 5, 5), [0, 0, 0, 0]);
}

#[test]
fn test_clip_and_restore() {
    let mut ctx = raster(100, 100);
    ctx.set_fill_style("#ff0000");
    ctx.save();
    ctx.rect(&rect(0.0, 0.0, 50.0, 100.0));
    ctx.clip();
    ctx.fill_rect(&rect(0.0, 0.0, 100.0, 100.0));
    ctx.restore();

    assert_eq!(pixel(&ctx, 25, 50), [255, 0, 0, 255]);
    assert_eq!(pixel(&ctx, 75, 50), [0, 0, 0, 0]);

    ctx.fill_rect(&rect(0.0, 0.0, 100.0, 100.0));
    assert_eq!(pixel(&ctx, 75, 50), [255, 0, 0, 255]);
}

#[test]
fn test_save_restore_state() {
    let mut ctx = raster(10, 10);
    ctx.set_global_alpha(0.5);
    ctx.set_line_width(3.0);
    ctx.save();
    ctx.set_global_alpha(0.25);
    ctx.set_line_width(7.0);
    assert!(ctx.set_global_composite_operation("multiply"));
    ctx.restore();

    assert_eq!(ctx.get_global_alpha(), 0.5);
    assert_eq!(ctx.get_line_width(), 3.0);
    assert_eq!(ctx.get_global_composite_operation(), "source-over");

    // Unbalanced restore is a no-op
    ctx.restore();
    assert_eq!(ctx.get_global_alpha(), 0.5);
}

#[test]
fn test_reset_clears_pixels_and_state() {
    let mut ctx = raster(20, 20);
    ctx.set_fill_style("#ff0000");
    ctx.set_global_alpha(0.5);
    ctx.save();
    ctx.fill_rect(&rect(0.0, 0.0, 20.0, 20.0));
    ctx.reset();

    assert_eq!(pixel(&ctx, 10, 10), [0, 0, 0, 0]);
    assert_eq!(ctx.get_global_alpha(), 1.0);
    assert!(ctx.get_transform().is_identity());
}

#[test]
fn test_set_size_reallocates() {
    let mut ctx = raster(20, 20);
    ctx.set_fill_style("#ff0000");
    ctx.fill_rect(&rect(0.0, 0.0, 20.0, 20.0));
    ctx.set_size(40, 30).unwrap();

    assert_eq!((ctx.width(), ctx.height()), (40, 30));
    assert_eq!(pixel(&ctx, 10, 10), [0, 0, 0, 0]);
    let data = ctx.get_image_data(0, 0, 40, 30).unwrap();
    assert_eq!(data.data().len(), 40 * 30 * 4);
}

#[test]
fn test_path2d_from_svg() {
    let mut ctx = raster(50, 50);
    ctx.set_fill_style("#0000ff");
    let path = Path2D::from_svg_path_data("M10 10 H30 V30 H10 Z").unwrap();
    ctx.fill_path2d(&path);

    assert_eq!(pixel(&ctx, 20, 20), [0, 0, 255, 255]);
    assert_eq!(pixel(&ctx, 40, 40), [0, 0, 0, 0]);
    assert!(ctx.is_point_in_path2d(&path, 20.0, 20.0, WindingRule::NonZero));
    assert!(!ctx.is_point_in_path2d(&path, 40.0, 40.0, WindingRule::NonZero));
}

#[test]
fn test_linear_gradient() {
    let mut ctx = raster(100, 10);
    let mut gradient = ctx.create_linear_gradient(0.0, 0.0, 100.0, 0.0);
    gradient.add_color_stop(0.0, "#ff0000").unwrap();
    gradient.add_color_stop(1.0, "#0000ff").unwrap();
    ctx.set_fill_style_gradient(gradient);
    ctx.fill_rect(&rect(0.0, 0.0, 100.0, 10.0));

    let left = pixel(&ctx, 1, 5);
    let right = pixel(&ctx, 98, 5);
    assert!(left[0] > 240 && left[2] < 15);
    assert!(right[2] > 240 && right[0] < 15);
}

#[test]
fn test_draw_image_clips_source_rect() {
    let mut ctx = recording(100, 100);
    let image = DecodedImage::new(solid_bitmap(100, 100, [0, 255, 0, 255]));
    ctx.draw_image_cropped(
        &image,
        &ImageCropParams {
            sx: 80.0,
            sy: 80.0,
            sw: 40.0,
            sh: 40.0,
            dx: 0.0,
            dy: 0.0,
            dw: 40.0,
            dh: 40.0,
        },
    )
    .unwrap();

    let ops: Vec<&PaintOp> = ctx.painter().paint_ops().collect();
    assert_eq!(ops.len(), 1);
    match ops[0] {
        PaintOp::DrawBitmap {
            source,
            destination,
            ..
        } => {
            assert_eq!(*source, IntRect::new(80, 80, 20, 20));
            assert_eq!(*destination, FloatRect::new(0.0, 0.0, 20.0, 20.0));
        }
        other => panic!("unexpected op {:?}", other),
    }
}

#[test]
fn test_draw_image_pixels() {
    let mut ctx = raster(20, 20);
    let image = DecodedImage::new(solid_bitmap(4, 4, [0, 0, 255, 255]));
    ctx.draw_image_with_size(&image, 5.0, 5.0, 8.0, 8.0).unwrap();

    assert_eq!(pixel(&ctx, 8, 8), [0, 0, 255, 255]);
    assert_eq!(pixel(&ctx, 15, 15), [0, 0, 0, 0]);
}

#[test]
fn test_draw_image_non_finite_is_noop() {
    let mut ctx = recording(100, 100);
    let image = DecodedImage::new(solid_bitmap(10, 10, [255, 255, 255, 255]));
    ctx.draw_image(&image, f32::NAN, 0.0).unwrap();
    ctx.draw_image_with_size(&image, 0.0, 0.0, f32::INFINITY, 10.0)
        .unwrap();

    assert_eq!(ctx.painter().paint_ops().count(), 0);
    assert!(ctx.take_dirty_region().is_none());
}

#[test]
fn test_draw_pending_image_is_noop() {
    let mut ctx = recording(10, 10);
    ctx.draw_image(&DecodedImage::pending(), 0.0, 0.0).unwrap();
    assert_eq!(ctx.painter().paint_ops().count(), 0);
}

#[test]
fn test_draw_closed_image_bitmap_is_error() {
    let mut ctx = raster(10, 10);
    let mut bitmap = ImageBitmap::new(solid_bitmap(2, 2, [0, 0, 0, 255]));
    bitmap.close();
    assert!(ctx
        .draw_image(&bitmap, 0.0, 0.0)
        .unwrap_err()
        .is_invalid_state());
}

#[test]
fn test_cross_origin_image_taints_canvas() {
    let mut ctx = raster(10, 10);
    let image = DecodedImage::cross_origin(solid_bitmap(2, 2, [255, 0, 0, 255]));
    ctx.draw_image(&image, 0.0, 0.0).unwrap();

    assert!(!ctx.is_origin_clean());
    assert!(ctx.get_image_data(0, 0, 10, 10).unwrap_err().is_security());
    // Index size checks come before the taint check
    assert!(ctx.get_image_data(0, 0, 0, 10).unwrap_err().is_index_size());
}

#[test]
fn test_canvas_to_canvas_draw() {
    let mut source = raster(10, 10);
    source.set_fill_style("#00ff00");
    source.fill_rect(&rect(0.0, 0.0, 10.0, 10.0));
    let snapshot = source.to_image_source();

    let mut ctx = raster(20, 20);
    ctx.draw_image(&snapshot, 10.0, 10.0).unwrap();
    assert_eq!(pixel(&ctx, 15, 15), [0, 255, 0, 255]);
    assert_eq!(pixel(&ctx, 5, 5), [0, 0, 0, 0]);
    assert!(ctx.is_origin_clean());
}

#[test]
fn test_pattern_fill() {
    let mut ctx = raster(20, 20);
    let image = DecodedImage::new(solid_bitmap(2, 2, [255, 0, 255, 255]));
    let pattern = ctx.create_pattern(&image, "repeat").unwrap().unwrap();
    ctx.set_fill_style_pattern(pattern);
    ctx.fill_rect(&rect(0.0, 0.0, 20.0, 20.0));
    assert_eq!(pixel(&ctx, 13, 7), [255, 0, 255, 255]);

    assert!(ctx.create_pattern(&image, "diagonal").is_err());
    assert!(ctx
        .create_pattern(&DecodedImage::pending(), "repeat")
        .unwrap()
        .is_none());
}

#[test]
fn test_put_image_data_ignores_drawing_state() {
    let mut ctx = raster(10, 10);
    ctx.set_global_alpha(0.2);
    assert!(ctx.set_global_composite_operation("multiply"));
    ctx.set_shadow_color("#000000");
    ctx.set_shadow_offset_x(3.0);
    ctx.translate(5.0, 5.0);

    let mut data = ctx.create_image_data(2, 2).unwrap();
    for px in data.data_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&[255, 0, 0, 255]);
    }
    ctx.put_image_data(&data, 1.0, 1.0);

    assert_eq!(pixel(&ctx, 1, 1), [255, 0, 0, 255]);
    assert_eq!(pixel(&ctx, 2, 2), [255, 0, 0, 255]);
    assert_eq!(pixel(&ctx, 6, 6), [0, 0, 0, 0]);
    assert_eq!(pixel(&ctx, 4, 2), [0, 0, 0, 0]);
}

#[test]
fn test_put_image_data_dirty_rect() {
    let mut ctx = raster(10, 10);
    let mut data = ctx.create_image_data(4, 4).unwrap();
    for px in data.data_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&[0, 0, 255, 255]);
    }
    ctx.put_image_data_dirty(
        &data,
        0.0,
        0.0,
        &DirtyRect {
            x: 2,
            y: 2,
            width: -1,
            height: -1,
        },
    );

    assert_eq!(pixel(&ctx, 1, 1), [0, 0, 255, 255]);
    assert_eq!(pixel(&ctx, 2, 2), [0, 0, 0, 0]);
    assert_eq!(pixel(&ctx, 0, 0), [0, 0, 0, 0]);
}

#[test]
fn test_get_put_image_data_round_trip() {
    let mut ctx = raster(10, 10);
    let data = ImageData::from_data(vec![10, 20, 30, 255, 40, 50, 60, 255], 2, None, None).unwrap();
    ctx.put_image_data(&data, 3.0, 4.0);
    let read = ctx.get_image_data(3, 4, 2, 1).unwrap();
    assert_eq!(read.data(), data.data());

    // Negative sizes grow left and up
    let read = ctx.get_image_data(5, 5, -2, -1).unwrap();
    assert_eq!((read.width(), read.height()), (2, 1));
    assert_eq!(read.data(), data.data());
}

#[test]
fn test_create_image_data_sizes() {
    let ctx = raster(10, 10);
    let data = ctx.create_image_data(-3, 5).unwrap();
    assert_eq!((data.width(), data.height()), (3, 5));
    assert!(data.data().iter().all(|&b| b == 0));

    assert!(ctx.create_image_data(0, 5).unwrap_err().is_index_size());
    assert!(ctx.create_image_data(5, 0).unwrap_err().is_index_size());
    assert!(ImageData::new(0, 1, None).unwrap_err().is_index_size());
}

#[test]
fn test_copy_operator_skips_shadow() {
    let mut ctx = recording(100, 100);
    ctx.set_shadow_color("#ff0000");
    ctx.set_shadow_offset_x(5.0);
    ctx.set_shadow_offset_y(5.0);

    ctx.fill_rect(&rect(10.0, 10.0, 10.0, 10.0));
    assert_eq!(ctx.painter().paint_ops().count(), 2);

    ctx.painter_mut().clear();
    assert!(ctx.set_global_composite_operation("copy"));
    ctx.fill_rect(&rect(10.0, 10.0, 10.0, 10.0));
    assert_eq!(ctx.painter().paint_ops().count(), 1);
}

#[test]
fn test_shadow_pixels() {
    let mut ctx = raster(40, 40);
    ctx.set_fill_style("#0000ff");
    ctx.set_shadow_color("#ff0000");
    ctx.set_shadow_offset_x(10.0);
    ctx.set_shadow_offset_y(10.0);
    ctx.fill_rect(&rect(5.0, 5.0, 10.0, 10.0));

    assert_eq!(pixel(&ctx, 10, 10), [0, 0, 255, 255]);
    assert_eq!(pixel(&ctx, 22, 22), [255, 0, 0, 255]);
}

#[test]
fn test_measure_empty_text() {
    let mut ctx = raster(10, 10);
    let metrics = ctx.measure_text("");
    assert_eq!(metrics.width, 0.0);
    assert_eq!(metrics.actual_bounding_box_left, 0.0);
    assert_eq!(metrics.actual_bounding_box_right, 0.0);
}

#[test]
fn test_fill_text_pixels() {
    let mut ctx = raster(60, 30);
    ctx.set_fill_style("#000000");
    assert!(ctx.set_font("20px sans-serif"));
    ctx.fill_text("ab", 5.0, 25.0);

    // Each glyph box is 10 wide and 16 tall above the baseline
    assert_eq!(pixel(&ctx, 10, 20), [0, 0, 0, 255]);
    assert_eq!(pixel(&ctx, 40, 20), [0, 0, 0, 0]);
    assert_eq!(ctx.measure_text("ab").width, 20.0);
}

#[test]
fn test_dirty_observer() {
    let mut ctx = raster(50, 50);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    ctx.set_dirty_observer(move |rect| sink.borrow_mut().push(rect));

    ctx.fill_rect(&rect(10.0, 10.0, 5.0, 5.0));
    ctx.fill_rect(&rect(30.0, 30.0, 5.0, 5.0));

    assert_eq!(
        *seen.borrow(),
        vec![
            FloatRect::new(10.0, 10.0, 5.0, 5.0),
            FloatRect::new(30.0, 30.0, 5.0, 5.0),
        ]
    );
    assert_eq!(
        ctx.take_dirty_region(),
        Some(FloatRect::new(10.0, 10.0, 25.0, 25.0))
    );
    assert_eq!(ctx.take_dirty_region(), None);
}

#[test]
fn test_point_in_path_device_space() {
    let mut ctx = raster(100, 100);
    ctx.scale(2.0, 2.0);
    ctx.rect(&rect(0.0, 0.0, 10.0, 10.0));
    assert!(ctx.is_point_in_path(15.0, 15.0, WindingRule::NonZero));
    assert!(!ctx.is_point_in_path(25.0, 25.0, WindingRule::NonZero));
    assert!(!ctx.is_point_in_path(f32::NAN, 5.0, WindingRule::NonZero));
}

#[test]
fn test_write_png() {
    let mut ctx = raster(16, 8);
    ctx.set_fill_style("#ff0000");
    ctx.fill_rect(&rect(0.0, 0.0, 16.0, 8.0));
    let bytes = ctx.to_png(None).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");
    fs::write(&path, &bytes).unwrap();

    let written = fs::read(&path).unwrap();
    assert_eq!(&written[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

    let decoder = png::Decoder::new(fs::File::open(&path).unwrap());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    assert_eq!((info.width, info.height), (16, 8));
    assert_eq!(&buf[..4], &[255, 0, 0, 255]);
}

#[test]
fn test_png_of_unpainted_canvas() {
    let ctx = raster(4, 4);
    let bytes = ctx.to_png(Some(144.0)).unwrap();
    assert_eq!(&bytes[..4], &[137, 80, 78, 71]);
}

#[test]
fn test_huge_image_data_requests_fail_cleanly() {
    let mut ctx = raster(10, 10);
    ctx.fill_rect(&rect(0.0, 0.0, 10.0, 10.0));
    for (width, height) in [(i32::MIN, 1), (1, i32::MIN), (50_000, 50_000)] {
        assert!(matches!(
            ctx.get_image_data(0, 0, width, height),
            Err(Canvas2dError::InvalidDimensions { .. })
        ));
    }
    // The context is still usable afterwards
    assert_eq!(pixel(&ctx, 5, 5), [0, 0, 0, 255]);
}

#[test]
fn test_context_hints_are_reported_back() {
    let settings = ContextSettings {
        desynchronized: true,
        color_type: CanvasColorType::Float16,
        will_read_frequently: true,
        ..ContextSettings::default()
    };
    let mut hinted = Canvas2dContextBuilder::new(8, 8)
        .with_shaper(common::BoxShaper)
        .with_settings(settings)
        .build()
        .unwrap();
    assert_eq!(*hinted.settings(), settings);

    let mut plain = raster(8, 8);
    for ctx in [&mut hinted, &mut plain] {
        ctx.set_fill_style("rgba(0, 128, 255, 0.5)");
        ctx.fill_rect(&rect(1.0, 1.0, 5.0, 5.0));
    }
    assert_eq!(
        hinted.get_image_data(0, 0, 8, 8).unwrap(),
        plain.get_image_data(0, 0, 8, 8).unwrap()
    );
}
