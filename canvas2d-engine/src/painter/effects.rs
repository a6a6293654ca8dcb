//! Pixel effects on premultiplied layers: Gaussian blur, color matrices,
//! drop shadows and the plus-darker composite.

use crate::bitmap::{premultiply_pixel, unpremultiply_pixel};
use crate::filter::{ColorFilterKind, Filter, FilterOperation};
use tiny_skia::{Color, Mask, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

/// A 4x5 row-major color matrix over straight-alpha RGBA in [0, 1]; the
/// fifth column is the offset.
type ColorMatrix = [f32; 20];

/// Run every primitive of `filter` over `layer`, in order.
pub(crate) fn apply_filter(layer: &mut Pixmap, filter: &Filter) {
    for operation in filter.operations() {
        match *operation {
            FilterOperation::Blur { radius } => gaussian_blur(layer, radius),
            FilterOperation::Color { kind, amount } => {
                apply_color_matrix(layer, &color_matrix(kind, amount))
            }
            FilterOperation::HueRotate { degrees } => {
                apply_color_matrix(layer, &hue_rotate_matrix(degrees))
            }
            FilterOperation::DropShadow {
                offset_x,
                offset_y,
                radius,
                color,
            } => drop_shadow(layer, offset_x, offset_y, radius, color),
        }
    }
}

/// Composite `layer` onto `target` with the plus-darker operator.
///
/// Per premultiplied channel: `ra = min(1, sa + da)` and
/// `rc = max(0, ra - ((sa - sc) + (da - dc)))`, which is
/// `max(0, 1 - ((1 - D) + (1 - S)))` for opaque pixels. Clip coverage
/// interpolates between the old pixel and the composited one.
pub(crate) fn plus_darker(target: &mut Pixmap, layer: &Pixmap, clip: Option<&Mask>) {
    let coverage = clip.map(Mask::data);
    for (i, (dst, src)) in target
        .pixels_mut()
        .iter_mut()
        .zip(layer.pixels())
        .enumerate()
    {
        if src.alpha() == 0 {
            continue;
        }
        let cover = coverage.map_or(255, |data| data.get(i).copied().unwrap_or(0)) as i32;
        if cover == 0 {
            continue;
        }
        let (sa, da) = (src.alpha() as i32, dst.alpha() as i32);
        let ra = (sa + da).min(255);
        let channel = |s: u8, d: u8| (ra - ((sa - s as i32) + (da - d as i32))).clamp(0, ra);
        let old = [dst.red(), dst.green(), dst.blue(), dst.alpha()];
        let mut out = [
            channel(src.red(), dst.red()),
            channel(src.green(), dst.green()),
            channel(src.blue(), dst.blue()),
            ra,
        ];
        if cover < 255 {
            for (value, old) in out.iter_mut().zip(old) {
                *value = (old as i32 * (255 - cover) + *value * cover + 127) / 255;
            }
        }
        if let Some(color) = PremultipliedColorU8::from_rgba(
            out[0] as u8,
            out[1] as u8,
            out[2] as u8,
            out[3] as u8,
        ) {
            *dst = color;
        }
    }
}

/// Box sizes whose three successive passes approximate a Gaussian of
/// standard deviation `sigma`.
fn box_sizes_for_gauss(sigma: f32) -> [usize; 3] {
    const PASSES: f32 = 3.0;
    let ideal = (12.0 * sigma * sigma / PASSES + 1.0).sqrt();
    let mut lower = ideal.floor() as i32;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let lf = lower as f32;
    let m_ideal =
        (12.0 * sigma * sigma - PASSES * lf * lf - 4.0 * PASSES * lf - 3.0 * PASSES) / (-4.0 * lf - 4.0);
    let m = m_ideal.round() as i32;
    let mut sizes = [0usize; 3];
    for (i, size) in sizes.iter_mut().enumerate() {
        *size = if (i as i32) < m { lower } else { upper } as usize;
    }
    sizes
}

/// Approximate Gaussian blur: three horizontal and vertical box passes.
/// Pixels outside the layer count as transparent.
pub(crate) fn gaussian_blur(layer: &mut Pixmap, sigma: f32) {
    if !(sigma > 0.0) {
        return;
    }
    let width = layer.width() as usize;
    let height = layer.height() as usize;
    let mut scratch = vec![0u8; layer.data().len()];
    for size in box_sizes_for_gauss(sigma) {
        let radius = (size - 1) / 2;
        if radius == 0 {
            continue;
        }
        let data = layer.data_mut();
        box_blur_pass(data, &mut scratch, width, height, radius, Axis::Horizontal);
        box_blur_pass(&scratch, data, width, height, radius, Axis::Vertical);
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    Horizontal,
    Vertical,
}

fn box_blur_pass(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    radius: usize,
    axis: Axis,
) {
    let (lines, len) = match axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };
    let index = |line: usize, i: usize| match axis {
        Axis::Horizontal => (line * width + i) * 4,
        Axis::Vertical => (i * width + line) * 4,
    };
    let divisor = (2 * radius + 1) as u32;

    for line in 0..lines {
        let mut sum = [0u32; 4];
        // Window [i - radius, i + radius] starting at i = 0
        for i in 0..radius.min(len) {
            let at = index(line, i);
            for c in 0..4 {
                sum[c] += src[at + c] as u32;
            }
        }
        for i in 0..len {
            let entering = i + radius;
            if entering < len {
                let at = index(line, entering);
                for c in 0..4 {
                    sum[c] += src[at + c] as u32;
                }
            }
            let out = index(line, i);
            for c in 0..4 {
                dst[out + c] = ((sum[c] + divisor / 2) / divisor) as u8;
            }
            if i >= radius {
                let at = index(line, i - radius);
                for c in 0..4 {
                    sum[c] -= src[at + c] as u32;
                }
            }
        }
    }
}

fn color_matrix(kind: ColorFilterKind, amount: f32) -> ColorMatrix {
    match kind {
        ColorFilterKind::Brightness => {
            let a = amount.max(0.0);
            linear_transfer(a, 0.0)
        }
        ColorFilterKind::Contrast => {
            let a = amount.max(0.0);
            linear_transfer(a, 0.5 - 0.5 * a)
        }
        ColorFilterKind::Invert => {
            let a = amount.clamp(0.0, 1.0);
            linear_transfer(1.0 - 2.0 * a, a)
        }
        ColorFilterKind::Opacity => {
            let a = amount.clamp(0.0, 1.0);
            [
                1.0, 0.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, a, 0.0,
            ]
        }
        ColorFilterKind::Grayscale => {
            let a = 1.0 - amount.clamp(0.0, 1.0);
            rgb_matrix([
                0.2126 + 0.7874 * a,
                0.7152 - 0.7152 * a,
                0.0722 - 0.0722 * a,
                0.2126 - 0.2126 * a,
                0.7152 + 0.2848 * a,
                0.0722 - 0.0722 * a,
                0.2126 - 0.2126 * a,
                0.7152 - 0.7152 * a,
                0.0722 + 0.9278 * a,
            ])
        }
        ColorFilterKind::Sepia => {
            let a = 1.0 - amount.clamp(0.0, 1.0);
            rgb_matrix([
                0.393 + 0.607 * a,
                0.769 - 0.769 * a,
                0.189 - 0.189 * a,
                0.349 - 0.349 * a,
                0.686 + 0.314 * a,
                0.168 - 0.168 * a,
                0.272 - 0.272 * a,
                0.534 - 0.534 * a,
                0.131 + 0.869 * a,
            ])
        }
        ColorFilterKind::Saturate => {
            let s = amount.max(0.0);
            rgb_matrix([
                0.213 + 0.787 * s,
                0.715 - 0.715 * s,
                0.072 - 0.072 * s,
                0.213 - 0.213 * s,
                0.715 + 0.285 * s,
                0.072 - 0.072 * s,
                0.213 - 0.213 * s,
                0.715 - 0.715 * s,
                0.072 + 0.928 * s,
            ])
        }
    }
}

fn hue_rotate_matrix(degrees: f32) -> ColorMatrix {
    let (sin, cos) = degrees.to_radians().sin_cos();
    rgb_matrix([
        0.213 + cos * 0.787 - sin * 0.213,
        0.715 - cos * 0.715 - sin * 0.715,
        0.072 - cos * 0.072 + sin * 0.928,
        0.213 - cos * 0.213 + sin * 0.143,
        0.715 + cos * 0.285 + sin * 0.140,
        0.072 - cos * 0.072 - sin * 0.283,
        0.213 - cos * 0.213 - sin * 0.787,
        0.715 - cos * 0.715 + sin * 0.715,
        0.072 + cos * 0.928 + sin * 0.072,
    ])
}

/// `v' = slope * v + intercept` on each color channel.
fn linear_transfer(slope: f32, intercept: f32) -> ColorMatrix {
    [
        slope, 0.0, 0.0, 0.0, intercept, //
        0.0, slope, 0.0, 0.0, intercept, //
        0.0, 0.0, slope, 0.0, intercept, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn rgb_matrix(m: [f32; 9]) -> ColorMatrix {
    [
        m[0], m[1], m[2], 0.0, 0.0, //
        m[3], m[4], m[5], 0.0, 0.0, //
        m[6], m[7], m[8], 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn apply_color_matrix(layer: &mut Pixmap, m: &ColorMatrix) {
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    for pixel in layer.pixels_mut() {
        let [r, g, b, a] = unpremultiply_pixel(*pixel).map(|c| c as f32 / 255.0);
        let row = |i: usize| m[i] * r + m[i + 1] * g + m[i + 2] * b + m[i + 3] * a + m[i + 4];
        *pixel = premultiply_pixel(to_byte(row(0)), to_byte(row(5)), to_byte(row(10)), to_byte(row(15)));
    }
}

/// Put a blurred, offset, `color`-tinted copy of the layer's alpha behind it.
fn drop_shadow(layer: &mut Pixmap, offset_x: f32, offset_y: f32, radius: f32, color: Color) {
    let Some(mut tinted) = Pixmap::new(layer.width(), layer.height()) else {
        return;
    };
    let shadow = color.premultiply();
    for (dst, src) in tinted.pixels_mut().iter_mut().zip(layer.pixels()) {
        let coverage = src.alpha() as f32 / 255.0;
        let channel = |v: f32| (v * coverage * 255.0).round() as u8;
        *dst = tiny_skia::PremultipliedColorU8::from_rgba(
            channel(shadow.red()),
            channel(shadow.green()),
            channel(shadow.blue()),
            channel(shadow.alpha()),
        )
        .unwrap_or(tiny_skia::PremultipliedColorU8::TRANSPARENT);
    }

    let Some(mut composed) = Pixmap::new(layer.width(), layer.height()) else {
        return;
    };
    composed.draw_pixmap(
        0,
        0,
        tinted.as_ref(),
        &PixmapPaint::default(),
        Transform::from_translate(offset_x, offset_y),
        None,
    );
    gaussian_blur(&mut composed, radius);
    composed.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    *layer = composed;
}
