use ndarray::parallel::prelude::*;
use ndarray::{s, Array3, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BORDER_COLOR, DEFAULT_BORDER_WIDTH, EXTENT_ROUNDING_SLACK, PARALLEL_PIXEL_THRESHOLD,
};
use crate::frame::RasterFrame;

/// Sentinel border stamped on frame edges before rotation, to tell real
/// content from padding when inspecting outputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderStamp {
    pub width: usize,
    /// RGB, normalized. Mono frames use the brightest component.
    pub color: [f32; 3],
}

impl Default for BorderStamp {
    fn default() -> Self {
        Self {
            width: DEFAULT_BORDER_WIDTH,
            color: DEFAULT_BORDER_COLOR,
        }
    }
}

/// Side of the smallest square holding a `width` x `height` rectangle at any angle.
pub fn diag(width: usize, height: usize) -> usize {
    let (w, h) = (width as f64, height as f64);
    (w * w + h * h).sqrt().ceil() as usize
}

/// Bounding box (width, height) of a `width` x `height` rectangle rotated by `angle_deg`.
pub fn rotated_extent(width: usize, height: usize, angle_deg: f64) -> (usize, usize) {
    let theta = angle_deg.to_radians();
    let (c, s) = (theta.cos().abs(), theta.sin().abs());
    let (w, h) = (width as f64, height as f64);
    let rw = (w * c + h * s - EXTENT_ROUNDING_SLACK).ceil().max(1.0) as usize;
    let rh = (w * s + h * c - EXTENT_ROUNDING_SLACK).ceil().max(1.0) as usize;
    (rw, rh)
}

/// Copy of `frame` with a border of `stamp.color` painted over its outer `stamp.width` pixels.
pub fn stamp_border(frame: &RasterFrame, stamp: &BorderStamp) -> RasterFrame {
    let mut out = frame.clone();
    let (h, w, channels) = out.data.dim();
    let bw = stamp.width.min(h.div_ceil(2)).min(w.div_ceil(2));
    if bw == 0 {
        return out;
    }

    let value = |c: usize| -> f32 {
        match (channels, c) {
            (1 | 2, 0) => stamp.color.iter().copied().fold(0.0, f32::max),
            (_, c) if c < 3 && channels >= 3 => stamp.color[c],
            // Alpha stays opaque.
            _ => 1.0,
        }
    };

    for c in 0..channels {
        let v = value(c);
        let mut plane = out.data.index_axis_mut(Axis(2), c);
        plane.slice_mut(s![..bw, ..]).fill(v);
        plane.slice_mut(s![h - bw.., ..]).fill(v);
        plane.slice_mut(s![.., ..bw]).fill(v);
        plane.slice_mut(s![.., w - bw..]).fill(v);
    }
    out
}

/// Rotate counter-clockwise by `angle_deg` about the frame centre, growing the
/// output so no source corner is cut off. Uncovered pixels are black.
pub fn rotate_expand(frame: &RasterFrame, angle_deg: f64) -> RasterFrame {
    let (h, w, channels) = frame.data.dim();
    let (rw, rh) = rotated_extent(w, h, angle_deg);
    let mut out = Array3::<f32>::zeros((rh, rw, channels));

    let theta = angle_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    let (cx, cy) = ((w as f64 - 1.0) / 2.0, (h as f64 - 1.0) / 2.0);
    let (ocx, ocy) = ((rw as f64 - 1.0) / 2.0, (rh as f64 - 1.0) / 2.0);
    let src = &frame.data;

    // Inverse mapping: output pixel -> source coordinate (y grows downward).
    let fill_row = |y: usize, mut row: ArrayViewMut2<f32>| {
        let dy = y as f64 - ocy;
        for x in 0..rw {
            let dx = x as f64 - ocx;
            let sx = dx * cos - dy * sin + cx;
            let sy = dx * sin + dy * cos + cy;
            for c in 0..channels {
                row[[x, c]] = bilinear_sample(src, sy, sx, c);
            }
        }
    };

    if rh * rw >= PARALLEL_PIXEL_THRESHOLD {
        out.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(y, row)| fill_row(y, row));
    } else {
        for (y, row) in out.axis_iter_mut(Axis(0)).enumerate() {
            fill_row(y, row);
        }
    }

    RasterFrame::new(out, frame.bit_depth)
}

/// Centre `frame` on a black `side` x `side` canvas.
///
/// Offsets use floor division; parts of `frame` falling outside the canvas are clipped.
pub fn place_centered(frame: &RasterFrame, side: usize) -> RasterFrame {
    let (h, w, channels) = frame.data.dim();
    let mut canvas = RasterFrame::black(side, side, channels, frame.bit_depth);

    let yy = (side as isize - h as isize).div_euclid(2);
    let xx = (side as isize - w as isize).div_euclid(2);

    let (src_y, dst_y, len_y) = overlap(yy, h, side);
    let (src_x, dst_x, len_x) = overlap(xx, w, side);
    if len_y == 0 || len_x == 0 {
        return canvas;
    }

    canvas
        .data
        .slice_mut(s![dst_y..dst_y + len_y, dst_x..dst_x + len_x, ..])
        .assign(&frame.data.slice(s![src_y..src_y + len_y, src_x..src_x + len_x, ..]));
    canvas
}

/// De-rotate a frame by `base_angle_deg + cumulative_angle_deg` and centre it
/// on a square canvas large enough for the original frame at any angle.
pub fn derotate(
    frame: &RasterFrame,
    base_angle_deg: f64,
    cumulative_angle_deg: f64,
    border: Option<&BorderStamp>,
) -> RasterFrame {
    let stamped;
    let source = match border {
        Some(stamp) => {
            stamped = stamp_border(frame, stamp);
            &stamped
        }
        None => frame,
    };

    let rotated = rotate_expand(source, base_angle_deg + cumulative_angle_deg);
    let side = diag(frame.width(), frame.height())
        .max(rotated.width())
        .max(rotated.height());
    place_centered(&rotated, side)
}

/// (source start, destination start, length) of the overlap of a span of
/// `len` placed at `offset` within `[0, bound)`.
fn overlap(offset: isize, len: usize, bound: usize) -> (usize, usize, usize) {
    let src = (-offset).max(0) as usize;
    let dst = offset.max(0) as usize;
    if src >= len || dst >= bound {
        return (0, 0, 0);
    }
    (src, dst, (len - src).min(bound - dst))
}

fn bilinear_sample(data: &Array3<f32>, y: f64, x: f64, channel: usize) -> f32 {
    let (h, w, _) = data.dim();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let sample = |r: i64, c: i64| -> f32 {
        if r >= 0 && r < h as i64 && c >= 0 && c < w as i64 {
            data[[r as usize, c as usize, channel]]
        } else {
            0.0
        }
    };

    let v00 = sample(y0, x0);
    let v10 = sample(y0, x1);
    let v01 = sample(y1, x0);
    let v11 = sample(y1, x1);

    v00 * (1.0 - fx) * (1.0 - fy)
        + v10 * fx * (1.0 - fy)
        + v01 * (1.0 - fx) * fy
        + v11 * fx * fy
}
