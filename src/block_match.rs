//! # Block matching disparity computation
//!
//! This module provides a sum of absolute differences (SAD) block matcher, the classic local
//! stereo correspondence algorithm. For every pixel of the left image a square window is compared
//! against windows on the same row of the right image shifted by `0..num_disparities` pixels, and
//! the shift with the lowest SAD wins. The winner is refined to sub-pixel precision by fitting
//! lines through its neighbouring costs.
//!
//! Window sums are taken from an integral image of the absolute difference image for each
//! disparity, so the cost of a render does not grow with the block size.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::integral_image::integral_image;
use log::debug;

use crate::disparity::{DisparityAlgorithm, DisparityMap, MatchParams, StereoPair};
use crate::error::*;
use crate::feasibility;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Sum of absolute differences block matcher.
#[derive(Debug, Default)]
pub struct BlockMatcher {
    /// Reused per-pixel search state, resized on demand.
    state: Vec<PixelState>
}

/// Running minimum of the cost curve for one pixel.
#[derive(Debug, Clone, Copy)]
struct PixelState {
    best_cost: u32,
    best_disp: u32,
    cost_before: Option<u32>,
    cost_after: Option<u32>,
    prev_cost: Option<u32>
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl BlockMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute difference between the left image and the right image shifted by `d`.
    fn diff_image(pair: &StereoPair, d: u32) -> GrayImage {
        let left = pair.left();
        let right = pair.right();

        GrayImage::from_fn(left.width(), left.height(), |x, y| {
            if x < d {
                return Luma([u8::MAX]);
            }
            let l = left.get_pixel(x, y)[0];
            let r = right.get_pixel(x - d, y)[0];
            Luma([if l > r { l - r } else { r - l }])
        })
    }
}

impl PixelState {
    const EMPTY: PixelState = PixelState {
        best_cost: u32::MAX,
        best_disp: 0,
        cost_before: None,
        cost_after: None,
        prev_cost: None
    };

    /// Feed the cost for the next disparity in ascending order.
    fn push(&mut self, d: u32, cost: u32) {
        if self.cost_after.is_none() && self.best_cost != u32::MAX && d == self.best_disp + 1 {
            self.cost_after = Some(cost);
        }

        if cost < self.best_cost {
            self.best_cost = cost;
            self.best_disp = d;
            self.cost_before = self.prev_cost;
            self.cost_after = None;
        }

        self.prev_cost = Some(cost);
    }

    /// Refined disparity of the minimum.
    fn disparity(&self) -> f32 {
        let (c_left, c_right) = match (self.cost_before, self.cost_after) {
            (Some(l), Some(r)) => (l as f32, r as f32),
            // On the outer edge of the criterion
            _ => return self.best_disp as f32
        };
        let c_min = self.best_cost as f32;

        let denom = match c_left > c_right {
            true => 2.0 * (c_left - c_min),
            false => 2.0 * (c_right - c_min)
        };

        if denom <= 0.0 {
            return self.best_disp as f32;
        }

        self.best_disp as f32 + ((c_left - c_right) / denom)
    }
}

/// Sum of the source pixels in the inclusive window `[x0, x1] x [y0, y1]`.
fn window_sum(integral: &Image<Luma<u64>>, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
    let a = integral.get_pixel(x1 + 1, y1 + 1)[0];
    let b = integral.get_pixel(x0, y1 + 1)[0];
    let c = integral.get_pixel(x1 + 1, y0)[0];
    let d = integral.get_pixel(x0, y0)[0];
    (a - b) - (c - d)
}

impl DisparityAlgorithm for BlockMatcher {
    /// Compute the disparity map for the given pair.
    fn compute(&mut self, pair: &StereoPair, params: &MatchParams) -> Result<DisparityMap> {
        if params.num_disparities == 0 {
            return Err(Error::InvalidConfig(
                "block matching needs at least one disparity".into()
            ));
        }

        let dims = pair.dimensions();
        feasibility::ensure_feasible(dims, params.block_size)?;
        let block_size = feasibility::effective_kernel_size(params.block_size);

        let mut disp_map = DisparityMap::new(dims.width, dims.height);

        let half = block_size / 2;

        // Pixels whose window would leave the right image for the largest disparity are left
        // invalid, as are pixels whose window leaves the left image.
        let x_start = half + params.num_disparities - 1;
        let x_end = dims.width - half;
        let y_start = half;
        let y_end = dims.height - half;

        if x_start >= x_end {
            debug!(
                "No pixel can search {} disparities in a {} wide image",
                params.num_disparities, dims.width
            );
            return Ok(disp_map);
        }

        let row_len = (x_end - x_start) as usize;
        let num_pixels = row_len * (y_end - y_start) as usize;
        self.state.clear();
        self.state.resize(num_pixels, PixelState::EMPTY);

        // ---- STEREO CORRELATION ----

        for d in 0..params.num_disparities {
            let diff = Self::diff_image(pair, d);
            let integral = integral_image::<_, u64>(&diff);

            for y in y_start..y_end {
                let row = (y - y_start) as usize * row_len;
                for x in x_start..x_end {
                    let cost = window_sum(&integral, x - half, y - half, x + half, y + half);
                    self.state[row + (x - x_start) as usize].push(d, cost as u32);
                }
            }
        }

        // ---- SUB PIXEL INTERPOLATION ----

        for y in y_start..y_end {
            let row = (y - y_start) as usize * row_len;
            for x in x_start..x_end {
                disp_map.put(x, y, self.state[row + (x - x_start) as usize].disparity());
            }
        }

        Ok(disp_map)
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
