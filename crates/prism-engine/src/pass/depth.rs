use crate::shader;
use crate::RenderError;

use super::scene_draw::SceneDraw;
use super::{PassInitCtx, PassRenderCtx, RenderPass};

const SHIFT: [f64; 4] = [16_777_216.0, 65_536.0, 256.0, 1.0];
const MASK: [f64; 4] = [0.0, 1.0 / 256.0, 1.0 / 256.0, 1.0 / 256.0];

/// Largest encodable depth, one LSB under 1.0. Depth 1.0 would wrap every
/// `fract` term to zero, so it is clamped here.
const MAX_DEPTH: f64 = 1.0 - 1.0 / 16_777_216.0;

/// Packs a `[0, 1]` depth value into four color channels.
///
/// Mirror of the `depth_encode` fragment shader, kept in f64 so tests can
/// check the packing math without a device.
pub fn encode_depth(depth: f64) -> [f64; 4] {
    let d = depth.min(MAX_DEPTH);
    let raw = [
        (d * SHIFT[0]).fract(),
        (d * SHIFT[1]).fract(),
        (d * SHIFT[2]).fract(),
        (d * SHIFT[3]).fract(),
    ];
    // Subtract the 1/256-shifted copy (raw.xxyz) so each channel keeps only
    // its own 8 bits of the fixed-point expansion.
    let shifted = [raw[0], raw[0], raw[1], raw[2]];
    [
        raw[0] - shifted[0] * MASK[0],
        raw[1] - shifted[1] * MASK[1],
        raw[2] - shifted[2] * MASK[2],
        raw[3] - shifted[3] * MASK[3],
    ]
}

/// Recovers a depth value packed by [`encode_depth`].
pub fn decode_depth(rgba: [f64; 4]) -> f64 {
    rgba[0] / SHIFT[0] + rgba[1] / SHIFT[1] + rgba[2] / SHIFT[2] + rgba[3] / SHIFT[3]
}

/// Draws the scene with every object forced through the `depth_encode`
/// program, leaving post-projection depth packed into the color channels.
pub struct DepthEncodePass {
    name: String,
    output: String,
    draw: Option<SceneDraw>,
}

impl DepthEncodePass {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            name: "depth_encode".to_string(),
            output: output.into(),
            draw: None,
        }
    }
}

impl RenderPass for DepthEncodePass {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, ctx: &mut PassInitCtx<'_>) -> Result<(), RenderError> {
        let mut draw = SceneDraw::new(ctx.gpu());
        draw.precompile(ctx, shader::DEPTH_ENCODE)?;
        self.draw = Some(draw);
        Ok(())
    }

    fn render(&mut self, ctx: &mut PassRenderCtx<'_>) -> Result<(), RenderError> {
        let draw = self.draw.as_mut().ok_or_else(|| RenderError::NotInitialized {
            what: "depth encode pass".to_string(),
        })?;
        let target = ctx.target(&self.output)?;

        // Uncovered pixels decode to the far plane.
        let far = encode_depth(1.0);
        let clear_color = wgpu::Color {
            r: far[0],
            g: far[1],
            b: far[2],
            a: far[3],
        };

        draw.draw(ctx, target, Some(shader::DEPTH_ENCODE), clear_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_LSB: f64 = 1.0 / 16_777_216.0;

    #[test]
    fn depth_round_trips_within_one_lsb() {
        for depth in [0.0f64, 0.001, 0.5, 0.999_999, 1.0] {
            let expected = depth.min(MAX_DEPTH);
            let decoded = decode_depth(encode_depth(depth));
            assert!(
                (decoded - expected).abs() <= ONE_LSB,
                "depth {depth}: decoded {decoded}, expected {expected}"
            );
        }
    }

    #[test]
    fn channels_stay_in_color_range() {
        for depth in [0.0, 0.25, 0.5, 0.75, 0.999_999, 1.0] {
            for channel in encode_depth(depth) {
                assert!((0.0..=1.0).contains(&channel), "depth {depth}: {channel}");
            }
        }
    }

    #[test]
    fn far_plane_is_clamped_not_wrapped() {
        // Without the clamp every fract term of 1.0 collapses to zero and
        // the far plane would decode as the near plane.
        let decoded = decode_depth(encode_depth(1.0));
        assert!((decoded - MAX_DEPTH).abs() <= ONE_LSB);
        assert!(decoded > 0.99);
    }

    #[test]
    fn encoding_is_monotonic() {
        let mut previous = -1.0;
        for i in 0..=100 {
            let decoded = decode_depth(encode_depth(f64::from(i) / 100.0));
            assert!(decoded > previous);
            previous = decoded;
        }
    }
}
