use crate::shader;
use crate::RenderError;

use super::scene_draw::SceneDraw;
use super::{PassInitCtx, PassRenderCtx, RenderPass};

/// Draws the scene's visible objects into a named target.
pub struct ForwardPass {
    name: String,
    output: String,
    clear_color: wgpu::Color,
    draw: Option<SceneDraw>,
}

impl ForwardPass {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            name: "forward".to_string(),
            output: output.into(),
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            draw: None,
        }
    }

    pub fn with_clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }
}

impl RenderPass for ForwardPass {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, ctx: &mut PassInitCtx<'_>) -> Result<(), RenderError> {
        let mut draw = SceneDraw::new(ctx.gpu());
        // Objects default to the catalog's forward program; surface catalog
        // problems now rather than mid-frame.
        draw.precompile(ctx, shader::FORWARD)?;
        self.draw = Some(draw);
        Ok(())
    }

    fn render(&mut self, ctx: &mut PassRenderCtx<'_>) -> Result<(), RenderError> {
        let draw = self.draw.as_mut().ok_or_else(|| RenderError::NotInitialized {
            what: "forward pass".to_string(),
        })?;
        let target = ctx.target(&self.output)?;
        draw.draw(ctx, target, None, self.clear_color)
    }
}
