use anyhow::{anyhow, Result};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::PerspectiveCamera;
use crate::scene::Scene;
use crate::view::Display;

use super::common::{FrameParams, ProjectedFrame};

/// Software renderer drawing flat shaded triangles into a 2D canvas.
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Creates a renderer that draws into the provided HTML canvas element.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let context = canvas
            .get_context("2d")
            .map_err(|err| anyhow!("failed to query canvas context: {err:?}"))?
            .ok_or_else(|| anyhow!("canvas does not support 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("failed to cast canvas context"))?;
        Ok(Self { canvas, context })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn paint(&self, frame: &ProjectedFrame, background: String) {
        let (width, height) = self.viewport_size();
        self.context.set_fill_style(&background.into());
        self.context.fill_rect(0.0, 0.0, width as f64, height as f64);

        self.context.set_line_width(1.0);
        for line in &frame.lines {
            self.context.set_stroke_style(&line.color.css().into());
            self.context.begin_path();
            self.context.move_to(line.from.x as f64, line.from.y as f64);
            self.context.line_to(line.to.x as f64, line.to.y as f64);
            self.context.stroke();
        }

        for triangle in &frame.triangles {
            let css = triangle.color.css();
            self.context.set_fill_style(&css.as_str().into());
            // Stroking with the fill color hides seams between neighbours.
            self.context.set_stroke_style(&css.into());
            let [a, b, c] = triangle.points;
            self.context.begin_path();
            self.context.move_to(a.x as f64, a.y as f64);
            self.context.line_to(b.x as f64, b.y as f64);
            self.context.line_to(c.x as f64, c.y as f64);
            self.context.close_path();
            self.context.fill();
            self.context.stroke();
        }
    }
}

impl Display for CanvasRenderer {
    fn viewport_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let params = FrameParams::new(scene, camera);
        let frame = ProjectedFrame::new(scene, &params, self.viewport_size());
        self.paint(&frame, scene.background().css());
        Ok(())
    }
}
