//! Per-frame command encoding.
//!
//! [`FrameEncoder`] owns the acquired surface texture and the command encoder
//! for one frame; [`RenderPassBuilder`] describes the single scene pass.

/// Deep-space backdrop behind the starfield.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Colour and depth clears for the scene pass.
#[derive(Debug, Clone)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_clear: Option<f32>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    pub fn new() -> Self {
        Self {
            clear_color: SPACE_BLACK,
            depth_clear: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach a depth buffer cleared to `value`.
    pub fn depth(mut self, value: f32) -> Self {
        self.depth_clear = Some(value);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_view: &'e wgpu::TextureView,
        depth_view: Option<&'e wgpu::TextureView>,
    ) -> wgpu::RenderPass<'e> {
        let depth_stencil_attachment = self.depth_clear.zip(depth_view).map(|(clear, view)| {
            wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }
        });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's encoder plus the surface texture it presents to.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            encoder,
            surface_texture,
            surface_view,
        }
    }

    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &RenderPassBuilder,
        depth_view: Option<&'a wgpu::TextureView>,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.surface_view, depth_view)
    }

    /// Submit the commands and present.
    pub fn finish(self, queue: &wgpu::Queue) {
        queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clear_is_black() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, SPACE_BLACK);
        assert!(builder.depth_clear.is_none());
    }

    #[test]
    fn test_builder_records_depth_and_label() {
        let builder = RenderPassBuilder::new()
            .clear_color(wgpu::Color::RED)
            .depth(0.0)
            .label("scene-pass");
        assert_eq!(builder.clear_color, wgpu::Color::RED);
        assert_eq!(builder.depth_clear, Some(0.0));
        assert_eq!(builder.label, Some("scene-pass"));
    }
}
