use winit::dpi::PhysicalSize;

/// Device-pixel-ratio cap. The dispersion shader glitches above a ratio of
/// two, so everything renders at most at twice logical resolution.
pub const DPR_CAP: f64 = 2.0;

pub(crate) const TARGET_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
pub(crate) const TARGET_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Window size and scale factor, with the capped pixel size derived from
/// them. All render targets and the resolution uniform stay in lockstep with
/// [`SurfaceMetrics::pixel_size`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    pub physical: PhysicalSize<u32>,
    pub scale_factor: f64,
}

impl SurfaceMetrics {
    pub fn new(physical: PhysicalSize<u32>, scale_factor: f64) -> Self {
        Self {
            physical,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    /// Logical size times the capped scale factor.
    pub fn pixel_size(&self) -> (u32, u32) {
        let capped = self.scale_factor.min(DPR_CAP) / self.scale_factor;
        let width = (f64::from(self.physical.width) * capped).round() as u32;
        let height = (f64::from(self.physical.height) * capped).round() as u32;
        (width.max(1), height.max(1))
    }

    pub fn resolution(&self) -> [f32; 2] {
        let (width, height) = self.pixel_size();
        [width as f32, height as f32]
    }
}

/// One offscreen color+depth attachment pair.
pub(crate) struct RenderTarget {
    pub color_view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    _color: wgpu::Texture,
    _depth: wgpu::Texture,
}

impl RenderTarget {
    fn new(device: &wgpu::Device, label: &str, width: u32, height: u32) -> Self {
        let extent = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("target depth"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            color_view,
            depth_view,
            _color: color,
            _depth: depth,
        }
    }
}

/// The back/front buffer pair the two-pass sequence renders into.
pub(crate) struct TargetPair {
    pub back: RenderTarget,
    pub front: RenderTarget,
    size: (u32, u32),
}

impl TargetPair {
    pub fn new(device: &wgpu::Device, metrics: SurfaceMetrics) -> Self {
        let (width, height) = metrics.pixel_size();
        Self {
            back: RenderTarget::new(device, "back target", width, height),
            front: RenderTarget::new(device, "front target", width, height),
            size: (width, height),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Reallocates both buffers; must be called on every resize so
    /// screen-space sampling lines up with the new viewport.
    pub fn resize(&mut self, device: &wgpu::Device, metrics: SurfaceMetrics) {
        let (width, height) = metrics.pixel_size();
        if (width, height) == self.size {
            return;
        }
        tracing::debug!(width, height, "reallocating render target pair");
        self.back = RenderTarget::new(device, "back target", width, height);
        self.front = RenderTarget::new(device, "front target", width, height);
        self.size = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_size_scales_by_capped_ratio() {
        // Physical size already includes the full scale factor; above the cap
        // the target shrinks back to logical size times the cap.
        let metrics = SurfaceMetrics::new(PhysicalSize::new(3000, 2000), 2.5);
        assert_eq!(metrics.pixel_size(), (2400, 1600));
    }

    #[test]
    fn pixel_size_untouched_at_or_below_cap() {
        let at_cap = SurfaceMetrics::new(PhysicalSize::new(2560, 1440), 2.0);
        assert_eq!(at_cap.pixel_size(), (2560, 1440));
        let below = SurfaceMetrics::new(PhysicalSize::new(1920, 1080), 1.0);
        assert_eq!(below.pixel_size(), (1920, 1080));
    }

    #[test]
    fn resolution_uniform_matches_pixel_size() {
        let metrics = SurfaceMetrics::new(PhysicalSize::new(1500, 900), 3.0);
        let (w, h) = metrics.pixel_size();
        assert_eq!(metrics.resolution(), [w as f32, h as f32]);
        assert_eq!((w, h), (1000, 600));
    }

    #[test]
    fn degenerate_scale_factor_falls_back_to_one() {
        let metrics = SurfaceMetrics::new(PhysicalSize::new(800, 600), 0.0);
        assert_eq!(metrics.pixel_size(), (800, 600));
    }
}
