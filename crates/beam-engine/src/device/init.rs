/// Settings for adapter, device and surface creation.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Whether to pick an sRGB swapchain format. Off means vertex colors
    /// reach the screen as written.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Falls back to the first supported mode when unavailable.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    /// Device creation fails without these.
    pub required_features: wgpu::Features,
    /// Enabled only where the adapter has them; query `Gpu::features()`.
    pub optional_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    /// A hint; backends may ignore it.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Features to request from an adapter offering `available`.
    pub fn features_for(&self, available: wgpu::Features) -> wgpu::Features {
        self.required_features | (self.optional_features & available)
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            optional_features: wgpu::Features::POLYGON_MODE_LINE,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
