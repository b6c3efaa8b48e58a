//! wgpu implementation of [`RenderBackend`].
//!
//! Commands are recorded between `clear` and `present`; the finished frame is
//! taken with [`GpuBackend::take_frame`] and encoded into one render pass by
//! [`GpuBackend::encode`]. Per-draw MVP matrices live in a single uniform
//! buffer addressed with dynamic offsets.

use std::collections::HashMap;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::paint::Rgb;

use super::backend::{DrawCall, RenderBackend};
use super::ctx::{RenderCtx, RenderTarget};
use super::drawable::{FillMode, Primitive};
use super::program::{FRAGMENT_ENTRY, ProgramHandle, ProgramSource, VERTEX_ENTRY};

const INITIAL_UNIFORM_SLOTS: usize = 64;

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MvpUniform {
    mvp: [[f32; 4]; 4],
}

impl MvpUniform {
    fn new(m: Mat4) -> Self {
        Self {
            mvp: m.to_cols_array_2d(),
        }
    }
}

fn mvp_binding_size() -> NonZeroU64 {
    NonZeroU64::new(std::mem::size_of::<MvpUniform>() as u64).unwrap_or(NonZeroU64::MIN)
}

fn align_up(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    program: ProgramHandle,
    primitive: Primitive,
    fill_mode: FillMode,
}

impl PipelineKey {
    /// Fill mode only matters for polygon topologies; others share one pipeline.
    fn new(program: ProgramHandle, primitive: Primitive, fill_mode: FillMode) -> Self {
        let fill_mode = if primitive.is_polygon() {
            fill_mode
        } else {
            FillMode::Fill
        };
        Self {
            program,
            primitive,
            fill_mode,
        }
    }
}

/// Pipeline for a draw, or `None` when no usable program is bound.
///
/// Wireframe degrades to fill when the device cannot rasterize lines.
fn draw_key(
    program: ProgramHandle,
    primitive: Primitive,
    fill_mode: FillMode,
    wireframe_supported: bool,
) -> Option<PipelineKey> {
    if !program.is_valid() {
        return None;
    }
    let fill_mode = match fill_mode {
        FillMode::Wireframe if !wireframe_supported => FillMode::Fill,
        other => other,
    };
    Some(PipelineKey::new(program, primitive, fill_mode))
}

struct CompiledProgram {
    label: String,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
}

struct PendingDraw {
    key: PipelineKey,
    vertex_count: u32,
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    mvp: Mat4,
}

/// Commands of one frame, ready to be encoded.
pub struct FrameRecording {
    clear: Rgb,
    draws: Vec<PendingDraw>,
}

impl FrameRecording {
    fn new(clear: Rgb) -> Self {
        Self {
            clear,
            draws: Vec::new(),
        }
    }
}

pub struct GpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    wireframe_supported: bool,

    programs: Vec<CompiledProgram>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    pipeline_format: Option<wgpu::TextureFormat>,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniform_stride: u64,
    uniform_slots: usize,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    program: ProgramHandle,
    mvp: Mat4,
    recording: Option<FrameRecording>,
    ready: Option<FrameRecording>,

    warned_invalid_program: bool,
    warned_wireframe: bool,
}

impl GpuBackend {
    pub fn new(rctx: &RenderCtx<'_>) -> Self {
        let device = rctx.device.clone();
        let queue = rctx.queue.clone();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("beam mvp bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(mvp_binding_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("beam sprite pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = align_up(std::mem::size_of::<MvpUniform>() as u64, alignment);

        let (uniform_buffer, bind_group) =
            create_uniforms(&device, &bind_group_layout, uniform_stride, INITIAL_UNIFORM_SLOTS);

        let wireframe_supported = device.features().contains(wgpu::Features::POLYGON_MODE_LINE);
        if !wireframe_supported {
            log::info!("POLYGON_MODE_LINE unavailable; wireframe drawables render filled");
        }

        Self {
            device,
            queue,
            wireframe_supported,
            programs: Vec::new(),
            pipelines: HashMap::new(),
            pipeline_format: None,
            bind_group_layout,
            pipeline_layout,
            uniform_stride,
            uniform_slots: INITIAL_UNIFORM_SLOTS,
            uniform_buffer,
            bind_group,
            program: ProgramHandle::INVALID,
            mvp: Mat4::IDENTITY,
            recording: None,
            ready: None,
            warned_invalid_program: false,
            warned_wireframe: false,
        }
    }

    /// Takes the most recently presented frame, if any.
    ///
    /// Returns `None` when nothing was presented since the last call; the
    /// caller should then skip submission so the previous image stays visible.
    pub fn take_frame(&mut self) -> Option<FrameRecording> {
        self.ready.take()
    }

    /// Encodes `frame` as one render pass into `target`.
    pub fn encode(&mut self, rctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: FrameRecording) {
        if self.pipeline_format != Some(rctx.surface_format) {
            self.pipelines.clear();
            self.pipeline_format = Some(rctx.surface_format);
        }

        for draw in &frame.draws {
            self.ensure_pipeline(draw.key, rctx.surface_format, rctx.depth_format());
        }
        self.write_uniforms(&frame.draws);

        let mut rpass = target.clearing_pass("beam sprite pass", frame.clear.to_wgpu());

        for (i, draw) in frame.draws.iter().enumerate() {
            let Some(pipeline) = self.pipelines.get(&draw.key) else {
                continue;
            };

            let offset = (i as u64 * self.uniform_stride) as u32;
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[offset]);
            rpass.set_vertex_buffer(0, draw.positions.slice(..));
            rpass.set_vertex_buffer(1, draw.colors.slice(..));
            rpass.draw(0..draw.vertex_count, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, key: PipelineKey, format: wgpu::TextureFormat, depth: wgpu::TextureFormat) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let index = (key.program.0 as usize).checked_sub(1);
        let Some(program) = index.and_then(|i| self.programs.get(i)) else {
            return;
        };

        let label = format!("{} {:?} {:?}", program.label, key.primitive, key.fill_mode);
        log::debug!("creating pipeline: {label} ({format:?})");

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.vertex,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &POSITION_ATTRS,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &COLOR_ATTRS,
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: key.primitive.to_wgpu(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: key.fill_mode.to_wgpu(),
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipelines.insert(key, pipeline);
    }

    fn write_uniforms(&mut self, draws: &[PendingDraw]) {
        if draws.is_empty() {
            return;
        }

        if draws.len() > self.uniform_slots {
            let slots = draws.len().next_power_of_two();
            log::debug!("growing mvp uniform buffer: {} -> {slots} slots", self.uniform_slots);
            let (buffer, bind_group) =
                create_uniforms(&self.device, &self.bind_group_layout, self.uniform_stride, slots);
            self.uniform_buffer = buffer;
            self.bind_group = bind_group;
            self.uniform_slots = slots;
        }

        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; stride * draws.len()];
        for (i, draw) in draws.iter().enumerate() {
            let u = MvpUniform::new(draw.mvp);
            let src = bytemuck::bytes_of(&u);
            bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
        }
        self.queue.write_buffer(&self.uniform_buffer, 0, &bytes);
    }
}

fn create_uniforms(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    slots: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("beam mvp uniforms"),
        size: stride * slots as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("beam mvp bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: Some(mvp_binding_size()),
            }),
        }],
    });

    (buffer, bind_group)
}

impl RenderBackend for GpuBackend {
    type Buffer = wgpu::Buffer;

    fn compile_program(&mut self, source: &ProgramSource) -> ProgramHandle {
        let diagnostics = source.diagnostics();
        if !diagnostics.is_empty() {
            for d in &diagnostics {
                log::error!("shader program '{}': {d}", source.label);
            }
            return ProgramHandle::INVALID;
        }

        let vertex = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex", source.label)),
            source: wgpu::ShaderSource::Wgsl(source.vertex.as_str().into()),
        });
        let fragment = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} fragment", source.label)),
            source: wgpu::ShaderSource::Wgsl(source.fragment.as_str().into()),
        });

        self.programs.push(CompiledProgram {
            label: source.label.clone(),
            vertex,
            fragment,
        });

        let handle = ProgramHandle(self.programs.len() as u32);
        log::info!("compiled shader program '{}' as {handle}", source.label);
        handle
    }

    fn upload_vertices(&mut self, label: &str, data: &[[f32; 3]]) -> wgpu::Buffer {
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        })
    }

    fn clear(&mut self, color: Rgb) {
        if self.recording.is_some() {
            log::trace!("discarding unpresented frame");
        }
        self.recording = Some(FrameRecording::new(color));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.program = program;
    }

    fn set_mvp(&mut self, mvp: Mat4) {
        self.mvp = mvp;
    }

    fn draw(&mut self, call: DrawCall<'_, wgpu::Buffer>) {
        let Some(key) = draw_key(self.program, call.primitive, call.fill_mode, self.wireframe_supported) else {
            if !self.warned_invalid_program {
                log::warn!("draw issued without a valid program; skipping");
                self.warned_invalid_program = true;
            }
            return;
        };

        if key.fill_mode != call.fill_mode && call.primitive.is_polygon() && !self.warned_wireframe {
            log::warn!("wireframe requested but POLYGON_MODE_LINE is not enabled; drawing filled");
            self.warned_wireframe = true;
        }
        let mvp = self.mvp;

        let Some(recording) = self.recording.as_mut() else {
            log::trace!("draw outside a frame; skipping");
            return;
        };

        recording.draws.push(PendingDraw {
            key,
            vertex_count: call.vertex_count,
            positions: call.positions.clone(),
            colors: call.colors.clone(),
            mvp,
        });
    }

    fn present(&mut self) {
        if let Some(frame) = self.recording.take() {
            self.ready = Some(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stride_respects_alignment() {
        assert_eq!(align_up(64, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(64, 0), 64);
    }

    #[test]
    fn line_topologies_ignore_fill_mode() {
        let p = ProgramHandle(1);
        assert_eq!(
            PipelineKey::new(p, Primitive::Lines, FillMode::Wireframe),
            PipelineKey::new(p, Primitive::Lines, FillMode::Fill),
        );
        assert_ne!(
            PipelineKey::new(p, Primitive::Triangles, FillMode::Wireframe),
            PipelineKey::new(p, Primitive::Triangles, FillMode::Fill),
        );
    }

    // ── draw decisions ────────────────────────────────────────────────────

    #[test]
    fn invalid_program_draws_nothing() {
        for fill in [FillMode::Fill, FillMode::Wireframe] {
            assert_eq!(draw_key(ProgramHandle::INVALID, Primitive::Triangles, fill, true), None);
        }
    }

    #[test]
    fn wireframe_falls_back_to_fill_without_line_mode() {
        let p = ProgramHandle(1);
        let key = draw_key(p, Primitive::Triangles, FillMode::Wireframe, false);
        assert_eq!(key.map(|k| k.fill_mode), Some(FillMode::Fill));
    }

    #[test]
    fn wireframe_kept_when_supported() {
        let p = ProgramHandle(1);
        let key = draw_key(p, Primitive::Triangles, FillMode::Wireframe, true);
        assert_eq!(key, Some(PipelineKey::new(p, Primitive::Triangles, FillMode::Wireframe)));
    }

    #[test]
    fn mvp_uniform_is_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(-3.98, 0.0, 0.0));
        let u = MvpUniform::new(m);
        assert_eq!(u.mvp[3], [-3.98, 0.0, 0.0, 1.0]);
        assert_eq!(mvp_binding_size().get(), 64);
    }
}
