use anyhow::{Context, Result};
use crossbeam_channel as xchan;
use std::{path::PathBuf, sync::Arc, thread::JoinHandle, time::Instant};
use tracing::{debug, error, info, warn};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowAttributes, WindowId},
};

use crate::config::Configuration;
use crate::controller::{Controller, InputHandler};
use crate::events::{Command, Key, PointerButton};
use crate::render::loader::{
    DecodeRequest, LoaderMsg, LoaderReply, MipLevel, PreparedImage, spawn_loader,
};
use crate::scan::scan_directory;
use crate::view::screen_rect;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    pos: [f32; 2],
}

// full-screen triangle strip in NDC; the fragment shader works in pixels
const QUAD: [Vertex; 4] = [
    Vertex { pos: [-1.0, -1.0] },
    Vertex { pos: [1.0, -1.0] },
    Vertex { pos: [-1.0, 1.0] },
    Vertex { pos: [1.0, 1.0] },
];

/// Matches `Frame` in crossfade.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniform {
    incoming_rect: [f32; 4],
    outgoing_rect: [f32; 4],
    opacity: [f32; 4],
}

/// Pixel scroll distance treated as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

/// Wake-ups sent to the event loop from other threads.
#[derive(Debug, Clone, Copy)]
enum ViewerEvent {
    Decoded,
}

/// Open the window and run the viewer until the user quits.
///
/// # Errors
/// Returns an error if the event loop cannot be created or exits abnormally.
pub fn run_slideshow(cfg: Configuration, directory: PathBuf, images: Vec<PathBuf>) -> Result<()> {
    info!(count = images.len(), dir = %directory.display(), "starting slideshow");
    let event_loop = EventLoop::<ViewerEvent>::with_user_event()
        .build()
        .context("failed to create event loop")?;
    let proxy = event_loop.create_proxy();
    let mut app = App::new(cfg, directory, images, proxy);
    event_loop.run_app(&mut app)?;
    Ok(())
}

struct Tex {
    view: wgpu::TextureView,
    /// `None` for the black placeholder shown when nothing decoded.
    size: Option<(u32, u32)>,
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    pipeline: wgpu::RenderPipeline,
    bind_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    vbuf: wgpu::Buffer,
    frame_buf: wgpu::Buffer,

    // incoming (current) and outgoing (previous) images
    tex_in: Tex,
    tex_out: Tex,
    sampler: wgpu::Sampler,

    /// Largest texture side the device accepts.
    max_dim: u32,
}

impl Gpu {
    #[allow(clippy::too_many_lines)]
    fn new(window: Arc<Window>) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter found")?;
        info!(adapter = ?adapter.get_info().name, "GPU adapter selected");

        let limits = adapter.limits();
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("viewer-device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits,
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::default(),
        }))
        .context("failed to open GPU device")?;
        let max_dim = device.limits().max_texture_dimension_2d;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .context("surface reports no texture formats")?;
        let PhysicalSize { width, height } = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 1,
        };
        surface.configure(&device, &config);

        let tex_in = placeholder(&device, &queue);
        let tex_out = placeholder(&device, &queue);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let frame_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame"),
            contents: bytemuck::bytes_of(&FrameUniform::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("crossfade"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/crossfade.wgsl").into()),
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bind_layout"),
            entries: &[
                texture_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let bind_group = create_bind_group(
            &device,
            &bind_layout,
            &tex_in,
            &tex_out,
            &sampler,
            &frame_buf,
        );

        let vlayout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x2],
        };
        let pip_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipe_layout"),
            bind_group_layouts: &[&bind_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("pipeline"),
            layout: Some(&pip_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vlayout],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_layout,
            bind_group,
            vbuf,
            frame_buf,
            tex_in,
            tex_out,
            sampler,
            max_dim,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Make `incoming` the current image; the previous current becomes the
    /// outgoing one.
    fn rotate_in(&mut self, incoming: Tex) {
        self.tex_out = std::mem::replace(&mut self.tex_in, incoming);
        self.bind_group = create_bind_group(
            &self.device,
            &self.bind_layout,
            &self.tex_in,
            &self.tex_out,
            &self.sampler,
            &self.frame_buf,
        );
    }
}

fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Tex {
    let black = MipLevel {
        size: (1, 1),
        pixels: vec![0, 0, 0, 255],
    };
    let mut tex = upload_texture(device, queue, std::slice::from_ref(&black));
    tex.size = None;
    tex
}

/// Upload a mip chain (largest level first) into a new sampled texture.
fn upload_texture(device: &wgpu::Device, queue: &wgpu::Queue, levels: &[MipLevel]) -> Tex {
    let (w, h) = levels.first().map_or((1, 1), |l| l.size);
    let mip_level_count = u32::try_from(levels.len()).unwrap_or(1).max(1);
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("photo"),
        size: wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
        mip_level_count,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for (mip_level, level) in (0u32..).zip(levels) {
        let (lw, lh) = level.size;
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &tex,
                mip_level,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &level.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * lw),
                rows_per_image: Some(lh),
            },
            wgpu::Extent3d {
                width: lw,
                height: lh,
                depth_or_array_layers: 1,
            },
        );
    }
    Tex {
        view: tex.create_view(&wgpu::TextureViewDescriptor::default()),
        size: Some((w, h)),
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    tex_in: &Tex,
    tex_out: &Tex,
    sampler: &wgpu::Sampler,
    frame_buf: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&tex_in.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&tex_out.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: frame_buf.as_entire_binding(),
            },
        ],
    })
}

/// Physical key to viewer action.
const fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::ArrowRight
        | KeyCode::ArrowDown
        | KeyCode::Space
        | KeyCode::PageDown
        | KeyCode::KeyN => Key::Next,
        KeyCode::ArrowLeft
        | KeyCode::ArrowUp
        | KeyCode::Backspace
        | KeyCode::PageUp
        | KeyCode::KeyP => Key::Previous,
        KeyCode::Home => Key::First,
        KeyCode::End => Key::Last,
        KeyCode::KeyS => Key::ToggleSlideshow,
        KeyCode::Digit0 | KeyCode::Numpad0 | KeyCode::KeyR => Key::ResetView,
        KeyCode::Equal | KeyCode::NumpadAdd => Key::ZoomIn,
        KeyCode::Minus | KeyCode::NumpadSubtract => Key::ZoomOut,
        KeyCode::KeyF | KeyCode::F11 => Key::ToggleFullscreen,
        KeyCode::KeyO => Key::OpenDirectory,
        KeyCode::Escape | KeyCode::KeyQ => Key::Quit,
        _ => return None,
    })
}

const fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

struct App {
    cfg: Configuration,
    controller: Controller,
    proxy: EventLoopProxy<ViewerEvent>,

    // window/gpu
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,

    // decode pipeline
    tx_req: Option<xchan::Sender<LoaderMsg>>,
    rx_res: Option<xchan::Receiver<LoaderReply>>,
    loader: Option<JoinHandle<()>>,
    /// Id of the newest decode request; older replies are stale.
    generation: u64,

    cursor: [f64; 2],
}

impl App {
    fn new(
        cfg: Configuration,
        directory: PathBuf,
        images: Vec<PathBuf>,
        proxy: EventLoopProxy<ViewerEvent>,
    ) -> Self {
        let controller = Controller::new(
            directory,
            images,
            cfg.slideshow_options(),
            cfg.gesture_options(),
            Instant::now(),
        );
        Self {
            cfg,
            controller,
            proxy,
            window: None,
            gpu: None,
            tx_req: None,
            rx_res: None,
            loader: None,
            generation: 0,
            cursor: [0.0, 0.0],
        }
    }

    fn request_redraw(&self) {
        if let Some(win) = &self.window {
            win.request_redraw();
        }
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, cmd: Option<Command>) {
        let Some(cmd) = cmd else { return };
        match cmd {
            Command::Load { index, path } => {
                self.generation += 1;
                info!(index, path = %path.display(), "loading image");
                let max_dim = self.gpu.as_ref().map_or(8192, |g| g.max_dim);
                let sent = self.tx_req.as_ref().is_some_and(|tx| {
                    tx.send(LoaderMsg::Decode(DecodeRequest {
                        generation: self.generation,
                        path,
                        max_dim,
                    }))
                    .is_ok()
                });
                if !sent {
                    warn!("image loader is not running");
                }
            }
            Command::ChooseDirectory => {
                let picked = rfd::FileDialog::new()
                    .set_title("Open Directory")
                    .set_directory(self.controller.directory())
                    .pick_folder();
                if let Some(dir) = picked {
                    match scan_directory(&dir, &self.cfg.scan_options()) {
                        Ok(images) => {
                            let next = self.controller.set_directory(dir, images, Instant::now());
                            self.dispatch(event_loop, next);
                        }
                        Err(err) => warn!(error = %err, dir = %dir.display(), "cannot open directory"),
                    }
                } else {
                    debug!("directory selection cancelled");
                }
            }
            Command::ToggleFullscreen => {
                if let Some(win) = &self.window {
                    let next = if win.fullscreen().is_some() {
                        None
                    } else {
                        Some(Fullscreen::Borderless(win.current_monitor()))
                    };
                    win.set_fullscreen(next);
                }
            }
            Command::Quit => {
                info!("quit requested");
                event_loop.exit();
            }
        }
        if let Some(win) = &self.window {
            win.set_title(&self.controller.title());
        }
        self.request_redraw();
    }

    /// Bind decoded images and run the slideshow timer.
    fn pump(&mut self, event_loop: &ActiveEventLoop) {
        let replies: Vec<LoaderReply> = self
            .rx_res
            .as_ref()
            .map(|rx| rx.try_iter().collect())
            .unwrap_or_default();
        for reply in replies {
            self.bind_reply(reply);
        }

        let now = Instant::now();
        let cmd = self.controller.on_timer(now);
        self.dispatch(event_loop, cmd);

        if self.controller.is_animating(now) {
            self.request_redraw();
        }
        match self.controller.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn bind_reply(&mut self, reply: LoaderReply) {
        let Some(gpu) = &mut self.gpu else { return };
        match reply {
            LoaderReply::Ready(PreparedImage {
                generation,
                path,
                size,
                levels,
            }) => {
                if generation != self.generation {
                    debug!(generation, path = %path.display(), "dropping stale image");
                    return;
                }
                let tex = upload_texture(&gpu.device, &gpu.queue, &levels);
                gpu.rotate_in(tex);
                debug!(
                    path = %path.display(),
                    width = size.0,
                    height = size.1,
                    mips = levels.len(),
                    "image bound"
                );
            }
            LoaderReply::Failed {
                generation,
                path,
                error,
            } => {
                if generation != self.generation {
                    return;
                }
                warn!(path = %path.display(), %error, "showing blank frame for unreadable image");
                let tex = placeholder(&gpu.device, &gpu.queue);
                gpu.rotate_in(tex);
            }
        }
        self.controller.image_ready(Instant::now());
        self.request_redraw();
    }

    fn draw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else { return };
        let now = Instant::now();
        let fade = self.controller.slideshow().opacities(now);
        let viewport = self.controller.viewport();
        let view = self.controller.view();
        let rect_of = |tex: &Tex| {
            tex.size
                .map_or([0.0; 4], |size| screen_rect(view, size, viewport).to_f32())
        };
        // an empty directory shows nothing, whatever is still bound
        let opacity = if self.controller.slideshow().playlist().current().is_some() {
            [fade.incoming, fade.outgoing, 0.0, 0.0]
        } else {
            [0.0; 4]
        };
        let uniform = FrameUniform {
            incoming_rect: rect_of(&gpu.tex_in),
            outgoing_rect: rect_of(&gpu.tex_out),
            opacity,
        };
        gpu.queue
            .write_buffer(&gpu.frame_buf, 0, bytemuck::bytes_of(&uniform));

        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost | wgpu::SurfaceError::Other) => {
                debug!("surface outdated; reconfiguring");
                gpu.surface.configure(&gpu.device, &gpu.config);
                if let Some(win) = &self.window {
                    win.request_redraw();
                }
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory; exiting");
                event_loop.exit();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out acquiring surface texture");
                return;
            }
        };
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&gpu.pipeline);
            rpass.set_bind_group(0, &gpu.bind_group, &[]);
            rpass.set_vertex_buffer(0, gpu.vbuf.slice(..));
            rpass.draw(0..4, 0..1);
        }
        gpu.queue.submit([encoder.finish()]);
        frame.present();
        if let Some(err) = pollster::block_on(gpu.device.pop_error_scope()) {
            error!(error = %err, "GPU validation error while drawing");
        }
    }
}

impl ApplicationHandler<ViewerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let [w, h] = self.cfg.window_size;
        let attrs = WindowAttributes::default()
            .with_title(self.controller.title())
            .with_inner_size(LogicalSize::new(w, h));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!(error = %err, "failed to create window");
                event_loop.exit();
                return;
            }
        };
        if self.cfg.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(window.current_monitor())));
            info!("window fullscreen initialized");
        }

        let gpu = match Gpu::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(err) => {
                error!(error = ?err, "GPU initialization failed");
                event_loop.exit();
                return;
            }
        };
        self.controller
            .set_viewport(gpu.config.width, gpu.config.height);
        self.gpu = Some(gpu);
        self.window = Some(window);

        let (tx_req, rx_req) = xchan::unbounded::<LoaderMsg>();
        let (tx_res, rx_res) = xchan::unbounded::<LoaderReply>();
        let proxy = self.proxy.clone();
        match spawn_loader(rx_req, tx_res, move || {
            let _ = proxy.send_event(ViewerEvent::Decoded);
        }) {
            Ok(handle) => {
                self.loader = Some(handle);
                self.tx_req = Some(tx_req);
                self.rx_res = Some(rx_res);
            }
            Err(err) => {
                error!(error = %err, "failed to start image loader");
                event_loop.exit();
                return;
            }
        }

        let cmd = self.controller.start(Instant::now());
        self.dispatch(event_loop, cmd);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(win) = &self.window else { return };
        if win.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(width, height);
                }
                self.controller.set_viewport(width, height);
                self.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = [position.x, position.y];
                if self.controller.on_pointer_move(self.cursor) {
                    self.request_redraw();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = map_button(button) else { return };
                match state {
                    ElementState::Pressed => self.controller.on_pointer_down(button, self.cursor),
                    ElementState::Released => {
                        let cmd = self
                            .controller
                            .on_pointer_up(button, self.cursor, Instant::now());
                        self.dispatch(event_loop, cmd);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => f64::from(y),
                    MouseScrollDelta::PixelDelta(pos) => pos.y / PIXELS_PER_LINE,
                };
                if self.controller.on_scroll(lines, self.cursor) {
                    self.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(key) = map_key(code) else { return };
                // held keys repeat only for stepping and zooming
                if event.repeat && !matches!(key, Key::Next | Key::Previous | Key::ZoomIn | Key::ZoomOut) {
                    return;
                }
                let cmd = self.controller.on_key(key, Instant::now());
                self.dispatch(event_loop, cmd);
                self.request_redraw();
            }
            WindowEvent::RedrawRequested => self.draw(event_loop),
            _ => {}
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::Decoded => self.pump(event_loop),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.pump(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(tx) = self.tx_req.take() {
            let _ = tx.send(LoaderMsg::Quit);
        }
        if let Some(handle) = self.loader.take()
            && handle.join().is_err()
        {
            warn!("image loader thread panicked");
        }
        debug!("viewer shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_uniform_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 48);
    }

    #[test]
    fn navigation_keys_map_to_actions() {
        assert_eq!(map_key(KeyCode::ArrowRight), Some(Key::Next));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Next));
        assert_eq!(map_key(KeyCode::Backspace), Some(Key::Previous));
        assert_eq!(map_key(KeyCode::Home), Some(Key::First));
        assert_eq!(map_key(KeyCode::End), Some(Key::Last));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Quit));
        assert_eq!(map_key(KeyCode::KeyO), Some(Key::OpenDirectory));
        assert_eq!(map_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn mouse_buttons_map_to_pointer_buttons() {
        assert_eq!(map_button(MouseButton::Left), Some(PointerButton::Primary));
        assert_eq!(map_button(MouseButton::Right), Some(PointerButton::Secondary));
        assert_eq!(map_button(MouseButton::Middle), Some(PointerButton::Middle));
        assert_eq!(map_button(MouseButton::Back), None);
    }
}
