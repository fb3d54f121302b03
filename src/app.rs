//! The windowed application shell.
//!
//! [`run`] opens a window, initializes the GPU and scene, and drives the
//! frame loop through winit's [`ApplicationHandler`]. Each frame runs the
//! same fixed phases:
//!
//! 1. **Input** — window events have been folded into [`Input`] as they
//!    arrived; key bindings and camera movement are resolved here.
//! 2. **Scene mutation** — the button panel is rebuilt and any clicked
//!    command is applied to the [`RotationLab`].
//! 3. **Render** — a 3D pass (meshes, then axis lines) followed by a 2D pass
//!    for the panel.
//!
//! # Key bindings
//!
//! | Key | Action |
//! |-----|--------|
//! | `Esc` | Quit |
//! | `C` | Toggle free camera |
//! | `R` | Reset camera |
//! | `W`/`A`/`S`/`D`, `Space`, `Shift`, mouse | Move/look while free |
//! | Scroll | Zoom (field of view) |

use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::camera::FlyCamera;
use crate::draw2d::{Color, Draw2d};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::line::{Line, LineDraw, LinePass};
use crate::mesh::Mesh;
use crate::mesh_pass::{DrawCall, MeshPass};
use crate::scene::{LOCAL_AXIS_LENGTH, RotationCommand, RotationLab, WORLD_AXIS_LENGTH};
use crate::ui::UiPanel;
use glam::{Mat4, Vec3};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.07,
    a: 1.0,
};

const TABLE_COLOR: Color = Color::rgb(0.45, 0.45, 0.48);
const OBJECT_COLOR: Color = Color::rgb(0.9, 0.55, 0.15);

const PANEL_WIDTH: f32 = 230.0;
const UI_FONT_SIZE: f32 = 15.0;

/// Window configuration for [`run`].
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Strophe".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Open the window and run the rotation lab until the user quits.
pub fn run(config: AppConfig) {
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending { config };
    event_loop.run_app(&mut app).unwrap();
}

enum App {
    Pending {
        config: AppConfig,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        input: Input,
        camera: FlyCamera,
        lab: RotationLab,
        commands: Vec<RotationCommand>,
        mesh_pass: MeshPass,
        line_pass: LinePass,
        draw2d: Draw2d,
        cube: Mesh,
        table: Mesh,
        world_axes: [Line; 3],
        local_axes: [Line; 3],
        last_frame: Instant,
    },
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let App::Pending { config } = self {
            let window_attrs = WindowAttributes::default()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            let gpu = GpuContext::new(window.clone());

            let mesh_pass = MeshPass::new(&gpu);
            let line_pass = LinePass::new(&gpu);
            let draw2d = Draw2d::new(&gpu, UI_FONT_SIZE);

            let cube = Mesh::cube(&gpu);
            let table = Mesh::plane(&gpu, WORLD_AXIS_LENGTH);

            let world_axes = [
                Line::new(
                    &gpu,
                    Vec3::ZERO,
                    Vec3::X * WORLD_AXIS_LENGTH,
                    [1.0, 0.0, 0.0, 1.0],
                ),
                Line::new(
                    &gpu,
                    Vec3::ZERO,
                    Vec3::Y * WORLD_AXIS_LENGTH,
                    [0.0, 1.0, 0.0, 1.0],
                ),
                Line::new(
                    &gpu,
                    Vec3::ZERO,
                    Vec3::Z * WORLD_AXIS_LENGTH,
                    [0.0, 0.0, 1.0, 1.0],
                ),
            ];
            let local_axes = [
                Line::new(
                    &gpu,
                    Vec3::ZERO,
                    Vec3::X * LOCAL_AXIS_LENGTH,
                    [1.0, 1.0, 0.0, 1.0],
                ),
                Line::new(
                    &gpu,
                    Vec3::ZERO,
                    Vec3::Y * LOCAL_AXIS_LENGTH,
                    [0.0, 1.0, 1.0, 1.0],
                ),
                Line::new(
                    &gpu,
                    Vec3::ZERO,
                    Vec3::Z * LOCAL_AXIS_LENGTH,
                    [1.0, 0.0, 1.0, 1.0],
                ),
            ];

            window.request_redraw();

            *self = App::Running {
                window,
                gpu,
                input: Input::new(),
                camera: FlyCamera::new(),
                lab: RotationLab::new(),
                commands: RotationLab::commands(),
                mesh_pass,
                line_pass,
                draw2d,
                cube,
                table,
                world_axes,
                local_axes,
                last_frame: Instant::now(),
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running {
            window,
            gpu,
            input,
            camera,
            lab,
            commands,
            mesh_pass,
            line_pass,
            draw2d,
            cube,
            table,
            world_axes,
            local_axes,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                // Input phase
                if input.key_pressed(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                if input.key_pressed(KeyCode::KeyC) {
                    camera.free = !camera.free;
                }
                if input.key_pressed(KeyCode::KeyR) {
                    camera.reset();
                }
                camera.update(input, dt);

                // Scene mutation phase: rebuild the panel and apply clicks.
                draw2d.clear();
                let mut panel = UiPanel::new(
                    draw2d,
                    10.0,
                    10.0,
                    PANEL_WIDTH,
                    UiPanel::height_for(commands.len() + 1),
                    "Rotation Lab",
                );
                if panel.button(draw2d, input, "Reset rotation") {
                    lab.reset_rotation();
                }
                for command in commands.iter() {
                    if panel.button(draw2d, input, command.label) {
                        lab.apply(command);
                    }
                }

                // Render phase
                let output = match gpu.surface.get_current_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.reconfigure();
                        input.end_frame();
                        window.request_redraw();
                        return;
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        input.end_frame();
                        window.request_redraw();
                        return;
                    }
                    Err(e) => {
                        log::error!("failed to acquire surface frame: {e}");
                        event_loop.exit();
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let mut encoder =
                    gpu.device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Frame Encoder"),
                        });

                {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: &gpu.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                    mesh_pass.render(
                        gpu,
                        &mut pass,
                        camera,
                        &[
                            DrawCall {
                                mesh: table,
                                model: lab.table.model_matrix(),
                                color: TABLE_COLOR,
                            },
                            DrawCall {
                                mesh: cube,
                                model: lab.object.model_matrix(),
                                color: OBJECT_COLOR,
                            },
                        ],
                    );

                    let view_proj = camera.view_projection(gpu.aspect());
                    let mut lines = Vec::with_capacity(6);
                    for line in world_axes.iter() {
                        lines.push(LineDraw {
                            line,
                            model: Mat4::IDENTITY,
                        });
                    }
                    for (line, marker) in local_axes.iter().zip(lab.local_axes.iter()) {
                        lines.push(LineDraw {
                            line,
                            model: marker.model_matrix(),
                        });
                    }
                    line_pass.render(gpu, &mut pass, view_proj, &lines);
                }

                {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("UI Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });

                    draw2d.render(gpu, &mut pass);
                }

                gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                input.end_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}
