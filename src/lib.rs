//! # Strophe
//!
//! **An interactive quaternion playground.**
//!
//! Strophe is two things: a small, hand-written quaternion library
//! ([`Quat`], [`RigidTransform`]) and a windowed demo that makes rotation
//! composition visible. A cube floats over a table with the world axes and
//! its own local axes drawn as colored lines; a button panel applies canned
//! rotations in either the **world frame** or the object's **local frame**,
//! and a fly camera lets you inspect the result from any angle.
//!
//! The point of the exercise is operand order. Quaternion multiplication is
//! non-commutative, and this crate commits to one convention everywhere:
//! `a * b` applies `b` first, then `a`. From that single rule everything else
//! follows — left-multiplying onto an orientation rotates in the world frame,
//! right-multiplying rotates in the object's own frame, and the two visibly
//! diverge as soon as the object is tilted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use strophe::{AppConfig, run};
//!
//! fn main() {
//!     pretty_env_logger::init();
//!     run(AppConfig::new().title("Strophe"));
//! }
//! ```
//!
//! The math core has no GPU dependencies and is usable on its own:
//!
//! ```
//! use strophe::{Quat, RigidTransform, Vec3};
//!
//! let mut t = RigidTransform::default();
//! t.rotate_left(Quat::from_axis_angle(std::f32::consts::FRAC_PI_2, Vec3::Y));
//! let m = t.model_matrix();
//! ```

mod app;
mod camera;
mod draw2d;
mod gpu;
mod input;
mod line;
mod mesh;
mod mesh_pass;
pub mod quat;
mod scene;
mod transform;
mod ui;

pub use app::{AppConfig, run};
pub use camera::FlyCamera;
pub use draw2d::{Color, Draw2d, FontAtlas, FontError, Vertex2d};
pub use gpu::{DEPTH_FORMAT, GpuContext};
pub use input::Input;
pub use line::{Line, LineDraw, LinePass};
pub use mesh::{Mesh, Vertex3d};
pub use mesh_pass::{DrawCall, MeshPass};
pub use quat::{QUAT_EPSILON, Quat};
pub use scene::{RotationCommand, RotationFrame, RotationLab, RotationStep};
pub use transform::RigidTransform;
pub use ui::UiPanel;

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
