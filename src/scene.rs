//! The rotation lab: the state behind the demo scene.
//!
//! A [`RotationLab`] owns the rotatable object, the table it floats above,
//! and the object's three local-axis markers. The markers are separate
//! transforms so each can be drawn as its own line, but every rotation is
//! applied to the object and all three markers in lock-step, which keeps them
//! visually glued to the object.
//!
//! Rotations arrive in one of two frames (see [`crate::transform`]):
//! world-frame rotations left-multiply onto the current orientation,
//! local-frame rotations right-multiply. The canned [`RotationCommand`] table
//! drives the demo's button panel and exists to make the difference tangible:
//! press "45 about world Y" and "45 about local Y" from a tilted orientation
//! and watch the object take two different paths.

use crate::quat::Quat;
use crate::transform::RigidTransform;
use glam::Vec3;

/// The frame a rotation's axis is expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationFrame {
    /// Axis in world coordinates; applied after the current orientation.
    World,
    /// Axis in the object's own coordinates; applied before the current
    /// orientation.
    Local,
}

/// One rotation in a given frame.
#[derive(Clone, Copy, Debug)]
pub struct RotationStep {
    pub frame: RotationFrame,
    pub rotation: Quat,
}

/// A labeled button action: one or more rotation steps applied in order.
pub struct RotationCommand {
    pub label: &'static str,
    pub steps: Vec<RotationStep>,
}

impl RotationCommand {
    fn single(label: &'static str, frame: RotationFrame, degrees: f32, axis: Vec3) -> Self {
        Self {
            label,
            steps: vec![RotationStep {
                frame,
                rotation: Quat::from_axis_angle(degrees.to_radians(), axis),
            }],
        }
    }
}

/// Length of the world axis lines drawn at the origin.
pub const WORLD_AXIS_LENGTH: f32 = 20.0;
/// Length of the object's local axis lines.
pub const LOCAL_AXIS_LENGTH: f32 = 16.0;

const OBJECT_POSITION: Vec3 = Vec3::new(0.0, 3.0, 0.0);

/// The demo scene state: one rotatable object over a table, plus the
/// object's local-axis markers.
pub struct RotationLab {
    /// The rotatable object (drawn as a cube).
    pub object: RigidTransform,
    /// The static table beneath it (drawn as a plane).
    pub table: RigidTransform,
    /// Local-axis markers, rotated in lock-step with the object. Indexed
    /// X, Y, Z.
    pub local_axes: [RigidTransform; 3],
}

impl Default for RotationLab {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationLab {
    pub fn new() -> Self {
        let marker = || RigidTransform::new(OBJECT_POSITION, 0.0, Vec3::Y, 1.0);

        Self {
            object: RigidTransform::new(OBJECT_POSITION, 0.0, Vec3::Y, 2.0),
            table: RigidTransform::default(),
            local_axes: [marker(), marker(), marker()],
        }
    }

    /// Rotate the object about an axis fixed in the world frame.
    pub fn rotate_wrt_world_frame(&mut self, q: Quat) {
        self.object.rotate_left(q);
        for axis in &mut self.local_axes {
            axis.rotate_left(q);
        }
    }

    /// Rotate the object about one of its own axes.
    pub fn rotate_wrt_local_frame(&mut self, q: Quat) {
        self.object.rotate_right(q);
        for axis in &mut self.local_axes {
            axis.rotate_right(q);
        }
    }

    /// Snap the object and its markers back to the identity orientation.
    pub fn reset_rotation(&mut self) {
        self.object.set_orientation(Quat::IDENTITY);
        for axis in &mut self.local_axes {
            axis.set_orientation(Quat::IDENTITY);
        }
    }

    /// Apply a command's steps in order.
    pub fn apply(&mut self, command: &RotationCommand) {
        for step in &command.steps {
            match step.frame {
                RotationFrame::World => self.rotate_wrt_world_frame(step.rotation),
                RotationFrame::Local => self.rotate_wrt_local_frame(step.rotation),
            }
        }
    }

    /// The canned rotations offered by the demo's button panel.
    pub fn commands() -> Vec<RotationCommand> {
        let x90 = Quat::from_axis_angle(90.0_f32.to_radians(), Vec3::X);
        let z90 = Quat::from_axis_angle(90.0_f32.to_radians(), Vec3::Z);

        vec![
            RotationCommand::single("45 about local Y", RotationFrame::Local, 45.0, Vec3::Y),
            RotationCommand::single("45 about local Z", RotationFrame::Local, 45.0, Vec3::Z),
            RotationCommand::single("45 about world Y", RotationFrame::World, 45.0, Vec3::Y),
            RotationCommand::single("90 about world Z", RotationFrame::World, 90.0, Vec3::Z),
            RotationCommand::single(
                "45 about local (1,1,1)",
                RotationFrame::Local,
                45.0,
                Vec3::ONE,
            ),
            RotationCommand::single("90 about world X", RotationFrame::World, 90.0, Vec3::X),
            RotationCommand::single("90 about local X", RotationFrame::Local, 90.0, Vec3::X),
            // The two mixed-frame commands apply the same pair of rotations
            // in opposite order. A local step and a world step commute (one
            // right-multiplies, the other left-multiplies), so both buttons
            // land on the same orientation.
            RotationCommand {
                label: "Local (X) then world (Z)",
                steps: vec![
                    RotationStep {
                        frame: RotationFrame::Local,
                        rotation: x90,
                    },
                    RotationStep {
                        frame: RotationFrame::World,
                        rotation: z90,
                    },
                ],
            },
            RotationCommand {
                label: "World (Z) then local (X)",
                steps: vec![
                    RotationStep {
                        frame: RotationFrame::World,
                        rotation: z90,
                    },
                    RotationStep {
                        frame: RotationFrame::Local,
                        rotation: x90,
                    },
                ],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn markers_rotate_in_lock_step() {
        let mut lab = RotationLab::new();
        lab.rotate_wrt_world_frame(Quat::from_axis_angle(FRAC_PI_2, Vec3::Y));
        lab.rotate_wrt_local_frame(Quat::from_axis_angle(0.7, Vec3::X));

        for axis in &lab.local_axes {
            assert!(
                axis.orientation()
                    .same_orientation(&lab.object.orientation())
            );
        }
    }

    #[test]
    fn reset_restores_identity() {
        let mut lab = RotationLab::new();
        lab.rotate_wrt_local_frame(Quat::from_axis_angle(1.0, Vec3::ONE));
        lab.reset_rotation();

        assert!(lab.object.orientation().same_orientation(&Quat::IDENTITY));
        for axis in &lab.local_axes {
            assert!(axis.orientation().same_orientation(&Quat::IDENTITY));
        }
    }

    #[test]
    fn world_and_local_frames_diverge() {
        let q = Quat::from_axis_angle(FRAC_PI_2, Vec3::Z);
        let tilt = Quat::from_axis_angle(FRAC_PI_2, Vec3::X);

        let mut world = RotationLab::new();
        world.rotate_wrt_world_frame(tilt);
        world.rotate_wrt_world_frame(q);

        let mut local = RotationLab::new();
        local.rotate_wrt_world_frame(tilt);
        local.rotate_wrt_local_frame(q);

        assert!(
            !world
                .object
                .orientation()
                .same_orientation(&local.object.orientation())
        );
    }

    #[test]
    fn mixed_frame_commands_commute() {
        let commands = RotationLab::commands();
        let local_then_world = commands
            .iter()
            .find(|c| c.label == "Local (X) then world (Z)")
            .unwrap();
        let world_then_local = commands
            .iter()
            .find(|c| c.label == "World (Z) then local (X)")
            .unwrap();

        // Start from a non-trivial orientation so the test is not vacuous.
        let mut a = RotationLab::new();
        a.rotate_wrt_world_frame(Quat::from_axis_angle(0.5, Vec3::Y));
        let mut b = RotationLab::new();
        b.rotate_wrt_world_frame(Quat::from_axis_angle(0.5, Vec3::Y));

        a.apply(local_then_world);
        b.apply(world_then_local);

        assert!(
            a.object
                .orientation()
                .same_orientation(&b.object.orientation())
        );
    }
}
