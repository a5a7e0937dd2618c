use glam::{IVec3, Vec2, Vec3};

/// A high-level action produced by whatever reads the input devices.
///
/// The simulation consumes actions, never raw keyboard or pointer events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Walk: `forward` along the heading, `strafe` to the right.
    Move { forward: f32, strafe: f32 },
    /// Turn: positive `yaw` turns left, positive `pitch` looks up.
    Rotate { yaw: f32, pitch: f32 },
    /// Pointer drag while orbiting, in pixels.
    OrbitDrag(Vec2),
    /// Wheel steps; positive zooms out.
    Zoom(f32),
    /// Switch between first-person and orbit camera.
    ToggleCamera,
    /// Launch debris from these points.
    SpawnDebris(Vec<Vec3>),
    /// Remove the voxel at a grid coordinate.
    RemoveVoxel(IVec3),
    /// Break the voxel at a grid coordinate into visual fragments.
    SubdivideVoxel(IVec3),
    /// Undo the last edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
    /// Input that is not bound to anything yet.
    Noop,
}

impl Action {
    /// Whether this action only steers the agent or camera for the current
    /// tick, as opposed to changing the world.
    pub fn is_steering(&self) -> bool {
        matches!(
            self,
            Action::Move { .. }
                | Action::Rotate { .. }
                | Action::OrbitDrag(_)
                | Action::Zoom(_)
                | Action::ToggleCamera
        )
    }
}
