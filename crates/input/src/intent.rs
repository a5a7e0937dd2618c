use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Movement request for one tick, each axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: f32,
    pub strafe: f32,
}

impl MoveIntent {
    pub fn new(forward: f32, strafe: f32) -> Self {
        Self { forward, strafe }
    }

    /// `(strafe, forward)` scaled to at most unit length, so diagonal input is
    /// no faster than straight input. Non-finite input yields zero.
    pub fn direction(&self) -> Vec2 {
        let v = Vec2::new(self.strafe, self.forward);
        if !v.is_finite() {
            return Vec2::ZERO;
        }
        if v.length_squared() > 1.0 {
            v.normalize_or_zero()
        } else {
            v
        }
    }

    pub fn is_idle(&self) -> bool {
        self.direction() == Vec2::ZERO
    }
}

/// Rotation request for one tick, each axis in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotateIntent {
    pub yaw: f32,
    pub pitch: f32,
}

/// Camera input accumulated over one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraIntent {
    /// Pointer drag in pixels.
    pub drag: Vec2,
    /// Wheel steps; positive zooms out.
    pub zoom: f32,
    pub toggle_mode: bool,
}

/// Everything that steers the agent and camera for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickIntent {
    pub movement: MoveIntent,
    pub rotation: RotateIntent,
    pub camera: CameraIntent,
}

/// Collects the actions of one frame into a [`TickIntent`] plus the world
/// commands that the caller applies separately.
#[derive(Debug, Default)]
pub struct IntentFrame {
    intent: TickIntent,
    commands: Vec<Action>,
}

impl IntentFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        match action {
            Action::Move { forward, strafe } => {
                self.intent.movement.forward = (self.intent.movement.forward + forward).clamp(-1.0, 1.0);
                self.intent.movement.strafe = (self.intent.movement.strafe + strafe).clamp(-1.0, 1.0);
            }
            Action::Rotate { yaw, pitch } => {
                self.intent.rotation.yaw = (self.intent.rotation.yaw + yaw).clamp(-1.0, 1.0);
                self.intent.rotation.pitch = (self.intent.rotation.pitch + pitch).clamp(-1.0, 1.0);
            }
            Action::OrbitDrag(delta) => self.intent.camera.drag += delta,
            Action::Zoom(steps) => self.intent.camera.zoom += steps,
            Action::ToggleCamera => self.intent.camera.toggle_mode ^= true,
            Action::Noop => tracing::trace!("ignoring unbound input"),
            command => self.commands.push(command),
        }
    }

    pub fn extend(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.push(action);
        }
    }

    /// Steering intent so far, without consuming the frame.
    pub fn intent(&self) -> &TickIntent {
        &self.intent
    }

    /// Close the frame: the tick intent and the world commands in arrival order.
    pub fn finish(self) -> (TickIntent, Vec<Action>) {
        (self.intent, self.commands)
    }
}
