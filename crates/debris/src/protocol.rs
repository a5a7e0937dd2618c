//! Messages between the host and the debris worker, with their JSON form:
//!
//! ```text
//! host -> worker   {"type":"init"}
//!                  {"type":"spawn","positions":[{"x":..,"y":..,"z":..}, ...]}
//! worker -> host   {"type":"inited"}
//!                  {"type":"update","positions":[{"x":..,"y":..,"z":..}, ...]}
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::DebrisError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Point {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Point> for Vec3 {
    fn from(p: Point) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostMessage {
    Init,
    Spawn { positions: Vec<Point> },
}

impl HostMessage {
    pub fn spawn(positions: &[Vec3]) -> Self {
        Self::Spawn {
            positions: positions.iter().copied().map(Point::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, DebrisError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, DebrisError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerMessage {
    Inited,
    Update { positions: Vec<Point> },
}

impl WorkerMessage {
    pub fn update(positions: &[Vec3]) -> Self {
        Self::Update {
            positions: positions.iter().copied().map(Point::from).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, DebrisError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, DebrisError> {
        Ok(serde_json::from_str(text)?)
    }
}
