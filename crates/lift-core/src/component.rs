//! Mechanical components and their health percentages.

use std::fmt;

/// A cabin component whose health can be degraded and repaired by events.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Component {
    Door,
    Motor,
    Control,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Component::Door    => "door",
            Component::Motor   => "motor",
            Component::Control => "control",
        })
    }
}

/// Health percentage per component, each kept in `[0, 100]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComponentHealth {
    pub door:    f64,
    pub motor:   f64,
    pub control: f64,
}

impl Default for ComponentHealth {
    fn default() -> Self {
        Self { door: 100.0, motor: 100.0, control: 100.0 }
    }
}

impl ComponentHealth {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Door    => self.door,
            Component::Motor   => self.motor,
            Component::Control => self.control,
        }
    }

    /// Add `delta` (may be negative) to `component`, clamping to `[0, 100]`.
    /// Returns the new health.
    pub fn adjust(&mut self, component: Component, delta: f64) -> f64 {
        let slot = match component {
            Component::Door    => &mut self.door,
            Component::Motor   => &mut self.motor,
            Component::Control => &mut self.control,
        };
        *slot = (*slot + delta).clamp(0.0, 100.0);
        *slot
    }

    /// Overwrite `component`'s health (clamped).
    pub fn set(&mut self, component: Component, health: f64) {
        let current = self.get(component);
        self.adjust(component, health - current);
    }

    /// Clamp every entry into range; non-finite values reset to 100.
    pub fn sanitized(mut self) -> Self {
        for v in [&mut self.door, &mut self.motor, &mut self.control] {
            *v = if v.is_finite() { v.clamp(0.0, 100.0) } else { 100.0 };
        }
        self
    }
}
