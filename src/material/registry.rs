//! Per-group registry of time uniforms.

use crate::wind::TimeUniform;

/// Time uniforms a group must advance each frame, keyed by program label.
///
/// Filled when a shaded material is created; `update` writes the same value
/// to every entry.
#[derive(Debug, Default)]
pub struct ShaderRegistry {
    entries: Vec<(String, TimeUniform)>,
}

impl ShaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `time`. A handle already registered is ignored.
    pub fn register(&mut self, label: impl Into<String>, time: &TimeUniform) {
        if self.entries.iter().any(|(_, t)| t.same_as(time)) {
            return;
        }
        self.entries.push((label.into(), time.clone()));
    }

    pub fn update(&self, elapsed: f32) {
        for (_, time) in &self.entries {
            time.set(elapsed);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }
}
