//! Marker-based source patching.
//!
//! Base programs carry comment markers (`//#prelude`, `//#functions`,
//! `//#include <chunk>`). Patches either replace a marker outright or insert
//! text next to it, leaving the marker in place so later patches can stack.

use crate::core::{Error, Result};

/// Module-scope declarations (uniform blocks, bindings).
pub const PRELUDE: &str = "//#prelude";
/// Helper functions, placed before the entry points.
pub const FUNCTIONS: &str = "//#functions";

/// Marker text for a replaceable chunk.
pub fn include_marker(chunk: &str) -> String {
    format!("//#include <{chunk}>")
}

fn missing(marker: &str) -> Error {
    Error::Shader(format!("marker '{marker}' not found"))
}

/// Replace the first occurrence of `marker` with `replacement`.
pub fn replace_marker(source: &str, marker: &str, replacement: &str) -> Result<String> {
    if !source.contains(marker) {
        return Err(missing(marker));
    }
    Ok(source.replacen(marker, replacement, 1))
}

/// Insert `text` on the lines after `marker`, keeping the marker.
pub fn insert_after(source: &str, marker: &str, text: &str) -> Result<String> {
    let replacement = format!("{marker}\n{}", text.trim_end());
    replace_marker(source, marker, &replacement)
}

/// Replace a chunk include with `text`.
pub fn replace_chunk(source: &str, chunk: &str, text: &str) -> Result<String> {
    replace_marker(source, &include_marker(chunk), text.trim_end())
}

/// Whether `source` already defines a function named `name`.
pub fn defines_function(source: &str, name: &str) -> bool {
    let needle = format!("fn {name}(");
    source.contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "//#prelude\nfn main() {\n    //#include <project_vertex>\n}\n";

    #[test]
    fn test_replace_chunk() {
        let out = replace_chunk(SRC, "project_vertex", "    let a = 1;\n").unwrap();
        assert!(out.contains("let a = 1;"));
        assert!(!out.contains("project_vertex"));
    }

    #[test]
    fn test_insert_after_keeps_marker() {
        let once = insert_after(SRC, PRELUDE, "var<private> x: f32;").unwrap();
        let twice = insert_after(&once, PRELUDE, "var<private> y: f32;").unwrap();
        assert!(twice.starts_with(PRELUDE));
        assert!(twice.contains("x: f32"));
        assert!(twice.contains("y: f32"));
    }

    #[test]
    fn test_missing_marker() {
        let err = replace_chunk(SRC, "map_fragment", "").unwrap_err();
        assert!(err.to_string().contains("map_fragment"));
        assert!(insert_after(SRC, FUNCTIONS, "fn f() {}").is_err());
    }

    #[test]
    fn test_defines_function() {
        assert!(defines_function("fn simplex2d(v: vec2<f32>) -> f32 {}", "simplex2d"));
        assert!(!defines_function("let simplex2d_value = 1.0;", "simplex2d"));
    }
}
