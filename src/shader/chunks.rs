//! Default bodies for `//#include <chunk>` markers.

use crate::core::{Error, Result};

const PROJECT_VERTEX: &str = include_str!("../../shaders/chunks/project_vertex.wgsl");
const WORLDPOS_VERTEX: &str = include_str!("../../shaders/chunks/worldpos_vertex.wgsl");
const MAP_FRAGMENT: &str = include_str!("../../shaders/chunks/map_fragment.wgsl");
const NORMAL_FRAGMENT_MAPS: &str = include_str!("../../shaders/chunks/normal_fragment_maps.wgsl");

/// Default body for a named chunk.
pub fn default_chunk(name: &str) -> Option<&'static str> {
    match name {
        "project_vertex" => Some(PROJECT_VERTEX),
        "worldpos_vertex" => Some(WORLDPOS_VERTEX),
        "map_fragment" => Some(MAP_FRAGMENT),
        "normal_fragment_maps" => Some(NORMAL_FRAGMENT_MAPS),
        _ => None,
    }
}

/// Parse `//#include <name>` from a line, if it is one.
fn include_name(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("//#include <")?
        .strip_suffix('>')
}

/// Expand every remaining include marker to its default chunk.
pub fn expand_includes(source: &str) -> Result<String> {
    let mut out = String::with_capacity(source.len() + 512);
    for line in source.lines() {
        match include_name(line) {
            Some(name) => {
                let body = default_chunk(name)
                    .ok_or_else(|| Error::Shader(format!("unknown chunk '{name}'")))?;
                out.push_str(body.trim_end());
            }
            None => out.push_str(line),
        }
        out.push('\n');
    }
    Ok(out)
}
