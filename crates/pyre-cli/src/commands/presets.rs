//! Built-in run configurations

use crate::config::SimulationConfig;
use anyhow::Result;
use pyre_core::PyreError;

const POINTS: &str = r#"
[system]
render = "points"

[spawner]
kind = "box"
center = [400, 300]
size = [160, 60]

[velocity]
kind = "vector"
min = [20, -40]
max = [40, -20]

[color]
kind = "range"
start_min = [16, 124, 167, 255]
start_max = [30, 150, 255, 255]
end_min = [57, 0, 150, 0]
end_max = [235, 128, 220, 0]

[physics]
collision = { position = 600, side = "above" }
"#;

const TEXTURED: &str = r#"
[system]
render = "textured"
additive = true

[spawner]
kind = "circle"
center = [400, 300]
radius = [70, 40]

[size]
kind = "range"
start = { min = 20, max = 60 }
end = { min = 10, max = 30 }

[rotation]
kind = "range"
start = { min = -20, max = -20 }
end = { min = 90, max = 90 }

[color]
kind = "range"
start_min = [16, 124, 167, 255]
start_max = [30, 150, 255, 255]
end_min = [57, 0, 150, 0]
end_max = [235, 128, 220, 0]

[physics]
collision = { position = 600, side = "above" }
"#;

const METABALL: &str = r#"
[system]
render = "metaball"

[spawner]
kind = "disk"
center = [400, 300]
radius = 150

[size]
kind = "range"
start = { min = 20, max = 60 }
end = { min = 10, max = 30 }

[physics]
collision = { position = 600, side = "above" }
"#;

const SPRITESHEET: &str = r#"
[system]
render = "spritesheet"
texture_size = [32, 8]

[size]
kind = "constant"
size = 8

[rotation]
kind = "direction"

[tex_coords]
kind = "random"
rects = [[0, 0, 8, 8], [8, 0, 8, 8], [16, 0, 8, 8], [24, 0, 8, 8]]
"#;

const ANIMATED: &str = r#"
[system]
render = "spritesheet"
texture_size = [32, 8]

[size]
kind = "constant"
size = 8

[tex_coords]
kind = "fixed"
rect = [0, 0, 8, 8]

[animation]
frames = [[0, 0, 8, 8], [8, 0, 8, 8], [16, 0, 8, 8], [24, 0, 8, 8]]
frame_time = 0.8
looped = true
"#;

/// (name, description, TOML source)
pub const PRESETS: &[(&str, &str, &str)] = &[
    ("points", "box of colored points falling onto a floor", POINTS),
    ("textured", "additive textured quads from an elliptical ring", TEXTURED),
    ("metaball", "disk of blobs merged by a threshold pass", METABALL),
    ("spritesheet", "random sprite regions facing their heading", SPRITESHEET),
    ("animated", "looping four-frame sprite animation", ANIMATED),
];

/// Parse a built-in configuration by name
pub fn load(name: &str) -> pyre_core::Result<SimulationConfig> {
    let (_, _, source) = PRESETS
        .iter()
        .find(|(preset, _, _)| *preset == name)
        .ok_or_else(|| PyreError::UnknownPreset {
            value: name.to_string(),
            allowed: PRESETS.iter().map(|(p, _, _)| p.to_string()).collect(),
        })?;
    SimulationConfig::from_toml_str(source)
}

pub fn run() -> Result<()> {
    println!("Built-in presets:");
    for (name, description, _) in PRESETS {
        println!("  {:<12} {}", name, description);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_parses_and_validates() {
        for (name, _, _) in PRESETS {
            let config = load(name).unwrap();
            config.validate().unwrap_or_else(|e| panic!("{name}: {e}"));
        }
    }

    #[test]
    fn unknown_preset_lists_alternatives() {
        match load("sparkles") {
            Err(PyreError::UnknownPreset { value, allowed }) => {
                assert_eq!(value, "sparkles");
                assert_eq!(allowed.len(), PRESETS.len());
            }
            other => panic!("expected UnknownPreset, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn metaball_preset_has_no_color_stage() {
        let config = load("metaball").unwrap();
        assert!(config.color.is_none());
        assert!(config.render_mode().composite().is_some());
    }
}
