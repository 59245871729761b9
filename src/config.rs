use roomkit_core::{ConfigError, LayerMask, Rgba};
use roomkit_interaction::{DragConfig, PlacementConfig, RigConfig, TargetingConfig};
use roomkit_input::Bindings;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/interaction.toml";

/// Everything tunable about the interaction rig, as read from TOML.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub targeting: TargetingSection,
    pub placement: PlacementSection,
    pub drag: DragSection,
    pub timing: TimingSection,
    /// Action name to binding tokens, e.g. `Interact = ["KeyE"]`.
    pub bindings: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetingSection {
    pub range: f32,
    pub highlight_intensity: f32,
    pub layers: Vec<String>,
}

impl Default for TargetingSection {
    fn default() -> Self {
        Self {
            range: 5.0,
            highlight_intensity: 1.5,
            layers: vec!["Interaction".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacementSection {
    /// Prefab keys for selection slots 1..=9.
    pub prefabs: Vec<String>,
    /// Display names, parallel to `prefabs`.
    pub names: Vec<String>,
    pub surface_layers: Vec<String>,
    pub offset: f32,
    /// RGBA in 0..=1; alpha may be omitted.
    pub tint: Vec<f32>,
    pub default_distance: f32,
    pub max_ray_distance: f32,
}

impl Default for PlacementSection {
    fn default() -> Self {
        Self {
            prefabs: Vec::new(),
            names: Vec::new(),
            surface_layers: vec!["Placement".into()],
            offset: 0.05,
            tint: vec![1.0, 0.5, 0.5, 0.75],
            default_distance: 1.0,
            max_ray_distance: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DragSection {
    /// Degrees per second.
    pub rotation_speed: f32,
    pub move_smooth_time: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub distance_step: f32,
    pub distance_rate: f32,
    pub grab_range: f32,
    pub pickup_prompt: String,
    pub drop_prompt: String,
}

impl Default for DragSection {
    fn default() -> Self {
        let drag = DragConfig::default();
        Self {
            rotation_speed: drag.rotation_speed,
            move_smooth_time: drag.move_smooth_time,
            min_distance: drag.min_distance,
            max_distance: drag.max_distance,
            distance_step: drag.distance_step,
            distance_rate: drag.distance_rate,
            grab_range: drag.grab_range,
            pickup_prompt: drag.pickup_prompt,
            drop_prompt: drag.drop_prompt,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingSection {
    /// Physics steps per second.
    pub physics_hz: f32,
    pub max_steps_per_frame: u32,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            physics_hz: 50.0,
            max_steps_per_frame: 8,
        }
    }
}

impl InteractionConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<InteractionConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    InteractionConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!(
                        "Interaction config not found at {}. Using defaults",
                        path.display()
                    );
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                InteractionConfig::default()
            }
        }
    }

    pub fn targeting(&self) -> TargetingConfig {
        let defaults = TargetingConfig::default();
        TargetingConfig {
            range: positive_or("targeting.range", self.targeting.range, defaults.range),
            highlight_intensity: positive_or(
                "targeting.highlight_intensity",
                self.targeting.highlight_intensity,
                defaults.highlight_intensity,
            ),
            mask: mask_or(&self.targeting.layers, defaults.mask),
        }
    }

    pub fn placement(&self) -> PlacementConfig {
        let defaults = PlacementConfig::default();
        let section = &self.placement;
        let placement_tint = Rgba::from_slice(&section.tint).unwrap_or_else(|err| {
            warn!("{err}; using the default placement tint");
            defaults.placement_tint
        });
        PlacementConfig {
            prefabs: section.prefabs.clone(),
            names: section.names.clone(),
            surface_mask: mask_or(&section.surface_layers, defaults.surface_mask),
            placement_offset: section.offset,
            placement_tint,
            default_distance: positive_or(
                "placement.default_distance",
                section.default_distance,
                defaults.default_distance,
            ),
            max_ray_distance: positive_or(
                "placement.max_ray_distance",
                section.max_ray_distance,
                defaults.max_ray_distance,
            ),
        }
    }

    pub fn drag(&self) -> DragConfig {
        let defaults = DragConfig::default();
        let section = &self.drag;
        let (min_distance, max_distance) = match check_range(
            "drag distance",
            section.min_distance,
            section.max_distance,
        ) {
            Ok(range) => range,
            Err(err) => {
                warn!("{err}; using the default hold range");
                (defaults.min_distance, defaults.max_distance)
            }
        };
        DragConfig {
            rotation_speed: section.rotation_speed,
            move_smooth_time: positive_or(
                "drag.move_smooth_time",
                section.move_smooth_time,
                defaults.move_smooth_time,
            ),
            min_distance,
            max_distance,
            distance_step: section.distance_step.abs(),
            distance_rate: section.distance_rate.abs(),
            grab_range: positive_or("drag.grab_range", section.grab_range, defaults.grab_range),
            pickup_prompt: section.pickup_prompt.clone(),
            drop_prompt: section.drop_prompt.clone(),
            ..defaults
        }
    }

    pub fn rig(&self) -> RigConfig {
        let defaults = RigConfig::default();
        let hz = positive_or("timing.physics_hz", self.timing.physics_hz, 1.0 / defaults.fixed_dt);
        RigConfig {
            fixed_dt: 1.0 / hz,
            max_steps: self.timing.max_steps_per_frame.max(1),
        }
    }

    pub fn bindings(&self) -> Bindings {
        Bindings::with_overrides(&self.bindings)
    }
}

fn positive_or(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(setting = name, value, fallback, "setting must be positive; using default");
        fallback
    }
}

fn mask_or(names: &[String], fallback: LayerMask) -> LayerMask {
    match LayerMask::from_names(names) {
        Ok(mask) if !mask.is_empty() => mask,
        Ok(_) => {
            warn!("empty layer list; using {fallback:?}");
            fallback
        }
        Err(err) => {
            warn!("{err}; using {fallback:?}");
            fallback
        }
    }
}

fn check_range(name: &'static str, min: f32, max: f32) -> Result<(f32, f32), ConfigError> {
    if min.is_finite() && max.is_finite() && 0.0 <= min && min <= max {
        Ok((min, max))
    } else {
        Err(ConfigError::InvalidRange { name, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(tag: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "roomkit-config-{tag}-{}.toml",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_uses_defaults() {
        let cfg = InteractionConfig::load_from_path(Path::new("does/not/exist.toml"));
        assert_eq!(cfg.targeting(), TargetingConfig::default());
        assert_eq!(cfg.drag(), DragConfig::default());
        assert_eq!(cfg.rig(), RigConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let path = temp_file(
            "overrides",
            r#"
[targeting]
range = 3.0
layers = ["Interaction", "Default"]

[placement]
prefabs = ["chair", "lamp"]
names = ["Chair", "Lamp"]
tint = [0.0, 1.0, 0.0]

[drag]
max_distance = 4.0

[timing]
physics_hz = 100.0

[bindings]
Interact = ["KeyE"]
"#,
        );
        let cfg = InteractionConfig::load_from_path(&path);

        let targeting = cfg.targeting();
        assert_eq!(targeting.range, 3.0);
        assert_eq!(targeting.mask, LayerMask::INTERACTION | LayerMask::DEFAULT);

        let placement = cfg.placement();
        assert_eq!(placement.prefabs, vec!["chair", "lamp"]);
        assert_eq!(placement.placement_tint, Rgba::rgb(0.0, 1.0, 0.0));

        assert_eq!(cfg.drag().max_distance, 4.0);
        assert!((cfg.rig().fixed_dt - 0.01).abs() < 1e-6);
        assert_eq!(cfg.bindings.get("Interact"), Some(&vec!["KeyE".to_string()]));
    }

    #[test]
    fn invalid_values_fall_back() {
        let path = temp_file(
            "invalid",
            r#"
[targeting]
range = -1.0
layers = ["Water"]

[placement]
tint = [2.0, 0.0, 0.0]

[drag]
min_distance = 5.0
max_distance = 1.0
"#,
        );
        let cfg = InteractionConfig::load_from_path(&path);
        assert_eq!(cfg.targeting(), TargetingConfig::default());
        assert_eq!(
            cfg.placement().placement_tint,
            PlacementConfig::default().placement_tint
        );
        let drag = cfg.drag();
        assert_eq!((drag.min_distance, drag.max_distance), (0.5, 10.0));
    }

    #[test]
    fn malformed_toml_uses_defaults() {
        let path = temp_file("malformed", "[targeting\nrange = ");
        let cfg = InteractionConfig::load_from_path(&path);
        assert_eq!(cfg.targeting.range, 5.0);
    }
}
