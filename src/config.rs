use std::path::Path;

use serde::Deserialize;

use crate::{
    camera::Camera,
    scene::{Light, Scene, SceneError, Sphere},
    util::math::Vector3,
};

pub type Vec3Data = [f64; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    recursion_depth: u32,
}

impl RenderConfig {
    pub const MAX_RECURSION_DEPTH: u32 = 5;

    /// Builds a config from any requested depth, clamped into
    /// `0..=MAX_RECURSION_DEPTH`.
    pub fn new(recursion_depth: i64) -> Self {
        let clamped = recursion_depth.clamp(0, Self::MAX_RECURSION_DEPTH as i64) as u32;
        if clamped as i64 != recursion_depth {
            tracing::warn!(requested = recursion_depth, clamped, "recursion depth clamped");
        }
        Self {
            recursion_depth: clamped,
        }
    }

    pub fn recursion_depth(&self) -> u32 {
        self.recursion_depth
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { recursion_depth: 3 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Scene file not found: {0}")]
    NotFound(String),

    #[error("Failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scene file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid scene: {0}")]
    Validation(#[from] SceneError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneData {
    #[serde(default)]
    pub camera: CameraData,
    #[serde(default = "default_background")]
    pub background_color: Vec3Data,
    #[serde(default)]
    pub spheres: Vec<SphereData>,
    #[serde(default)]
    pub lights: Vec<LightData>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraData {
    #[serde(default)]
    pub position: Vec3Data,
    #[serde(default = "one")]
    pub viewport_size: f64,
    #[serde(default = "one")]
    pub projection_plane_z: f64,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            viewport_size: 1.0,
            projection_plane_z: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereData {
    pub center: Vec3Data,
    pub radius: f64,
    pub color: Vec3Data,
    #[serde(default = "no_specular")]
    pub specular: f64,
    #[serde(default)]
    pub reflective: f64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LightData {
    Ambient { intensity: f64 },
    Point { intensity: f64, position: Vec3Data },
    Directional { intensity: f64, direction: Vec3Data },
}

fn default_background() -> Vec3Data {
    Scene::DEFAULT_BACKGROUND.to_array()
}

fn one() -> f64 {
    1.0
}

fn no_specular() -> f64 {
    Sphere::NO_SPECULAR
}

impl From<CameraData> for Camera {
    fn from(data: CameraData) -> Self {
        Camera {
            position: Vector3::from_array(data.position),
            viewport_size: data.viewport_size,
            projection_plane_z: data.projection_plane_z,
        }
    }
}

impl From<SphereData> for Sphere {
    fn from(data: SphereData) -> Self {
        Sphere {
            center: Vector3::from_array(data.center),
            radius: data.radius,
            color: Vector3::from_array(data.color),
            specular: data.specular,
            reflective: data.reflective,
        }
    }
}

impl From<LightData> for Light {
    fn from(data: LightData) -> Self {
        match data {
            LightData::Ambient { intensity } => Light::Ambient { intensity },
            LightData::Point {
                intensity,
                position,
            } => Light::Point {
                intensity,
                position: Vector3::from_array(position),
            },
            LightData::Directional {
                intensity,
                direction,
            } => Light::Directional {
                intensity,
                direction: Vector3::from_array(direction),
            },
        }
    }
}

impl TryFrom<SceneData> for Scene {
    type Error = SceneError;

    fn try_from(data: SceneData) -> Result<Self, Self::Error> {
        let scene = Scene {
            spheres: data.spheres.into_iter().map(Sphere::from).collect(),
            lights: data.lights.into_iter().map(Light::from).collect(),
            camera: data.camera.into(),
            background_color: Vector3::from_array(data.background_color),
        };
        scene.validate()?;
        Ok(scene)
    }
}

pub fn parse_scene(content: &str) -> Result<Scene, ConfigError> {
    let data: SceneData = toml::from_str(content)?;
    Ok(Scene::try_from(data)?)
}

/// Load and validate a scene from a TOML file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let scene = parse_scene(&content)?;
    tracing::info!(
        path = %path.display(),
        spheres = scene.spheres.len(),
        lights = scene.lights.len(),
        "scene loaded"
    );

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::color::rgb;

    const DEMO_SCENE: &str = r#"
background_color = [200, 200, 200]

[camera]
position = [0, 0, 0]
viewport_size = 1.0
projection_plane_z = 1.0

[[spheres]]
center = [0, -1, 3]
radius = 1.0
color = [255, 0, 0]
specular = 50
reflective = 0.2

[[spheres]]
center = [-2, 0, 4]
radius = 1.0
color = [0, 255, 0]
specular = 10
reflective = 0.4

[[spheres]]
center = [2, 0, 4]
radius = 1.0
color = [0, 0, 255]
specular = 500
reflective = 0.3

[[spheres]]
center = [0, -5001, 0]
radius = 5000.0
color = [255, 255, 0]
specular = 700
reflective = 0.1

[[lights]]
type = "ambient"
intensity = 0.2

[[lights]]
type = "point"
intensity = 0.6
position = [2, 1, 0]

[[lights]]
type = "directional"
intensity = 0.2
direction = [1, 4, 4]
"#;

    #[test]
    fn test_parse_matches_demo_scene() {
        let scene = parse_scene(DEMO_SCENE).unwrap();
        assert_eq!(scene, Scene::demo());
    }

    #[test]
    fn test_parse_applies_defaults() {
        let scene = parse_scene(
            r#"
[[spheres]]
center = [0, 0, 4]
radius = 1
color = [255, 0, 0]
"#,
        )
        .unwrap();

        assert_eq!(scene.camera, Camera::default());
        assert_eq!(scene.background_color, Scene::DEFAULT_BACKGROUND);
        assert!(scene.lights.is_empty());

        let sphere = &scene.spheres[0];
        assert_eq!(sphere.color, rgb(255.0, 0.0, 0.0));
        assert_eq!(sphere.specular, Sphere::NO_SPECULAR);
        assert_eq!(sphere.reflective, 0.0);
    }

    #[test]
    fn test_parse_rejects_unknown_light_type() {
        let result = parse_scene(
            r#"
[[lights]]
type = "spot"
intensity = 1.0
"#,
        );
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_point_light_without_position() {
        let result = parse_scene(
            r#"
[[lights]]
type = "point"
intensity = 1.0
"#,
        );
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_invalid_sphere() {
        let result = parse_scene(
            r#"
[[spheres]]
center = [0, 0, 4]
radius = -1
color = [255, 0, 0]
"#,
        );
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::Validation(SceneError::InvalidRadius { index: 0, .. })
        ));
    }

    #[test]
    fn test_load_missing_scene() {
        let result = load_scene("/nonexistent/scene.toml");
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_scene_from_file() {
        let temp_file = std::env::temp_dir().join("sphere_tracing_test_scene.toml");
        std::fs::write(&temp_file, DEMO_SCENE).unwrap();

        let result = load_scene(&temp_file);
        let _ = std::fs::remove_file(&temp_file);

        assert_eq!(result.unwrap().spheres.len(), 4);
    }

    #[test]
    fn test_recursion_depth_is_clamped() {
        assert_eq!(RenderConfig::new(-3).recursion_depth(), 0);
        assert_eq!(RenderConfig::new(2).recursion_depth(), 2);
        assert_eq!(RenderConfig::new(100).recursion_depth(), 5);
        assert_eq!(RenderConfig::default().recursion_depth(), 3);
    }
}
