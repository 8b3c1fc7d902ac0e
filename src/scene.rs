use crate::{
    camera::Camera,
    util::{
        color::{rgb, Color},
        math::Vector3,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub lights: Vec<Light>,
    pub camera: Camera,
    pub background_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f64,

    pub color: Color,
    /// Phong exponent, or [`Sphere::NO_SPECULAR`].
    pub specular: f64,
    /// Share of the final color taken from the reflected ray.
    pub reflective: f64,
}

impl Sphere {
    pub const NO_SPECULAR: f64 = -1.0;

    pub fn new(center: Vector3, radius: f64, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
            specular: Self::NO_SPECULAR,
            reflective: 0.0,
        }
    }

    pub fn with_specular(mut self, specular: f64) -> Self {
        self.specular = specular;
        self
    }

    pub fn with_reflective(mut self, reflective: f64) -> Self {
        self.reflective = reflective;
        self
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vector3::ZERO, 0.5, Color::splat(255.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient { intensity: f64 },
    Point { intensity: f64, position: Vector3 },
    Directional { intensity: f64, direction: Vector3 },
}

impl Light {
    pub fn intensity(&self) -> f64 {
        match *self {
            Light::Ambient { intensity }
            | Light::Point { intensity, .. }
            | Light::Directional { intensity, .. } => intensity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Mutation requested by the outside world between two frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    MoveSphere { index: usize, axis: Axis, delta: f64 },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("sphere {index}: radius must be positive, got {radius}")]
    InvalidRadius { index: usize, radius: f64 },

    #[error("sphere {index}: reflective must be within [0, 1], got {reflective}")]
    InvalidReflective { index: usize, reflective: f64 },

    #[error("sphere {index}: specular must be -1 or non-negative, got {specular}")]
    InvalidSpecular { index: usize, specular: f64 },

    #[error("{0} contains a non-finite value")]
    NonFinite(String),

    #[error("no sphere with index {0}")]
    UnknownSphere(usize),
}

impl Scene {
    pub const DEFAULT_BACKGROUND: Color = Color::new(200.0, 200.0, 200.0);

    pub fn new(spheres: Vec<Sphere>, lights: Vec<Light>) -> Self {
        Self {
            spheres,
            lights,
            camera: Camera::default(),
            background_color: Self::DEFAULT_BACKGROUND,
        }
    }

    /// Three colored spheres over a large yellow one acting as the floor, lit
    /// by an ambient, a point and a directional light.
    pub fn demo() -> Self {
        let spheres = vec![
            Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, rgb(255.0, 0.0, 0.0))
                .with_specular(50.0)
                .with_reflective(0.2),
            Sphere::new(Vector3::new(-2.0, 0.0, 4.0), 1.0, rgb(0.0, 255.0, 0.0))
                .with_specular(10.0)
                .with_reflective(0.4),
            Sphere::new(Vector3::new(2.0, 0.0, 4.0), 1.0, rgb(0.0, 0.0, 255.0))
                .with_specular(500.0)
                .with_reflective(0.3),
            Sphere::new(Vector3::new(0.0, -5001.0, 0.0), 5000.0, rgb(255.0, 255.0, 0.0))
                .with_specular(700.0)
                .with_reflective(0.1),
        ];
        let lights = vec![
            Light::Ambient { intensity: 0.2 },
            Light::Point {
                intensity: 0.6,
                position: Vector3::new(2.0, 1.0, 0.0),
            },
            Light::Directional {
                intensity: 0.2,
                direction: Vector3::new(1.0, 4.0, 4.0),
            },
        ];
        Self::new(spheres, lights)
    }

    /// Checks the preconditions the tracer relies on.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !(sphere.center.is_finite() && sphere.color.is_finite()) {
                return Err(SceneError::NonFinite(format!("sphere {index}")));
            }
            if !(sphere.radius > 0.0 && sphere.radius.is_finite()) {
                return Err(SceneError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
            if !(0.0..=1.0).contains(&sphere.reflective) {
                return Err(SceneError::InvalidReflective {
                    index,
                    reflective: sphere.reflective,
                });
            }
            if !(sphere.specular == Sphere::NO_SPECULAR || sphere.specular >= 0.0) {
                return Err(SceneError::InvalidSpecular {
                    index,
                    specular: sphere.specular,
                });
            }
        }

        for (index, light) in self.lights.iter().enumerate() {
            let finite = light.intensity().is_finite()
                && match *light {
                    Light::Ambient { .. } => true,
                    Light::Point { position, .. } => position.is_finite(),
                    Light::Directional { direction, .. } => direction.is_finite(),
                };
            if !finite {
                return Err(SceneError::NonFinite(format!("light {index}")));
            }
        }

        if !(self.camera.is_finite() && self.background_color.is_finite()) {
            return Err(SceneError::NonFinite("camera or background".to_owned()));
        }

        Ok(())
    }

    pub fn apply_command(&mut self, command: SceneCommand) -> Result<(), SceneError> {
        match command {
            SceneCommand::MoveSphere { index, axis, delta } => {
                let sphere = self
                    .spheres
                    .get_mut(index)
                    .ok_or(SceneError::UnknownSphere(index))?;
                match axis {
                    Axis::X => sphere.center.x += delta,
                    Axis::Y => sphere.center.y += delta,
                    Axis::Z => sphere.center.z += delta,
                }
                tracing::debug!(index, ?axis, delta, center = ?sphere.center, "sphere moved");
            }
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::demo()
    }
}
