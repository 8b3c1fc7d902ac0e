use crate::{
    scene::{Scene, Sphere},
    util::math::{dot, subtract, Vector3},
};

/// Closest sphere hit along a ray.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub sphere: &'a Sphere,
    pub t: f64,
}

/// Both roots of `|origin + t * direction - center|^2 = radius^2`.
///
/// A ray whose line misses the sphere yields `(+inf, +inf)`, which every
/// `min_t < t < max_t` filter rejects. `t` is measured in multiples of
/// `direction`, which need not be normalized.
pub fn intersect_ray_sphere(origin: Vector3, direction: Vector3, sphere: &Sphere) -> (f64, f64) {
    let oc = subtract(origin, sphere.center);

    let k1 = dot(direction, direction);
    let k2 = 2.0 * dot(oc, direction);
    let k3 = dot(oc, oc) - sphere.radius * sphere.radius;

    let discriminant = k2 * k2 - 4.0 * k1 * k3;
    if discriminant < 0.0 {
        return (f64::INFINITY, f64::INFINITY);
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t1 = (-k2 + sqrt_discriminant) / (2.0 * k1);
    let t2 = (-k2 - sqrt_discriminant) / (2.0 * k1);
    (t1, t2)
}

impl Scene {
    /// Nearest hit with `min_t < t < max_t`.
    ///
    /// Spheres are scanned in scene order and a root only replaces the current
    /// best when strictly smaller, so the earliest sphere wins ties.
    pub fn closest_intersection(
        &self,
        origin: Vector3,
        direction: Vector3,
        min_t: f64,
        max_t: f64,
    ) -> Option<Hit<'_>> {
        let mut closest: Option<Hit<'_>> = None;
        let mut closest_t = f64::INFINITY;

        for sphere in &self.spheres {
            let (t1, t2) = intersect_ray_sphere(origin, direction, sphere);
            for t in [t1, t2] {
                if t < closest_t && min_t < t && t < max_t {
                    closest_t = t;
                    closest = Some(Hit { sphere, t });
                }
            }
        }

        closest
    }
}
