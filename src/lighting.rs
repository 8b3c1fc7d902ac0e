use crate::{
    scene::{Light, Scene, Sphere},
    util::math::{dot, length, reflect, subtract, Vector3, EPSILON},
};

impl Scene {
    /// Total light intensity reaching `point` as seen along `view`.
    ///
    /// Shadows are hard: a light with any sphere between it and `point`
    /// contributes neither diffuse nor specular. The result is not clamped.
    pub fn compute_lighting(
        &self,
        point: Vector3,
        normal: Vector3,
        view: Vector3,
        specular: f64,
    ) -> f64 {
        let length_n = length(normal);
        let length_v = length(view);

        let mut total = 0.0;
        for light in &self.lights {
            let light_intensity = light.intensity();
            let (vec_l, t_max) = match *light {
                Light::Ambient { .. } => {
                    total += light_intensity;
                    continue;
                }
                Light::Point { position, .. } => (subtract(position, point), 1.0),
                Light::Directional { direction, .. } => (direction, f64::INFINITY),
            };

            if self
                .closest_intersection(point, vec_l, EPSILON, t_max)
                .is_some()
            {
                continue;
            }

            let n_dot_l = dot(normal, vec_l);
            if n_dot_l > 0.0 {
                total += light_intensity * n_dot_l / (length_n * length(vec_l));
            }

            if specular != Sphere::NO_SPECULAR {
                let vec_r = reflect(vec_l, normal);
                let r_dot_v = dot(vec_r, view);
                if r_dot_v > 0.0 {
                    total +=
                        light_intensity * (r_dot_v / (length(vec_r) * length_v)).powf(specular);
                }
            }
        }

        total
    }
}
