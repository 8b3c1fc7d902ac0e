use crate::{
    scene::Scene,
    util::{
        color::Color,
        math::{add, reflect, scale, subtract, Vector3, EPSILON},
    },
};

impl Scene {
    /// Color seen along `origin + t * direction` for `min_t < t < max_t`.
    ///
    /// Reflective surfaces spawn one secondary ray per level until `depth`
    /// reaches zero, so a call never recurses more than `depth` times.
    pub fn trace_ray(
        &self,
        origin: Vector3,
        direction: Vector3,
        min_t: f64,
        max_t: f64,
        depth: u32,
    ) -> Color {
        let Some(hit) = self.closest_intersection(origin, direction, min_t, max_t) else {
            return self.background_color;
        };
        let sphere = hit.sphere;

        let point = add(origin, scale(hit.t, direction));
        let normal = subtract(point, sphere.center).normalize();

        let view = scale(-1.0, direction);
        let lighting = self.compute_lighting(point, normal, view, sphere.specular);
        let local_color = scale(lighting, sphere.color);

        if sphere.reflective <= 0.0 || depth == 0 {
            return local_color;
        }

        let reflected_ray = reflect(view, normal);
        let reflected_color = self.trace_ray(point, reflected_ray, EPSILON, f64::INFINITY, depth - 1);

        add(
            scale(1.0 - sphere.reflective, local_color),
            scale(sphere.reflective, reflected_color),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scene::{Light, Sphere},
        util::color::rgb,
    };

    fn red_sphere_scene() -> Scene {
        Scene::new(
            vec![Sphere::new(
                Vector3::new(0.0, 0.0, 4.0),
                1.0,
                rgb(255.0, 0.0, 0.0),
            )],
            vec![Light::Ambient { intensity: 1.0 }],
        )
    }

    #[test]
    fn empty_scene_returns_background() {
        let mut scene = Scene::new(vec![], vec![Light::Ambient { intensity: 1.0 }]);
        scene.background_color = rgb(10.0, 20.0, 30.0);
        let color = scene.trace_ray(Vector3::ZERO, Vector3::Z, 1.0, f64::INFINITY, 3);
        assert_eq!(color, rgb(10.0, 20.0, 30.0));
    }

    #[test]
    fn ray_away_from_spheres_returns_background() {
        let scene = red_sphere_scene();
        let color = scene.trace_ray(Vector3::ZERO, -Vector3::Z, 1.0, f64::INFINITY, 3);
        assert_eq!(color, Scene::DEFAULT_BACKGROUND);
    }

    #[test]
    fn ambient_lit_sphere_keeps_its_color() {
        let scene = red_sphere_scene();
        let color = scene.trace_ray(Vector3::ZERO, Vector3::Z, 1.0, f64::INFINITY, 0);
        assert_eq!(color, rgb(255.0, 0.0, 0.0));
    }

    fn mirror_scene(reflective: f64) -> Scene {
        // a reflective sphere in front of the camera and a green one behind
        // the camera that only shows up in the reflection
        Scene::new(
            vec![
                Sphere::new(Vector3::new(0.0, 0.0, 4.0), 1.0, rgb(255.0, 0.0, 0.0))
                    .with_reflective(reflective),
                Sphere::new(Vector3::new(0.0, 0.0, -4.0), 1.0, rgb(0.0, 255.0, 0.0)),
            ],
            vec![Light::Ambient { intensity: 1.0 }],
        )
    }

    #[test]
    fn zero_depth_returns_local_shading() {
        let scene = mirror_scene(0.3);
        let color = scene.trace_ray(Vector3::ZERO, Vector3::Z, 1.0, f64::INFINITY, 0);
        assert_eq!(color, rgb(255.0, 0.0, 0.0));
    }

    #[test]
    fn reflection_blends_local_and_reflected_color() {
        let scene = mirror_scene(0.3);
        let color = scene.trace_ray(Vector3::ZERO, Vector3::Z, 1.0, f64::INFINITY, 1);
        let expected = rgb(0.7 * 255.0, 0.3 * 255.0, 0.0);
        assert!(color.abs_diff_eq(expected, 1e-9), "{color:?}");
    }

    #[test]
    fn non_reflective_surface_ignores_depth() {
        let scene = mirror_scene(0.0);
        let shallow = scene.trace_ray(Vector3::ZERO, Vector3::Z, 1.0, f64::INFINITY, 0);
        let deep = scene.trace_ray(Vector3::ZERO, Vector3::Z, 1.0, f64::INFINITY, 5);
        assert_eq!(shallow, deep);
    }

    #[test]
    fn reflected_miss_blends_in_background() {
        let mut scene = mirror_scene(0.5);
        scene.spheres.truncate(1);
        scene.background_color = rgb(0.0, 0.0, 100.0);

        let color = scene.trace_ray(Vector3::ZERO, Vector3::Z, 1.0, f64::INFINITY, 2);
        assert!(color.abs_diff_eq(rgb(127.5, 0.0, 50.0), 1e-9), "{color:?}");
    }

    #[test]
    fn stacked_lights_may_exceed_the_channel_range() {
        let mut scene = red_sphere_scene();
        scene.lights.push(Light::Ambient { intensity: 0.5 });
        let color = scene.trace_ray(Vector3::ZERO, Vector3::Z, 1.0, f64::INFINITY, 0);
        assert_eq!(color.x, 255.0 * 1.5);
    }
}
