pub mod math {
    use glam::DVec3;

    pub type Vector3 = DVec3;

    /// Smallest `t` accepted for rays leaving a surface, so the surface itself
    /// is not hit again.
    pub const EPSILON: f64 = 0.0001;

    #[inline]
    pub fn dot(a: Vector3, b: Vector3) -> f64 {
        a.dot(b)
    }

    #[inline]
    pub fn length(a: Vector3) -> f64 {
        a.length()
    }

    #[inline]
    pub fn scale(k: f64, a: Vector3) -> Vector3 {
        a * k
    }

    #[inline]
    pub fn add(a: Vector3, b: Vector3) -> Vector3 {
        a + b
    }

    #[inline]
    pub fn subtract(a: Vector3, b: Vector3) -> Vector3 {
        a - b
    }

    /// Reflects `v` about the axis `n`.
    ///
    /// `n` is used as given; the result is only a mirror image of `v` when `n`
    /// has unit length.
    #[inline]
    pub fn reflect(v: Vector3, n: Vector3) -> Vector3 {
        subtract(scale(2.0 * dot(v, n), n), v)
    }
}

pub mod color {
    use glam::DVec3;

    /// RGB with channels nominally in `[0, 255]`.
    ///
    /// Shading arithmetic is allowed to leave that range; only [`clamp_color`]
    /// brings it back.
    pub type Color = DVec3;

    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color::new(r, g, b)
    }

    pub fn clamp_color(color: Color) -> [u8; 3] {
        [
            clamp_channel(color.x),
            clamp_channel(color.y),
            clamp_channel(color.z),
        ]
    }

    fn clamp_channel(value: f64) -> u8 {
        if value.is_nan() {
            return 0;
        }
        value.clamp(0.0, 255.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::color::*;
    use super::math::*;

    fn assert_close(a: Vector3, b: Vector3) {
        assert!(a.abs_diff_eq(b, 1e-9), "{a:?} != {b:?}");
    }

    #[test]
    fn basic_operations() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-2.0, 0.5, 4.0);

        assert_eq!(dot(a, b), 11.0);
        assert_eq!(length(Vector3::new(3.0, 4.0, 0.0)), 5.0);
        assert_eq!(scale(2.0, a), Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(add(a, b), Vector3::new(-1.0, 2.5, 7.0));
        assert_eq!(subtract(a, b), Vector3::new(3.0, 1.5, -1.0));
    }

    #[test]
    fn reflect_mirrors_about_axis() {
        let n = Vector3::Y;
        let v = Vector3::new(1.0, 1.0, 0.0);
        assert_close(reflect(v, n), Vector3::new(-1.0, 1.0, 0.0));
    }

    #[test]
    fn reflect_is_an_involution_for_unit_axes() {
        let axes = [
            Vector3::X,
            Vector3::new(1.0, 2.0, -2.0).normalize(),
            Vector3::new(-0.3, 0.1, 0.9).normalize(),
        ];
        let vectors = [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-5.0, 0.25, 7.5),
            Vector3::ZERO,
        ];

        for n in axes {
            for v in vectors {
                assert_close(reflect(reflect(v, n), n), v);
            }
        }
    }

    #[test]
    fn clamp_color_limits_each_channel() {
        assert_eq!(clamp_color(rgb(300.0, -10.0, 255.0)), [255, 0, 255]);
        assert_eq!(clamp_color(rgb(127.6, 0.4, f64::NAN)), [128, 0, 0]);
        assert_eq!(clamp_color(rgb(f64::INFINITY, 12.0, 0.0)), [255, 12, 0]);
    }
}
