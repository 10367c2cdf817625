use super::*;

const SQRT_3: Float = 1.732_050_807_568_877_2;

/// An equilateral prism with unit sides, whose core is hollowed out, leaving walls of
/// thickness `l`.
///
/// ```text
///  (0, 0.5) +
///           |\
///           | + (l, 0.5 - √3 l)
///           | |\
///           | | \
///  (0, 0)   + |  + (√3/2 - 2l, 0)   + (√3/2, 0)
///           | | /
///           | |/
///           | + (l, -0.5 + √3 l)
///           |/
/// (0, -0.5) +
/// ```
///
/// The outer left face lies on the y axis, and the apex points towards +x.
#[derive(Clone, Debug, PartialEq)]
pub struct HollowPrism {
    thickness: Float,
    outer: [Vector2<Float>; 3],
    inner: [Vector2<Float>; 3],
}

impl HollowPrism {
    pub fn new(thickness: Float) -> Result<Self, ParamError> {
        THICKNESS_BOUNDS.check("l", thickness)?;

        let l = thickness;

        Ok(Self {
            thickness,
            outer: [
                Vector2::new(0.0, -0.5),
                Vector2::new(0.0, 0.5),
                Vector2::new(SQRT_3 / 2.0, 0.0),
            ],
            inner: [
                Vector2::new(l, -0.5 + SQRT_3 * l),
                Vector2::new(l, 0.5 - SQRT_3 * l),
                Vector2::new(SQRT_3 / 2.0 - 2.0 * l, 0.0),
            ],
        })
    }

    #[inline]
    #[must_use]
    pub const fn thickness(&self) -> Float {
        self.thickness
    }

    /// Bottom, top, then apex vertex of the outer triangle
    #[inline]
    #[must_use]
    pub const fn outer_vertices(&self) -> &[Vector2<Float>; 3] {
        &self.outer
    }

    /// Bottom, top, then apex vertex of the hollow core
    #[inline]
    #[must_use]
    pub const fn inner_vertices(&self) -> &[Vector2<Float>; 3] {
        &self.inner
    }

    /// The four walls a ray entering through the left face crosses, in order:
    ///
    /// 1. the outer left face, from `n1` into `n2`
    /// 2. the inner left face, from `n2` into `n3`
    /// 3. the inner upper face, from `n3` into `n2`
    /// 4. the outer upper face, from `n2` into `n1`
    #[must_use]
    pub fn interfaces(&self, n1: Float, n2: Float, n3: Float) -> [Interface; 4] {
        let [outer_bottom, outer_top, outer_apex] = self.outer;
        let [inner_bottom, inner_top, inner_apex] = self.inner;

        let left = Vector2::x_axis();
        // the upper faces slope down at 30°, their normals point 60° above the x axis
        let upper = direction_from_angle(60.0);

        [
            Interface::new([outer_bottom, outer_top], left, n1, n2),
            Interface::new([inner_bottom, inner_top], left, n2, n3),
            Interface::new([inner_apex, inner_top], upper, n3, n2),
            Interface::new([outer_apex, outer_top], upper, n2, n1),
        ]
    }

    /// Distance after which `ray`, starting inside (or on the edge of) the outer triangle,
    /// leaves it. `0.0` if it never enters it.
    #[must_use]
    pub fn exit_distance(&self, ray: &Ray<2>) -> Float {
        let [bottom, top, apex] = self.outer;

        let t = [(bottom, top), (top, apex), (apex, bottom)]
            .into_iter()
            .filter_map(|(a, b)| {
                let edge = b - a;
                // vertices go clockwise, the outward normal is on the left of each edge
                let outward = Vector2::new(-edge.y, edge.x);
                let u = ray.direction.dot(&outward);
                (u > 0.0).then(|| (a - ray.origin).dot(&outward) / u)
            })
            .fold(Float::INFINITY, Float::min);

        if t.is_finite() {
            t.max(0.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn walls_have_uniform_thickness() {
        let prism = HollowPrism::new(0.15).unwrap();
        let [outer_left, inner_left, inner_upper, outer_upper] = prism.interfaces(1.0, 1.0, 1.0);

        for (outer, inner) in [(outer_left, inner_left), (outer_upper, inner_upper)] {
            let [p, _] = outer.endpoints();
            for q in inner.endpoints() {
                assert_relative_eq!((q - p).dot(outer.normal().as_ref()).abs(), 0.15, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn normals_are_perpendicular_to_the_walls() {
        let prism = HollowPrism::new(0.1).unwrap();
        for interface in prism.interfaces(1.0, 1.5, 1.33) {
            let [a, b] = interface.endpoints();
            assert_relative_eq!((b - a).dot(interface.normal().as_ref()), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn inner_vertices_are_inside() {
        let prism = HollowPrism::new(0.2).unwrap();
        let [bottom, top, apex] = *prism.inner_vertices();
        assert!(bottom.y < 0.0 && top.y > 0.0);
        assert!(apex.x > bottom.x);
        assert_relative_eq!(apex.x, SQRT_3 / 2.0 - 0.4, epsilon = 1e-12);
    }

    #[test]
    fn rays_leave_through_the_face_they_reach_first() {
        let prism = HollowPrism::new(0.1).unwrap();

        // straight up from the middle of the left face, out through the upper face
        let up = Ray::from_angle([0.0, 0.0], 90.0);
        assert_relative_eq!(prism.exit_distance(&up), 0.5, epsilon = 1e-12);

        // down and right, out through the bottom face
        let down = Ray::from_angle([0.2, 0.0], -60.0);
        let end = down.at(prism.exit_distance(&down));
        assert_relative_eq!(end.y, -0.5 + end.x / SQRT_3, epsilon = 1e-12);

        // heading away from a point on the left face
        let away = Ray::from_angle([0.0, 0.0], 180.0);
        assert_eq!(prism.exit_distance(&away), 0.0);
    }

    #[test]
    fn thickness_is_validated() {
        assert!(HollowPrism::new(0.0).is_err());
        assert!(HollowPrism::new(0.3).is_err());
        assert!(HollowPrism::new(Float::INFINITY).is_err());
    }
}
