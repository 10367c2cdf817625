use super::*;

/// Tolerance used when deciding whether a point lies on an interface, and to
/// discard intersections sitting at the ray's own origin.
pub const EPSILON: Float = Float::EPSILON * 64.0;

/// A straight, finite boundary between two media, in the plane.
///
/// Rays are expected to cross it in the direction of its normal: from the
/// medium of index `n_in`, into the medium of index `n_out`.
#[derive(Clone, Debug, PartialEq)]
pub struct Interface {
    start: Vector2<Float>,
    end: Vector2<Float>,
    normal: Unit<Vector2<Float>>,
    /// Refractive index of the medium the ray comes from
    pub n_in: Float,
    /// Refractive index of the medium the ray goes into
    pub n_out: Float,
}

/// The result of a ray successfully crossing an [`Interface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    /// Distance travelled by the ray before hitting the interface
    pub distance: Float,
    /// Where the ray hit the interface
    pub point: Vector2<Float>,
    /// Signed angle, in degrees, from the interface's normal to the incoming direction
    pub incidence: Float,
    /// Signed angle, in degrees, from the interface's normal to the outgoing direction
    pub refraction: Float,
    /// Direction of the refracted ray
    pub direction: Unit<Vector2<Float>>,
}

impl Crossing {
    /// The refracted ray, starting on the interface.
    #[inline]
    #[must_use]
    pub fn refracted_ray(&self) -> Ray<2> {
        Ray::new(self.point, self.direction)
    }
}

/// Why a ray could not cross an [`Interface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Blocked {
    /// The ray doesn't reach the interface (parallel, heading away, or passing beside it)
    Missed,
    /// The ray reaches the interface at `point`, but Snell's law has no solution there
    TotalInternalReflection {
        distance: Float,
        point: Vector2<Float>,
        incidence: Float,
    },
}

impl Interface {
    /// `normal` must point from the incoming medium into the outgoing one.
    #[inline]
    #[must_use]
    pub fn new(
        [start, end]: [Vector2<Float>; 2],
        normal: Unit<Vector2<Float>>,
        n_in: Float,
        n_out: Float,
    ) -> Self {
        Self {
            start,
            end,
            normal,
            n_in,
            n_out,
        }
    }

    #[inline]
    #[must_use]
    pub const fn endpoints(&self) -> [Vector2<Float>; 2] {
        [self.start, self.end]
    }

    #[inline]
    #[must_use]
    pub const fn normal(&self) -> &Unit<Vector2<Float>> {
        &self.normal
    }

    /// Return the distance `t` such that `ray.at(t)` lies on the line supporting this interface.
    ///
    /// Returns `None` if `ray` is parallel to `self`
    #[inline]
    #[must_use]
    pub fn try_ray_intersection(&self, ray: &Ray<2>) -> Option<Float> {
        let normal = self.normal.as_ref();
        let u = ray.direction.dot(normal);
        (u.abs() > Float::EPSILON).then(|| (self.start - ray.origin).dot(normal) / u)
    }

    /// Whether `p`, assumed to be on the supporting line, lies between the two endpoints.
    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Vector2<Float>, eps: Float) -> bool {
        let span = self.end - self.start;
        let s = (p - self.start).dot(&span) / span.norm_squared();
        (-eps..=1.0 + eps).contains(&s)
    }

    /// Signed angle, in degrees, counterclockwise from the normal to `direction`
    #[inline]
    #[must_use]
    pub fn incidence_angle(&self, direction: &Vector2<Float>) -> Float {
        let n = self.normal.as_ref();
        let cross = n.x * direction.y - n.y * direction.x;
        cross.atan2(n.dot(direction)).to_degrees()
    }

    /// Move `ray` up to this interface and refract it through.
    pub fn refract(&self, ray: &Ray<2>) -> Result<Crossing, Blocked> {
        if ray.direction.dot(self.normal.as_ref()) <= 0.0 {
            return Err(Blocked::Missed);
        }

        let distance = self
            .try_ray_intersection(ray)
            .filter(|&t| t >= EPSILON)
            .ok_or(Blocked::Missed)?;

        let point = ray.at(distance);

        if !self.contains(&point, EPSILON) {
            tracing::debug!(?point, "ray passes beside the interface");
            return Err(Blocked::Missed);
        }

        let incidence = self.incidence_angle(&ray.direction);

        let refraction = snell_angle(self.n_in, self.n_out, incidence).ok_or(
            Blocked::TotalInternalReflection {
                distance,
                point,
                incidence,
            },
        )?;

        Ok(Crossing {
            distance,
            point,
            incidence,
            refraction,
            direction: rotate(&self.normal, refraction),
        })
    }
}
