use super::*;

use arrayvec::ArrayVec;

/// The region rays are drawn in. The incident ray starts on its edge, and the emergent ray
/// is cut off when it leaves it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBounds {
    pub min: Vector2<Float>,
    pub max: Vector2<Float>,
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            min: Vector2::new(-0.5, -0.6),
            max: Vector2::new(1.2, 1.0),
        }
    }
}

impl ViewBounds {
    /// Distance `t` after which `ray.at(t)` leaves these bounds, `0.0` if it already has.
    #[must_use]
    pub fn exit_distance(&self, ray: &Ray<2>) -> Float {
        (0..2)
            .filter_map(|i| {
                let d = ray.direction[i];
                if d > 0.0 {
                    Some((self.max[i] - ray.origin[i]) / d)
                } else if d < 0.0 {
                    Some((self.min[i] - ray.origin[i]) / d)
                } else {
                    None
                }
            })
            .fold(Float::INFINITY, Float::min)
            .max(0.0)
    }
}

/// A straight piece of a ray's path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub origin: Vector2<Float>,
    pub direction: Unit<Vector2<Float>>,
    pub length: Float,
}

impl Segment {
    #[inline]
    #[must_use]
    pub fn end(&self) -> Vector2<Float> {
        self.origin + self.direction.as_ref() * self.length
    }

    /// Angle of this segment with the x axis, in degrees
    #[inline]
    #[must_use]
    pub fn angle(&self) -> Float {
        angle_of(&self.direction)
    }
}

/// How a ray's path through the prism ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The ray crossed all four walls and left the prism.
    Exited,
    /// The ray was totally internally reflected at the wall with this (`0`-based) index.
    /// Nothing is traced past that point.
    TotalInternalReflection { interface: usize },
    /// The ray passed beside the wall with this index, the walls are too
    /// thick (or the ray too steep) for the four-wall path to exist. The path stops
    /// where the ray reaches the prism's outer boundary.
    MissedInterface { interface: usize },
}

/// The path of a ray through a [`HollowPrism`].
#[derive(Clone, Debug, PartialEq)]
pub struct PrismTrace {
    pub params: PrismParams,
    /// The incident ray, followed by one segment per crossed wall
    pub segments: ArrayVec<Segment, 5>,
    /// One entry per crossed wall
    pub crossings: ArrayVec<Crossing, 4>,
    pub termination: Termination,
}

impl PrismTrace {
    #[inline]
    #[must_use]
    pub fn exited(&self) -> bool {
        self.termination == Termination::Exited
    }

    /// Signed refraction angles, in degrees from each crossed wall's normal.
    #[inline]
    pub fn refraction_angles(&self) -> impl Iterator<Item = Float> + '_ {
        self.crossings.iter().map(|c| c.refraction)
    }

    /// Angle, in degrees above the x axis, of the ray leaving the prism.
    #[inline]
    #[must_use]
    pub fn exit_angle(&self) -> Option<Float> {
        self.exited()
            .then(|| self.segments.last().map(Segment::angle))
            .flatten()
    }

    /// How much the prism bent the ray, in degrees. Positive when it was
    /// bent towards the prism's base.
    #[inline]
    #[must_use]
    pub fn deviation(&self) -> Option<Float> {
        self.exit_angle().map(|exit| self.params.theta1 - exit)
    }
}

/// Trace a ray through the hollow prism described by `params`.
///
/// The ray hits the outer left face at the origin, `params.theta1` degrees above the x axis.
pub fn trace(params: &PrismParams) -> Result<PrismTrace, ParamError> {
    params.validate()?;
    let prism = HollowPrism::new(params.l)?;
    Ok(trace_through(&prism, params, &ViewBounds::default()))
}

/// Like [`trace`], but with an existing prism and view, and without validating `params`.
#[must_use]
pub fn trace_through(prism: &HollowPrism, params: &PrismParams, bounds: &ViewBounds) -> PrismTrace {
    let PrismParams { n1, n2, n3, .. } = *params;

    let backwards = Ray::from_angle(Vector2::zeros(), params.theta1 + 180.0);
    let start = backwards.at(bounds.exit_distance(&backwards));
    let mut ray = Ray::from_angle(start, params.theta1);

    let mut segments = ArrayVec::new();
    let mut crossings = ArrayVec::new();
    let mut termination = Termination::Exited;

    for (i, interface) in prism.interfaces(n1, n2, n3).iter().enumerate() {
        match interface.refract(&ray) {
            Ok(crossing) => {
                tracing::debug!(
                    interface = i,
                    incidence = crossing.incidence,
                    refraction = crossing.refraction,
                    "ray refracted"
                );
                segments.push(Segment {
                    origin: ray.origin,
                    direction: ray.direction,
                    length: crossing.distance,
                });
                crossings.push(crossing);
                ray = crossing.refracted_ray();
            }
            Err(Blocked::TotalInternalReflection {
                distance,
                incidence,
                ..
            }) => {
                tracing::debug!(interface = i, incidence, "total internal reflection");
                segments.push(Segment {
                    origin: ray.origin,
                    direction: ray.direction,
                    length: distance,
                });
                termination = Termination::TotalInternalReflection { interface: i };
                break;
            }
            Err(Blocked::Missed) => {
                tracing::debug!(interface = i, "ray missed the next wall");
                termination = Termination::MissedInterface { interface: i };
                break;
            }
        }
    }

    let last_length = match termination {
        Termination::Exited => Some(bounds.exit_distance(&ray)),
        Termination::TotalInternalReflection { .. } => None,
        // the ray never entered the prism
        Termination::MissedInterface { interface: 0 } => Some(bounds.exit_distance(&ray)),
        // stop where the ray reaches the prism's outer boundary, nothing is traced past it
        Termination::MissedInterface { .. } => Some(prism.exit_distance(&ray)),
    };

    if let Some(length) = last_length {
        segments.push(Segment {
            origin: ray.origin,
            direction: ray.direction,
            length,
        });
    }

    PrismTrace {
        params: *params,
        segments,
        crossings,
        termination,
    }
}
