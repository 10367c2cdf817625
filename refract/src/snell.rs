use super::*;

/// The refraction angle (in degrees, measured from the normal) of a ray crossing from a
/// medium of refractive index `n1` into one of index `n2`, hitting the boundary at
/// `theta` degrees from the normal.
///
/// `n1 * sin(theta) = n2 * sin(refracted)`, so the sign of `theta` is preserved.
///
/// Returns `None` if there is no such angle, i. e. the ray is totally internally reflected.
#[inline]
#[must_use]
pub fn snell_angle(n1: Float, n2: Float, theta: Float) -> Option<Float> {
    let sin_refracted = n1 / n2 * theta.to_radians().sin();

    // also rejects NaNs
    (sin_refracted.abs() <= 1.0).then(|| sin_refracted.asin().to_degrees())
}

/// The smallest incidence angle, in degrees, at which a ray going from `n1` into `n2` is
/// totally internally reflected.
///
/// Only exists when `n1 > n2`.
#[inline]
#[must_use]
pub fn critical_angle(n1: Float, n2: Float) -> Option<Float> {
    (n1 > n2).then(|| (n2 / n1).asin().to_degrees())
}

/// Vector form of Snell's law: refract `direction` through a boundary whose normal
/// is `normal`, from a medium of index `n1` into one of index `n2`.
///
/// `normal` may point either way, it is flipped to face the direction of travel.
///
/// Returns `None` on total internal reflection.
#[must_use]
pub fn refract_dir<const D: usize>(
    direction: &Unit<SVector<Float, D>>,
    normal: &Unit<SVector<Float, D>>,
    n1: Float,
    n2: Float,
) -> Option<Unit<SVector<Float, D>>> {
    let d = direction.as_ref();
    let mut n = normal.into_inner();
    let mut cos_i = d.dot(&n);

    if cos_i < 0.0 {
        n = -n;
        cos_i = -cos_i;
    }

    let eta = n1 / n2;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);

    (k >= 0.0).then(|| Unit::new_normalize(d * eta + n * (k.sqrt() - eta * cos_i)))
}
