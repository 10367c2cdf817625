use refract_prism::{refract::Float, *};

use core::iter;
pub use rand;

pub trait Random: Sized {
    /// Generate a random value using the provided `rng`
    ///
    /// This method must not fail. If creating a value is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for PrismParams {
    /// Every parameter is drawn uniformly from its bounds.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self {
            n1: rand_in(rng, &N1_BOUNDS),
            n2: rand_in(rng, &N2_BOUNDS),
            n3: rand_in(rng, &N3_BOUNDS),
            l: rand_in(rng, &THICKNESS_BOUNDS),
            theta1: rand_in(rng, &THETA1_BOUNDS),
        }
    }
}

/// A float drawn uniformly from `bounds`, both ends included.
pub fn rand_in(rng: &mut (impl rand::Rng + ?Sized), bounds: &Bounds) -> Float {
    rng.gen_range(bounds.min..=bounds.max)
}

/// `count` random parameter sets, each with the trace it produces.
pub fn random_traces(
    rng: &mut (impl rand::Rng + ?Sized),
    count: usize,
) -> Vec<(HollowPrism, PrismTrace)> {
    iter::repeat_with(|| PrismParams::random(rng))
        .take(count)
        .filter_map(|params| {
            let prism = HollowPrism::new(params.l).ok()?;
            let path = trace_through(&prism, &params, &ViewBounds::default());
            Some((prism, path))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use refract_prism::refract::{direction_from_angle, nalgebra::Vector2};

    #[test]
    fn random_params_are_valid() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..1000 {
            let params = PrismParams::random(&mut rng);
            assert_eq!(params.validate(), Ok(()), "{params:?}");
        }
    }

    #[test]
    fn random_params_cover_the_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let thetas: Vec<_> = iter::repeat_with(|| PrismParams::random(&mut rng).theta1)
            .take(1000)
            .collect();

        assert!(thetas.iter().any(|&t| t < 10.0));
        assert!(thetas.iter().any(|&t| t > 80.0));
    }

    #[test]
    fn random_traces_are_well_formed() {
        let mut rng = StdRng::seed_from_u64(42);
        let traces = random_traces(&mut rng, 200);
        assert_eq!(traces.len(), 200);

        for (prism, path) in &traces {
            assert_eq!(prism.thickness(), path.params.l);
            assert!(!path.segments.is_empty());

            // the segment preceding a total internal reflection is kept, the others are not drawn
            let expected = match path.termination {
                Termination::Exited => 5,
                Termination::TotalInternalReflection { interface } => interface + 1,
                Termination::MissedInterface { interface } => interface + 1,
            };
            assert_eq!(path.segments.len(), expected, "{:?}", path.params);

            // n1 sin θ is conserved across parallel walls
            if let [first, second, ..] = path.crossings.as_slice() {
                let p = &path.params;
                let lhs = p.n1 * first.incidence.to_radians().sin();
                let rhs = p.n3 * second.refraction.to_radians().sin();
                assert!((lhs - rhs).abs() < 1e-9, "{lhs} != {rhs}");
            }
        }
    }

    #[test]
    fn unfinished_paths_stay_inside_the_prism() {
        let upper_normal = direction_from_angle(60.0);
        let upper_corner = Vector2::new(0.0, 0.5);

        let mut rng = StdRng::seed_from_u64(1);
        let traces = random_traces(&mut rng, 20_000);
        let mut missed = 0;

        for (_, path) in traces.iter().filter(|(_, path)| !path.exited()) {
            if matches!(path.termination, Termination::MissedInterface { .. }) {
                missed += 1;
            }

            // no segment leaves through the outer upper face without being refracted there
            for segment in &path.segments {
                let offset = (segment.end() - upper_corner).dot(upper_normal.as_ref());
                assert!(offset <= 1e-9, "{:?}: {offset}", path.params);
            }
        }

        assert!(missed > 0);
    }
}
