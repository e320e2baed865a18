use crate::particle::Particle;

/// Outcome of a single distance-constraint application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correction {
    Applied,
    /// The particles coincide, so there is no direction to correct along.
    Degenerate,
}

/// Moves `a` and `b` so their separation equals `rest_length`, each
/// absorbing half of the error. Their midpoint is unchanged.
///
/// Coincident particles are left alone and reported as
/// [`Correction::Degenerate`]; later passes pick them up once forces
/// separate them.
pub fn distance_constraint(a: &mut Particle, b: &mut Particle, rest_length: f32) -> Correction {
    let diff = b.position - a.position;
    let d = diff.length();
    if d == 0.0 {
        return Correction::Degenerate;
    }

    let ratio = rest_length / d;
    let correction = diff * (1.0 - ratio) * 0.5;
    a.position += correction;
    b.position -= correction;
    Correction::Applied
}

/// Snaps a particle back to its rest pose.
#[inline]
pub fn anchor_constraint(p: &mut Particle) {
    p.position = p.original;
    p.previous = p.original;
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn particle(pos: Vec3) -> Particle {
        Particle::new(pos, 1.0)
    }

    #[test]
    fn stretched_pair_reaches_rest_length() {
        let pairs = [
            (Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), 1.0),
            (Vec3::new(-1.0, 2.0, 0.5), Vec3::new(4.0, -3.0, 2.0), 2.5),
            (Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.1, 0.1, 0.0), 0.7),
        ];

        for (pa, pb, rest) in pairs {
            let mut a = particle(pa);
            let mut b = particle(pb);

            assert_eq!(distance_constraint(&mut a, &mut b, rest), Correction::Applied);

            let d = (b.position - a.position).length();
            assert!((d - rest).abs() < 1e-5, "distance {d}, expected {rest}");
        }
    }

    #[test]
    fn correction_is_split_evenly() {
        let mut a = particle(Vec3::new(0.0, 0.0, 0.0));
        let mut b = particle(Vec3::new(4.0, 0.0, 0.0));
        let mid_before = (a.position + b.position) * 0.5;

        distance_constraint(&mut a, &mut b, 2.0);

        assert_eq!(a.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.position, Vec3::new(3.0, 0.0, 0.0));
        assert_eq!((a.position + b.position) * 0.5, mid_before);
    }

    #[test]
    fn pair_at_rest_length_is_untouched() {
        let mut a = particle(Vec3::new(1.0, 1.0, 0.0));
        let mut b = particle(Vec3::new(1.0, -1.0, 0.0));

        distance_constraint(&mut a, &mut b, 2.0);

        assert_eq!(a.position, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(b.position, Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn coincident_pair_is_skipped() {
        let p = Vec3::new(0.5, 0.5, 0.5);
        let mut a = particle(p);
        let mut b = particle(p);

        assert_eq!(distance_constraint(&mut a, &mut b, 1.0), Correction::Degenerate);
        assert_eq!(a.position, p);
        assert_eq!(b.position, p);
        assert!(a.position.is_finite());
    }

    #[test]
    fn anchor_restores_original_and_previous() {
        let mut p = particle(Vec3::new(2.0, 3.0, 0.0));
        p.position = Vec3::new(-7.0, 1.0, 4.0);
        p.previous = Vec3::new(9.0, 9.0, 9.0);
        p.velocity = Vec3::new(0.0, -5.0, 0.0);

        anchor_constraint(&mut p);

        assert_eq!(p.position, Vec3::new(2.0, 3.0, 0.0));
        assert_eq!(p.previous, Vec3::new(2.0, 3.0, 0.0));
        // Velocity is not part of the anchor.
        assert_eq!(p.velocity, Vec3::new(0.0, -5.0, 0.0));
    }
}
