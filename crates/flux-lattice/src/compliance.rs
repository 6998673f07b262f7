//! Velocity-set compliance helpers.
//!
//! Checks shared by the stock-set test modules: every property the
//! collision and boundary code relies on.

use crate::velocity_set::VelocitySet;

/// Assert `opposite(opposite(i)) == i` for every direction.
pub fn assert_opposite_involution(set: &VelocitySet) {
    for i in 0..set.q() {
        let o = set.opposite(i);
        assert_eq!(
            set.opposite(o),
            i,
            "{}: opposite({o}) = {}, expected {i}",
            set.name(),
            set.opposite(o)
        );
    }
}

/// Assert the opposite vector is the exact reverse, and only the rest
/// direction is its own opposite.
pub fn assert_opposite_reverses(set: &VelocitySet) {
    for i in 0..set.q() {
        let [cx, cy] = set.direction(i);
        let o = set.opposite(i);
        assert_eq!(set.direction(o), [-cx, -cy], "{}: direction {i}", set.name());
        if o == i {
            assert_eq!([cx, cy], [0, 0], "{}: {i} is self-opposite", set.name());
        }
    }
}

/// Assert the weights sum to one.
pub fn assert_weights_normalised(set: &VelocitySet) {
    let sum: f64 = set.weights().iter().sum();
    assert!(
        (sum - 1.0).abs() < 1e-12,
        "{}: weights sum to {sum}",
        set.name()
    );
}

/// Assert the weighted mean velocity is zero.
pub fn assert_zero_first_moment(set: &VelocitySet) {
    let (mut mx, mut my) = (0.0, 0.0);
    for (_, [cx, cy], w) in set.iter() {
        mx += w * cx as f64;
        my += w * cy as f64;
    }
    assert!(mx.abs() < 1e-12 && my.abs() < 1e-12, "{}: ({mx}, {my})", set.name());
}

/// Assert the second moment is isotropic: equal diagonal, zero off-diagonal.
pub fn assert_isotropic_second_moment(set: &VelocitySet) {
    let (mut xx, mut yy, mut xy) = (0.0, 0.0, 0.0);
    for (_, [cx, cy], w) in set.iter() {
        xx += w * (cx * cx) as f64;
        yy += w * (cy * cy) as f64;
        xy += w * (cx * cy) as f64;
    }
    assert!((xx - yy).abs() < 1e-12, "{}: xx={xx} yy={yy}", set.name());
    assert!(xy.abs() < 1e-12, "{}: xy={xy}", set.name());
}

/// Run every check.
pub fn run_full_compliance(set: &VelocitySet) {
    assert_opposite_involution(set);
    assert_opposite_reverses(set);
    assert_weights_normalised(set);
    assert_zero_first_moment(set);
    assert_isotropic_second_moment(set);
}
