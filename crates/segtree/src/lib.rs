//! Segment trees over a fixed-length `i64` sequence.
//!
//! - Ranges are half-open `[l, r)` and accept any `RangeBounds<usize>`.
//! - The combining operation (`Min`, `Max` or `Sum`) is a type parameter.
//! - Empty ranges and anything outside `[0, len)` fail with
//!   [`Error::OutOfRange`].

mod arena;
mod error;
mod lazy_segment_tree;
mod policy;
mod segment_tree;

pub use error::{Error, Result};
pub use lazy_segment_tree::LazySegmentTree;
pub use policy::{Aggregate, Max, Min, Sum};
pub use segment_tree::SegmentTree;

#[cfg(test)]
mod tests {
    use super::{Aggregate, LazySegmentTree, Max, Min, SegmentTree, Sum};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Point assignment on the plain tree and `add` of the difference on the
    // lazy tree must stay indistinguishable.
    fn point_updates_agree<P: Aggregate>(seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for n in 1..48 {
            let values = (0..n)
                .map(|_| rng.random_range(-500_i64..=500))
                .collect::<Vec<_>>();
            let mut plain = SegmentTree::<P>::new(&values);
            let mut lazy = LazySegmentTree::<P>::new(&values);

            for _ in 0..300 {
                let pos = rng.random_range(0..n);
                let value = rng.random_range(-500_i64..=500);
                let old = plain.get(pos).unwrap();
                plain.set(pos, value).unwrap();
                lazy.add(pos..=pos, value - old).unwrap();

                let l = rng.random_range(0..n);
                let r = rng.random_range((l + 1)..=n);
                assert_eq!(plain.query(l..r), lazy.query(l..r), "n={n} l={l} r={r}");
            }
            assert_eq!(plain.fold_all(), lazy.fold_all());
            assert_eq!(plain.to_vec(), lazy.to_vec());
        }
    }

    #[test]
    fn point_update_is_a_unit_range_add() {
        point_updates_agree::<Min>(0x5EED_2026);
        point_updates_agree::<Max>(0xBADC0FFE);
        point_updates_agree::<Sum>(0xC0FFEE);
    }

    // Assignments far from the current value must not go through a
    // difference, which would overflow.
    fn extreme_assignments_agree<P: Aggregate>() {
        let mut values = vec![-10, 0, 7, 3, -4, 12];
        let n = values.len();
        let mut lazy = LazySegmentTree::<P>::new(&values);
        lazy.add(1..5, 5).unwrap();
        lazy.add(.., -2).unwrap();
        for value in &mut values[1..5] {
            *value += 5;
        }
        for value in &mut values {
            *value -= 2;
        }

        let assignments = [
            (0, i64::MAX),
            (3, i64::MIN),
            (5, i64::MIN),
            (0, i64::MIN),
        ];
        for (pos, value) in assignments {
            values[pos] = value;
            lazy.set(pos, value).unwrap();
            let mut plain = SegmentTree::<P>::new(&values);
            plain.set(pos, value).unwrap();

            assert_eq!(lazy.get(pos), Ok(value));
            for l in 0..n {
                for r in (l + 1)..=n {
                    assert_eq!(
                        lazy.query(l..r),
                        plain.query(l..r),
                        "pos={pos} l={l} r={r}"
                    );
                }
            }
        }
        assert_eq!(lazy.to_vec(), values);
    }

    #[test]
    fn extreme_assignments_match_plain_tree() {
        extreme_assignments_agree::<Min>();
        extreme_assignments_agree::<Max>();
    }

    #[test]
    fn trees_are_independent() {
        let mut a = SegmentTree::<Sum>::new(&[1, 2, 3]);
        let b = SegmentTree::<Sum>::new(&[10, 20, 30, 40]);
        let c = a.clone();
        a.set(0, 100).unwrap();
        assert_eq!(a.query(..), Ok(105));
        assert_eq!(b.query(..), Ok(100));
        assert_eq!(c.query(..), Ok(6));
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn single_element() {
        let mut plain = SegmentTree::<Max>::new(&[42]);
        let mut lazy = LazySegmentTree::<Max>::new(&[42]);
        assert_eq!(plain.query(..), Ok(42));
        lazy.add(0..1, -2).unwrap();
        assert_eq!(lazy.query(0..=0), Ok(40));
        plain.set(0, 7).unwrap();
        assert_eq!(plain.get(0), Ok(7));
        assert!(plain.query(0..2).is_err());
        assert!(lazy.query(1..1).is_err());
    }
}
