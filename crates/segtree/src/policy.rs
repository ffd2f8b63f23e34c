/// Combining operation of a tree, fixed per instantiation.
///
/// `combine` must be associative and commutative with `identity` as its unit.
/// `apply` adds `delta` to every one of the `len` leaves summarized by
/// `aggregate`, and must distribute over `combine`:
/// `apply(combine(a, b), d, la + lb) = combine(apply(a, d, la), apply(b, d, lb))`.
pub trait Aggregate {
    fn identity() -> i64;
    fn combine(a: i64, b: i64) -> i64;
    fn apply(aggregate: i64, delta: i64, len: usize) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Min;

impl Aggregate for Min {
    fn identity() -> i64 {
        i64::MAX
    }

    #[inline(always)]
    fn combine(a: i64, b: i64) -> i64 {
        a.min(b)
    }

    #[inline(always)]
    fn apply(aggregate: i64, delta: i64, _len: usize) -> i64 {
        aggregate + delta
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Max;

impl Aggregate for Max {
    fn identity() -> i64 {
        i64::MIN
    }

    #[inline(always)]
    fn combine(a: i64, b: i64) -> i64 {
        a.max(b)
    }

    #[inline(always)]
    fn apply(aggregate: i64, delta: i64, _len: usize) -> i64 {
        aggregate + delta
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sum;

impl Aggregate for Sum {
    fn identity() -> i64 {
        0
    }

    #[inline(always)]
    fn combine(a: i64, b: i64) -> i64 {
        a + b
    }

    #[inline(always)]
    fn apply(aggregate: i64, delta: i64, len: usize) -> i64 {
        aggregate + delta * len as i64
    }
}

#[cfg(test)]
mod tests {
    use super::{Aggregate, Max, Min, Sum};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn apply_naive<P: Aggregate>(xs: &[i64], delta: i64) -> i64 {
        xs.iter()
            .map(|&x| x + delta)
            .fold(P::identity(), P::combine)
    }

    fn check_policy<P: Aggregate>(rng: &mut StdRng) {
        for len in 1..=10 {
            let xs = (0..len)
                .map(|_| rng.random_range(-50_i64..=50))
                .collect::<Vec<_>>();
            let agg = xs.iter().copied().fold(P::identity(), P::combine);
            for _ in 0..50 {
                let delta = rng.random_range(-20_i64..=20);
                assert_eq!(P::apply(agg, delta, len), apply_naive::<P>(&xs, delta));
            }
        }
    }

    #[test]
    fn apply_matches_naive_for_every_policy() {
        let mut rng = StdRng::seed_from_u64(0xBADC0FFE_u64);
        check_policy::<Min>(&mut rng);
        check_policy::<Max>(&mut rng);
        check_policy::<Sum>(&mut rng);
    }

    #[test]
    fn identity_is_neutral() {
        for x in [-7_i64, 0, 3, i64::MIN + 1, i64::MAX - 1] {
            assert_eq!(Min::combine(Min::identity(), x), x);
            assert_eq!(Max::combine(x, Max::identity()), x);
            assert_eq!(Sum::combine(Sum::identity(), x), x);
        }
    }
}
