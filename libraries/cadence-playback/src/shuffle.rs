//! Shuffle order generation
//!
//! A shuffle order is a permutation of playlist indices. The playlist
//! itself is never reordered; advancement walks the permutation instead.

use rand::Rng;

/// Uniform random permutation of `[0, n)`
///
/// Fisher-Yates, scanning from the last index down to 1 and swapping with
/// a uniformly chosen index in `[0, i]`. Every permutation is equally
/// likely given a uniform `rng`.
pub fn generate_shuffled_order<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }
    order
}

/// [`generate_shuffled_order`] with the thread RNG
pub fn shuffled_order(n: usize) -> Vec<usize> {
    generate_shuffled_order(n, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn is_permutation(order: &[usize], n: usize) -> bool {
        let unique: HashSet<_> = order.iter().copied().collect();
        order.len() == n && unique.len() == n && order.iter().all(|&i| i < n)
    }

    #[test]
    fn empty_and_single() {
        assert!(shuffled_order(0).is_empty());
        assert_eq!(shuffled_order(1), vec![0]);
    }

    #[test]
    fn produces_permutations() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..40 {
            let order = generate_shuffled_order(n, &mut rng);
            assert!(is_permutation(&order, n), "not a permutation: {order:?}");
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = generate_shuffled_order(20, &mut StdRng::seed_from_u64(42));
        let b = generate_shuffled_order(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn every_permutation_of_three_appears() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: HashSet<Vec<usize>> = (0..600)
            .map(|_| generate_shuffled_order(3, &mut rng))
            .collect();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn first_position_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0u32; 4];
        for _ in 0..4000 {
            counts[generate_shuffled_order(4, &mut rng)[0]] += 1;
        }
        // Expected 1000 each
        assert!(counts.iter().all(|&c| (800..1200).contains(&c)), "{counts:?}");
    }
}
