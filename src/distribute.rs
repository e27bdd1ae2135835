//! Percentage-based task distribution.
//!
//! [`distribute`] maps `n` tasks onto the rows of a ledger. Each row gets
//! `round(percent / 100 * n)` tasks; rounding drift is then corrected by
//! walking the rows cyclically from the first one, so extra tasks land on
//! earlier rows and removed tasks come off earlier rows first. The result is
//! blocked by row: all of row 0's tasks, then all of row 1's, and so on.
//!
//! Rounding is `f64::round`, which rounds half away from zero. Shares are
//! never negative, so this is the same as rounding half up.

use crate::model::Assignment;

/// Per-row task counts for `n` tasks. Always sums to `n` for a non-empty ledger.
pub fn allocate_counts(ledger: &[Assignment], n: usize) -> Vec<usize> {
    if ledger.is_empty() || n == 0 {
        return Vec::new();
    }

    let total = n as f64;
    let mut counts: Vec<usize> = ledger
        .iter()
        .map(|a| (a.percent.value() / 100.0 * total).round() as usize)
        .collect();
    let mut sum: usize = counts.iter().sum();

    // One cursor shared by both corrections.
    let mut i = 0;
    while sum < n {
        counts[i] += 1;
        sum += 1;
        i = (i + 1) % counts.len();
    }
    while sum > n {
        if counts[i] > 0 {
            counts[i] -= 1;
            sum -= 1;
        }
        i = (i + 1) % counts.len();
    }

    counts
}

/// Ledger index for each of `n` tasks, blocked by row.
pub fn distribute(ledger: &[Assignment], n: usize) -> Vec<usize> {
    allocate_counts(ledger, n)
        .into_iter()
        .enumerate()
        .flat_map(|(idx, count)| std::iter::repeat_n(idx, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::equal_split;
    use crate::model::{Assignee, Percent, Role};

    fn ledger(percents: &[f64]) -> Vec<Assignment> {
        percents
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let who = Assignee::new(i as i64 + 1, format!("u{}", i + 1), Role::Annotator);
                Assignment::new(&who, Percent::new(*p).unwrap())
            })
            .collect()
    }

    fn equal_ledger(n: usize) -> Vec<Assignment> {
        let shares: Vec<f64> = equal_split(n).iter().map(Percent::value).collect();
        ledger(&shares)
    }

    fn is_blocked(dist: &[usize]) -> bool {
        dist.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_empty_inputs() {
        assert!(distribute(&[], 10).is_empty());
        assert!(distribute(&ledger(&[100.0]), 0).is_empty());
        assert!(allocate_counts(&[], 3).is_empty());
    }

    #[test]
    fn test_sixty_forty_over_five() {
        let l = ledger(&[60.0, 40.0]);
        assert_eq!(allocate_counts(&l, 5), vec![3, 2]);
        let ids: Vec<i64> = distribute(&l, 5)
            .into_iter()
            .map(|i| l[i].assignee_id)
            .collect();
        assert_eq!(ids, vec![1, 1, 1, 2, 2]);
    }

    #[test]
    fn test_surplus_goes_to_first_entry() {
        let l = ledger(&[33.33, 33.33, 33.34]);
        assert_eq!(allocate_counts(&l, 10), vec![4, 3, 3]);
        assert_eq!(distribute(&l, 10), vec![0, 0, 0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_small_shares_round_to_zero() {
        let l = ledger(&[90.0, 5.0, 5.0]);
        assert_eq!(allocate_counts(&l, 3), vec![3, 0, 0]);
        assert_eq!(distribute(&l, 3), vec![0, 0, 0]);
    }

    #[test]
    fn test_deficit_correction_skips_zero_counts() {
        // 0.5 rounds up for each row, so the sum overshoots by one
        let l = ledger(&[50.0, 50.0]);
        assert_eq!(allocate_counts(&l, 1), vec![0, 1]);

        let l = ledger(&[0.0, 50.0, 50.0]);
        assert_eq!(allocate_counts(&l, 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_fewer_tasks_than_assignees() {
        let l = equal_ledger(7);
        let counts = allocate_counts(&l, 2);
        assert_eq!(counts.iter().sum::<usize>(), 2);
        assert!(counts.iter().filter(|&&c| c == 0).count() >= 5);
    }

    #[test]
    fn test_zero_percent_ledger_still_covers_all_tasks() {
        let l = ledger(&[0.0, 0.0]);
        assert_eq!(allocate_counts(&l, 3), vec![2, 1]);
    }

    #[test]
    fn test_totals_indices_and_blocking() {
        for size in 1..=9 {
            let l = equal_ledger(size);
            for n in 0..=60 {
                let dist = distribute(&l, n);
                assert_eq!(dist.len(), n, "ledger {} tasks {}", size, n);
                assert!(dist.iter().all(|&i| i < size));
                assert!(is_blocked(&dist));
            }
        }

        let skewed = ledger(&[12.5, 0.0, 70.2, 17.3]);
        for n in 0..=100 {
            let dist = distribute(&skewed, n);
            assert_eq!(dist.len(), n);
            assert!(is_blocked(&dist));
        }
    }

    #[test]
    fn test_deterministic() {
        let l = ledger(&[33.3, 33.3, 33.4]);
        assert_eq!(distribute(&l, 17), distribute(&l, 17));
    }
}
