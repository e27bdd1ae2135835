use crate::model::{Assignee, Assignment, Percent};

/// Splits 100% across `n` entries in tenths of a percent.
///
/// Every entry gets `floor(1000 / n) / 10`; the last one also absorbs the
/// remainder so the shares add up to 100.
pub fn equal_split(n: usize) -> Vec<Percent> {
    if n == 0 {
        return Vec::new();
    }

    let count = n as f64;
    let base = (1000.0 / count).floor() / 10.0;
    // f64::round rounds half away from zero.
    let remainder = ((100.0 - base * count) * 10.0).round() / 10.0;

    (0..n)
        .map(|i| {
            if i == n - 1 {
                Percent::clamped(base + remainder)
            } else {
                Percent::clamped(base)
            }
        })
        .collect()
}

/// Turns the current selection into ledger rows with an equal split.
///
/// ETAs carry over from `previous` for assignees that were already there.
pub fn build_assignments(selected: &[Assignee], previous: &[Assignment]) -> Vec<Assignment> {
    selected
        .iter()
        .zip(equal_split(selected.len()))
        .map(|(assignee, percent)| {
            let eta = previous
                .iter()
                .find(|a| a.assignee_id == assignee.id)
                .and_then(|a| a.eta_days);
            Assignment::new(assignee, percent).with_eta(eta)
        })
        .collect()
}

/// Re-runs the equal split over existing rows, keeping names and ETAs.
pub fn reequalize(entries: &mut [Assignment]) {
    let split = equal_split(entries.len());
    for (entry, percent) in entries.iter_mut().zip(split) {
        entry.percent = percent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn sum(split: &[Percent]) -> f64 {
        split.iter().map(Percent::value).sum()
    }

    #[test]
    fn test_equal_split_empty() {
        assert!(equal_split(0).is_empty());
    }

    #[test]
    fn test_equal_split_sums_to_hundred() {
        for n in 1..=250 {
            let split = equal_split(n);
            assert_eq!(split.len(), n);
            assert!((sum(&split) - 100.0).abs() < 1e-9, "n = {} sums to {}", n, sum(&split));
        }
    }

    #[test]
    fn test_equal_split_three() {
        let split: Vec<f64> = equal_split(3).iter().map(Percent::value).collect();
        assert_eq!(split[0], 33.3);
        assert_eq!(split[1], 33.3);
        assert!((split[2] - 33.4).abs() < 1e-9);
    }

    #[test]
    fn test_equal_split_more_than_thousand() {
        // base rounds down to 0.0, so the last entry takes everything
        let split = equal_split(1500);
        assert_eq!(split[0].value(), 0.0);
        assert!((split[1499].value() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_assignments_keeps_known_eta() {
        let a = Assignee::new(1, "Ann", Role::Annotator);
        let b = Assignee::new(2, "Bob", Role::Annotator);
        let previous = vec![Assignment::new(&a, Percent::clamped(100.0)).with_eta(Some(3.0))];

        let rows = build_assignments(&[a, b], &previous);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].eta_days, Some(3.0));
        assert_eq!(rows[1].eta_days, None);
        assert_eq!(rows[0].percent.value(), 50.0);
        assert_eq!(rows[1].percent.value(), 50.0);
    }

    #[test]
    fn test_reequalize_overwrites_manual_percents() {
        let people: Vec<Assignee> = (1..=4)
            .map(|i| Assignee::new(i, format!("user {}", i), Role::Reviewer))
            .collect();
        let mut rows: Vec<Assignment> = people
            .iter()
            .map(|p| Assignment::new(p, Percent::clamped(70.0)).with_eta(Some(1.5)))
            .collect();

        reequalize(&mut rows);

        assert!(rows.iter().all(|r| r.percent.value() == 25.0));
        assert!(rows.iter().all(|r| r.eta_days == Some(1.5)));
        assert_eq!(rows[3].name, "user 4");
    }
}
