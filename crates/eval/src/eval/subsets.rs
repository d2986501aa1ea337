// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! K-subsets enumeration.
use holdem_cards::Card;

/// Calls the `f` closure for each k-cards subset of `cards`.
///
/// Subsets are generated in lexicographic order of their indices, with the
/// cards of each subset in the same order they appear in `cards`. If `k` is
/// greater than the number of cards `f` is never called, for `k == 0` it is
/// called once with an empty slice.
pub fn for_each_subset<F>(cards: &[Card], k: usize, mut f: F)
where
    F: FnMut(&[Card]),
{
    let n = cards.len();
    if k > n {
        return;
    }

    let mut idx = (0..k).collect::<Vec<_>>();
    let mut subset = Vec::with_capacity(k);

    loop {
        subset.clear();
        subset.extend(idx.iter().map(|&i| cards[i]));
        f(&subset);

        // Find the rightmost index that can still move right.
        let Some(pos) = (0..k).rev().find(|&i| idx[i] < n - k + i) else {
            break;
        };

        idx[pos] += 1;
        for i in pos + 1..k {
            idx[i] = idx[i - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_cards::Deck;

    fn count(n: usize, k: usize) -> usize {
        let cards = Deck::default().into_iter().take(n).collect::<Vec<_>>();
        let mut count = 0;
        for_each_subset(&cards, k, |s| {
            assert_eq!(s.len(), k);
            count += 1;
        });
        count
    }

    #[test]
    fn subsets_count() {
        assert_eq!(count(7, 5), 21);
        assert_eq!(count(6, 5), 6);
        assert_eq!(count(5, 5), 1);
        assert_eq!(count(4, 5), 0);
        assert_eq!(count(7, 0), 1);
        assert_eq!(count(52, 2), 1_326);
        assert_eq!(count(52, 3), 22_100);
    }

    #[test]
    fn subsets_are_distinct_and_ordered() {
        let cards = Deck::default().into_iter().take(7).collect::<Vec<_>>();
        let mut seen = Vec::new();

        for_each_subset(&cards, 5, |s| {
            let positions = s
                .iter()
                .map(|c| cards.iter().position(|x| x == c).unwrap())
                .collect::<Vec<_>>();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
            assert!(!seen.contains(&positions));
            seen.push(positions);
        });

        assert_eq!(seen.first().unwrap(), &[0, 1, 2, 3, 4]);
        assert_eq!(seen.last().unwrap(), &[2, 3, 4, 5, 6]);
    }
}
