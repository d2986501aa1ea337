// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hand value types.
use holdem_cards::Card;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

use super::for_each_subset;

/// The hand rank category, higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// High card.
    HighCard = 0,
    /// One pair.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three of a kind.
    ThreeOfAKind,
    /// Straight.
    Straight,
    /// Flush.
    Flush,
    /// Full house.
    FullHouse,
    /// Four of a kind.
    FourOfAKind,
    /// Straight flush, including the ace high one.
    StraightFlush,
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pairs",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
        };

        write!(f, "{label}")
    }
}

/// The value of a hand.
///
/// Values compare by rank first and then by kickers element by element, the
/// cards in the hand don't take part in the comparison so two hands with the
/// same rank and kickers are a tie even if their suits differ.
#[derive(Debug, Clone)]
pub struct HandValue {
    rank: HandRank,
    kickers: Vec<u8>,
    hand: Vec<Card>,
}

impl HandValue {
    /// Size of the best hand.
    pub const HAND_SIZE: usize = 5;

    /// Evaluates a hand of 2 to 7 cards.
    ///
    /// Panics if the number of cards is outside the 2..=7 range, the cards must
    /// be unique.
    pub fn eval(cards: &[Card]) -> Self {
        assert!(
            (2..=7).contains(&cards.len()),
            "Invalid number of cards {}",
            cards.len()
        );

        if cards.len() < Self::HAND_SIZE {
            return Self::classify(cards);
        }

        let mut best: Option<HandValue> = None;
        for_each_subset(cards, Self::HAND_SIZE, |subset| {
            let value = Self::classify(subset);
            if best.as_ref().is_none_or(|b| value > *b) {
                best = Some(value);
            }
        });

        // There is at least one subset when there are 5 or more cards.
        best.unwrap_or_else(|| Self::classify(cards))
    }

    /// The hand rank category.
    pub fn rank(&self) -> HandRank {
        self.rank
    }

    /// The kicker values used to break ties within the same rank.
    pub fn kickers(&self) -> &[u8] {
        &self.kickers
    }

    /// The cards that make this hand sorted by significance.
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Classifies a hand of at most 5 cards.
    fn classify(cards: &[Card]) -> Self {
        let mut counts = [0u8; 15];
        for c in cards {
            counts[c.value() as usize] += 1;
        }

        // Groups sorted by count and then by value, both descending.
        let mut groups = (2..=14u8)
            .filter(|&v| counts[v as usize] > 0)
            .map(|v| (counts[v as usize], v))
            .collect::<Vec<_>>();
        groups.sort_by(|a, b| b.cmp(a));

        let is_flush = cards.len() == Self::HAND_SIZE
            && cards.iter().all(|c| c.suit() == cards[0].suit());
        let straight_high = if cards.len() == Self::HAND_SIZE {
            Self::straight_high(&groups)
        } else {
            None
        };

        let (rank, kickers) = match (straight_high, is_flush) {
            (Some(high), true) => (HandRank::StraightFlush, vec![high]),
            (Some(high), false) => (HandRank::Straight, vec![high]),
            _ => {
                let kickers = groups.iter().map(|&(_, v)| v).collect::<Vec<_>>();
                let rank = match (groups[0].0, groups.get(1).map(|g| g.0)) {
                    (4, _) => HandRank::FourOfAKind,
                    (3, Some(2)) => HandRank::FullHouse,
                    _ if is_flush => HandRank::Flush,
                    (3, _) => HandRank::ThreeOfAKind,
                    (2, Some(2)) => HandRank::TwoPair,
                    (2, _) => HandRank::OnePair,
                    _ => HandRank::HighCard,
                };
                (rank, kickers)
            }
        };

        // Sort cards by group significance so a UI can show the hand.
        let mut hand = cards.to_vec();
        let wheel = straight_high == Some(5);
        hand.sort_by(|a, b| {
            let key = |c: &Card| {
                let v = if wheel && c.value() == 14 { 1 } else { c.value() };
                (counts[c.value() as usize], v, c.suit())
            };
            key(b).cmp(&key(a))
        });

        Self {
            rank,
            kickers,
            hand,
        }
    }

    /// Returns the straight high card given 5 distinct values groups.
    fn straight_high(groups: &[(u8, u8)]) -> Option<u8> {
        if groups.len() != Self::HAND_SIZE {
            return None;
        }

        // With distinct values the groups are sorted by value descending.
        let values = groups.iter().map(|&(_, v)| v).collect::<Vec<_>>();
        if values[0] - values[4] == 4 {
            Some(values[0])
        } else if values == [14, 5, 4, 3, 2] {
            Some(5)
        } else {
            None
        }
    }
}

impl PartialEq for HandValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HandValue {}

impl PartialOrd for HandValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.kickers.cmp(&other.kickers))
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rank)?;
        for card in &self.hand {
            write!(f, " {card}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn eval(s: &str) -> HandValue {
        HandValue::eval(&cards(s))
    }

    #[test]
    fn categories() {
        let hands = [
            ("As Jd 9c 6h 3s", HandRank::HighCard),
            ("As Ad 9c 6h 3s", HandRank::OnePair),
            ("As Ad 9c 9h 3s", HandRank::TwoPair),
            ("As Ad Ac 6h 3s", HandRank::ThreeOfAKind),
            ("9s Td Jc Qh Ks", HandRank::Straight),
            ("As Js 9s 6s 3s", HandRank::Flush),
            ("As Ad Ac 6h 6s", HandRank::FullHouse),
            ("As Ad Ac Ah 3s", HandRank::FourOfAKind),
            ("5h 6h 7h 8h 9h", HandRank::StraightFlush),
        ];

        for (hand, rank) in hands {
            assert_eq!(eval(hand).rank(), rank, "{hand}");
        }

        // Each category beats the previous one.
        for w in hands.windows(2) {
            assert!(eval(w[1].0) > eval(w[0].0), "{} > {}", w[1].0, w[0].0);
        }
    }

    #[test]
    fn low_category_never_beats_higher() {
        // Lowest four of a kind against highest full house.
        assert!(eval("2s 2d 2c 2h 3s") > eval("As Ad Ac Kh Ks"));
        // Lowest full house against highest flush.
        assert!(eval("2s 2d 2c 3h 3s") > eval("Ah Kh Qh Jh 9h"));
        // Lowest flush against highest straight.
        assert!(eval("2s 3s 4s 5s 7s") > eval("Ts Jd Qc Kh As"));
    }

    #[test]
    fn wheel() {
        let v = eval("As 2h 3d 4c 5s");
        assert_eq!(v.rank(), HandRank::Straight);
        assert_eq!(v.kickers(), &[5]);
        assert_eq!(v.hand()[0].value(), 5);

        // A six high straight beats the wheel.
        assert!(eval("2h 3d 4c 5s 6s") > v);

        // Wheel straight flush.
        let v = eval("Ad 2d 3d 4d 5d");
        assert_eq!(v.rank(), HandRank::StraightFlush);
        assert_eq!(v.kickers(), &[5]);

        // Not a straight.
        assert_eq!(eval("Qs Kh Ad 2c 3s").rank(), HandRank::HighCard);
    }

    #[test]
    fn royal_is_highest_straight_flush() {
        let royal = eval("Ts Js Qs Ks As");
        assert_eq!(royal.rank(), HandRank::StraightFlush);
        assert_eq!(royal.kickers(), &[14]);

        let nine_high = eval("5h 6h 7h 8h 9h");
        assert_eq!(nine_high.rank(), HandRank::StraightFlush);
        assert_eq!(nine_high.kickers(), &[9]);
        assert!(royal > nine_high);

        let king_high = eval("9c Tc Jc Qc Kc");
        assert!(royal > king_high);
        assert!(king_high > nine_high);
    }

    #[test]
    fn kickers() {
        // Pair of aces with better kickers.
        assert!(eval("As Ad Kc 6h 3s") > eval("Ah Ac Qc 6d 3d"));
        assert_eq!(eval("As Ad Kc 6h 3s").kickers(), &[14, 13, 6, 3]);

        // Two pair compares high pair, low pair, then kicker.
        assert!(eval("Ks Kd 3c 3h 2s") > eval("Qs Qd Jc Jh As"));
        assert!(eval("Ks Kd 4c 4h 2s") > eval("Kh Kc 3c 3s As"));
        assert!(eval("Ks Kd 4c 4h 5s") > eval("Kh Kc 4d 4s 2s"));

        // Full house compares trips first.
        assert!(eval("3s 3d 3c 2h 2s") > eval("2d 2c 2h As Ad"));
        assert_eq!(eval("3s 3d 3c 2h 2s").kickers(), &[3, 2]);

        // Flush compares all cards.
        assert!(eval("As Js 9s 6s 3s") > eval("Ah Jh 9h 6h 2h"));
    }

    #[test]
    fn ties() {
        let v1 = eval("As Kd 9c 6h 3s");
        let v2 = eval("Ad Ks 9h 6c 3c");
        assert_eq!(v1, v2);
        assert_eq!(v1.cmp(&v2), Ordering::Equal);

        // Same board plays for both players.
        let v1 = eval("2c 3d Ts Js Qs Ks As");
        let v2 = eval("4c 5d Ts Js Qs Ks As");
        assert_eq!(v1, v2);
    }

    #[test]
    fn best_of_seven() {
        // Board straight, hole cards make a flush.
        let v = eval("7h 9h 5h 6h 8h Kc 2d");
        assert_eq!(v.rank(), HandRank::StraightFlush);
        assert_eq!(v.kickers(), &[9]);

        let v = eval("Ah Kh 5c 6h 8d 9h 2h");
        assert_eq!(v.rank(), HandRank::Flush);
        assert_eq!(v.kickers(), &[14, 13, 9, 6, 2]);
        assert_eq!(v.hand().len(), HandValue::HAND_SIZE);

        // Two trips make a full house.
        let v = eval("As Ad Ac Kh Ks Kd 2c");
        assert_eq!(v.rank(), HandRank::FullHouse);
        assert_eq!(v.kickers(), &[14, 13]);

        // Three pairs use the best two with the best kicker.
        let v = eval("As Ad Kc Kh 2s 2d Qc");
        assert_eq!(v.rank(), HandRank::TwoPair);
        assert_eq!(v.kickers(), &[14, 13, 12]);

        // Six cards.
        let v = eval("Ts Jd Qc Kh As 2c");
        assert_eq!(v.rank(), HandRank::Straight);
        assert_eq!(v.kickers(), &[14]);
    }

    #[test]
    fn fewer_than_five_cards() {
        let v = eval("As Ad");
        assert_eq!(v.rank(), HandRank::OnePair);
        assert_eq!(v.kickers(), &[14]);

        let v = eval("As Kd");
        assert_eq!(v.rank(), HandRank::HighCard);
        assert!(eval("As Ad") > v);

        let v = eval("9s 9d 9c 9h");
        assert_eq!(v.rank(), HandRank::FourOfAKind);

        // Four suited connected cards are not a straight or flush.
        assert_eq!(eval("9s Ts Js Qs").rank(), HandRank::HighCard);
    }

    #[test]
    fn permutation_invariant() {
        let mut rng = StdRng::seed_from_u64(19);
        let hands = [
            "2h 7h 5c 6h 8d 9h 3h",
            "As Ad Ac Kh Ks Kd 2c",
            "As 2h 3d 4c 5s Kd Kc",
            "Ts Js Qs Ks As 9s 8s",
            "2c 5d 9h Jc Kd",
            "As Kd 7c",
        ];

        for hand in hands {
            let mut cards = cards(hand);
            let expected = HandValue::eval(&cards);

            for _ in 0..20 {
                cards.shuffle(&mut rng);
                let v = HandValue::eval(&cards);
                assert_eq!(v, expected, "{hand}");
                assert_eq!(v.kickers(), expected.kickers());
            }
        }
    }

    #[test]
    #[should_panic]
    fn too_many_cards() {
        eval("2c 3c 4c 5c 6c 7c 8c 9c");
    }
}
