// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions.
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A Poker card.
///
/// Cards compare equal when both rank and suit are equal, the derived ordering
/// sorts by rank first so that sorted cards read naturally in a hand.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Create a card given a rank and suit.
    pub const fn new(rank: Rank, suit: Suit) -> Card {
        Self { rank, suit }
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Returns the rank value in the 2..=14 range.
    #[inline]
    pub fn value(&self) -> u8 {
        self.rank.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.rank, self.suit)
    }
}

/// Error returned when parsing a card from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card '{0}'")]
pub struct ParseCardError(String);

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses cards like `AS`, `Th`, `10♠` or `2♦`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCardError(s.to_string());

        let s = s.trim();
        let suit_char = s.chars().last().ok_or_else(err)?;
        let rank_str = &s[..s.len() - suit_char.len_utf8()];

        let rank = match rank_str.to_ascii_uppercase().as_str() {
            "2" => Rank::Deuce,
            "3" => Rank::Trey,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            _ => return Err(err()),
        };

        let suit = match suit_char {
            'c' | 'C' | '♣' => Suit::Clubs,
            'd' | 'D' | '♦' => Suit::Diamonds,
            'h' | 'H' | '♥' => Suit::Hearts,
            's' | 'S' | '♠' => Suit::Spades,
            _ => return Err(err()),
        };

        Ok(Card::new(rank, suit))
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Deuce
    Deuce = 2,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// Returns all ranks.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace,
        ]
        .into_iter()
    }

    /// The rank ordinal, 2 for a deuce up to 14 for an ace.
    #[inline]
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit.
    Clubs,
    /// Diamonds suit.
    Diamonds,
    /// Hearts suit.
    Hearts,
    /// Spades suit.
    Spades,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        };

        write!(f, "{suit}")
    }
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }
}

/// Error returned when drawing more cards than there are left in a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient cards: requested {requested} with {remaining} left in the deck")]
pub struct InsufficientCards {
    /// Number of cards requested.
    pub requested: usize,
    /// Number of cards left in the deck.
    pub remaining: usize,
}

/// A cards Deck.
///
/// Cards are dealt from the front of the deck, a deck never grows back so the
/// number of cards left only decreases.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// The number of cards in the deck.
    pub const SIZE: usize = 52;

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.cards.shuffle(rng);
        deck
    }

    /// Removes and returns the first `n` cards.
    ///
    /// The deck is left unchanged if there are fewer than `n` cards left.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, InsufficientCards> {
        let remaining = self.count();
        if n > remaining {
            return Err(InsufficientCards {
                requested: n,
                remaining,
            });
        }

        let cards = self.cards[self.next..self.next + n].to_vec();
        self.next += n;
        Ok(cards)
    }

    /// Deals a single card from the front of the deck.
    pub fn deal(&mut self) -> Result<Card, InsufficientCards> {
        self.draw(1).map(|cards| cards[0])
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len() - self.next
    }

    /// Returns an iterator over the cards left in the deck in dealing order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards[self.next..].iter()
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| Rank::ranks().map(move |r| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards, next: 0 }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::iter::Skip<std::vec::IntoIter<Card>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter().skip(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::HashSet;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn shuffled_deck_is_unique() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let deck = Deck::new_and_shuffled(&mut rng);
            assert_eq!(deck.count(), Deck::SIZE);

            let cards = deck.into_iter().collect::<HashSet<_>>();
            assert_eq!(cards.len(), Deck::SIZE);
        }
    }

    #[test]
    fn shuffle_changes_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let d1 = Deck::new_and_shuffled(&mut rng).into_iter().collect::<Vec<_>>();
        let d2 = Deck::new_and_shuffled(&mut rng).into_iter().collect::<Vec<_>>();
        assert_ne!(d1, d2);
    }

    #[test]
    fn draw_from_front() {
        let mut deck = Deck::new_and_shuffled(&mut StdRng::seed_from_u64(1));
        let expected = deck.iter().take(5).copied().collect::<Vec<_>>();

        let cards = deck.draw(5).unwrap();
        assert_eq!(cards, expected);
        assert_eq!(deck.count(), Deck::SIZE - 5);
        assert!(deck.iter().all(|c| !cards.contains(c)));
    }

    #[test]
    fn draw_split_is_same_as_single_draw() {
        for (n, m) in [(0, 3), (2, 3), (7, 11), (26, 26)] {
            let mut d1 = Deck::new_and_shuffled(&mut StdRng::seed_from_u64(42));
            let mut d2 = d1.clone();

            let mut split = d1.draw(n).unwrap();
            split.extend(d1.draw(m).unwrap());

            let single = d2.draw(n + m).unwrap();
            assert_eq!(split, single);
            assert_eq!(d1.count(), d2.count());
        }
    }

    #[test]
    fn draw_too_many() {
        let mut deck = Deck::default();
        deck.draw(50).unwrap();

        let err = deck.draw(3).unwrap_err();
        assert_eq!(
            err,
            InsufficientCards {
                requested: 3,
                remaining: 2
            }
        );

        // A failed draw leaves the deck as it was.
        assert_eq!(deck.count(), 2);
        assert_eq!(deck.draw(2).unwrap().len(), 2);
        assert!(deck.is_empty());
        assert!(deck.deal().is_err());
    }

    #[test]
    fn card_to_string() {
        let c = Card::new(Rank::King, Suit::Diamonds);
        assert_eq!(c.to_string(), "K♦");

        let c = Card::new(Rank::Five, Suit::Spades);
        assert_eq!(c.to_string(), "5♠");

        let c = Card::new(Rank::Ten, Suit::Hearts);
        assert_eq!(c.to_string(), "T♥");

        let c = Card::new(Rank::Ace, Suit::Clubs);
        assert_eq!(c.to_string(), "A♣");
    }

    #[test]
    fn card_from_str() {
        assert_eq!("AS".parse(), Ok(Card::new(Rank::Ace, Suit::Spades)));
        assert_eq!("th".parse(), Ok(Card::new(Rank::Ten, Suit::Hearts)));
        assert_eq!("10♠".parse(), Ok(Card::new(Rank::Ten, Suit::Spades)));
        assert_eq!("2♦".parse(), Ok(Card::new(Rank::Deuce, Suit::Diamonds)));
        assert_eq!("Jc".parse(), Ok(Card::new(Rank::Jack, Suit::Clubs)));

        assert!("".parse::<Card>().is_err());
        assert!("1S".parse::<Card>().is_err());
        assert!("AX".parse::<Card>().is_err());

        // Display output parses back.
        for card in Deck::default() {
            assert_eq!(card.to_string().parse(), Ok(card));
        }
    }

    #[test]
    fn rank_values() {
        let values = Rank::ranks().map(|r| r.value()).collect::<Vec<_>>();
        assert_eq!(values, (2..=14).collect::<Vec<_>>());
    }
}
