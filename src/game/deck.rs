use log::debug;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::cards::{Card, CardId, standard_deck_cards};
use super::state::GameError;

/// Draw pile plus discard pile. The top of the pile is the end of the vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardDeck {
    pile: Vec<Card>,
    discard_pile: Vec<Card>,
}

impl CardDeck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            pile: cards,
            discard_pile: Vec::new(),
        }
    }

    pub fn standard(rng: &mut impl rand::Rng) -> Self {
        let mut deck = Self::new(standard_deck_cards());
        deck.shuffle(rng);
        deck
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        self.pile.shuffle(rng);
    }

    /// Moves the discard pile under the draw pile and shuffles everything.
    pub fn reshuffle(&mut self, rng: &mut impl rand::Rng) -> Result<(), GameError> {
        if self.discard_pile.is_empty() {
            return Err(GameError::EmptyDiscard);
        }
        debug!(
            "reshuffling {} discarded cards into the pile",
            self.discard_pile.len()
        );
        self.pile.append(&mut self.discard_pile);
        self.shuffle(rng);
        Ok(())
    }

    pub fn draw(&mut self, count: usize, rng: &mut impl rand::Rng) -> Result<Vec<Card>, GameError> {
        let available = self.available();
        if count > available {
            return Err(GameError::CannotDraw {
                requested: count,
                available,
            });
        }
        let mut drawn = Vec::with_capacity(count);
        while drawn.len() < count {
            match self.pile.pop() {
                Some(card) => drawn.push(card),
                None => self.reshuffle(rng)?,
            }
        }
        Ok(drawn)
    }

    /// Draws as many as possible up to `count`.
    pub fn draw_up_to(&mut self, count: usize, rng: &mut impl rand::Rng) -> Vec<Card> {
        let count = count.min(self.available());
        self.draw(count, rng).unwrap_or_default()
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    pub fn discard_all(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.discard_pile.extend(cards);
    }

    /// Pulls a specific card out of the pile or discard pile.
    pub fn take(&mut self, id: CardId) -> Option<Card> {
        if let Some(index) = self.pile.iter().position(|c| c.id == id) {
            return Some(self.pile.remove(index));
        }
        let index = self.discard_pile.iter().position(|c| c.id == id)?;
        Some(self.discard_pile.remove(index))
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.pile.iter().chain(&self.discard_pile).any(|c| c.id == id)
    }

    pub fn size(&self) -> usize {
        self.pile.len()
    }

    pub fn discard_size(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn available(&self) -> usize {
        self.pile.len() + self.discard_pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pile.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cones(n: u32) -> Vec<Card> {
        (1..=n).map(|id| Card::energy(id, 1, "Cone")).collect()
    }

    #[test]
    fn draw_takes_from_the_top() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut deck = CardDeck::new(cones(5));
        let drawn = deck.draw(2, &mut rng).unwrap();
        assert_eq!(drawn.iter().map(|c| c.id).collect::<Vec<_>>(), vec![5, 4]);
        assert_eq!(deck.size(), 3);
    }

    #[test]
    fn draw_zero_is_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut deck = CardDeck::new(Vec::new());
        assert!(deck.draw(0, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn reshuffle_needs_discards() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut deck = CardDeck::new(cones(2));
        assert!(matches!(deck.reshuffle(&mut rng), Err(GameError::EmptyDiscard)));
    }

    #[test]
    fn take_finds_discarded_cards() {
        let mut deck = CardDeck::new(cones(3));
        let card = deck.take(2).unwrap();
        deck.discard(card);
        assert!(deck.contains(2));
        assert_eq!(deck.take(2).map(|c| c.id), Some(2));
        assert!(!deck.contains(2));
        assert!(deck.take(42).is_none());
    }
}
