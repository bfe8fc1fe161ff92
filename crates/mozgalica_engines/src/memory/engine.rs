//! Flip, compare and count: the memory game state machine.

use super::card::{Card, ICON_POOL};
use crate::Difficulty;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

/// Base score before the per-move penalty.
const BASE_SCORE: u32 = 500;

/// Points lost per move.
const MOVE_PENALTY: u32 = 10;

/// Where the game currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryPhase {
    /// No grid dealt yet.
    SelectingDifficulty,
    /// Waiting for a flip.
    Idle,
    /// Two unequal cards are face up; flips are locked until
    /// [`MemoryEngine::resolve_mismatch`] turns them back.
    EvaluatingPair,
    /// Every card matched.
    Won,
}

/// What a successful flip did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipOutcome {
    /// First card of a pair turned up.
    Revealed,
    /// Second card matched the first.
    Matched,
    /// Second card differs; the pair stays visible until resolved.
    Mismatched,
    /// Second card matched and no face-down cards remain.
    Won,
}

/// Reasons a flip is refused. A refused flip never changes the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FlipError {
    /// No game is being played.
    #[display("No game in progress")]
    NotPlaying,

    /// A mismatched pair is still showing.
    #[display("Board is locked while a pair is evaluated")]
    Processing,

    /// No card has that id.
    #[display("No card with id {}", _0)]
    UnknownCard(usize),

    /// The card is already face up.
    #[display("Card {} is already face up", _0)]
    AlreadyFlipped(usize),

    /// The card's pair was already found.
    #[display("Card {} is already matched", _0)]
    AlreadyMatched(usize),
}

impl std::error::Error for FlipError {}

/// Which move count the final score is computed from.
///
/// The move counter ticks as soon as a second card is turned, so the pair that
/// finishes the game has already been counted when the score is taken. The
/// score can either ignore that closing pair or include it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScoredMoves {
    /// Moves made before the closing pair (`moves - 1`).
    #[default]
    BeforeClosingPair,
    /// Every move, the closing pair included.
    IncludingClosingPair,
}

/// Memory game engine.
#[derive(Debug, Clone)]
pub struct MemoryEngine<R = StdRng> {
    cards: Vec<Card>,
    pending: Vec<usize>,
    moves: u32,
    phase: MemoryPhase,
    difficulty: Option<Difficulty>,
    scored_moves: ScoredMoves,
    rng: R,
}

impl MemoryEngine<StdRng> {
    /// Creates an engine seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(rand::SeedableRng::from_entropy())
    }
}

impl<R: Rng> MemoryEngine<R> {
    /// Creates an engine waiting for a difficulty.
    pub fn new(rng: R) -> Self {
        Self {
            cards: Vec::new(),
            pending: Vec::new(),
            moves: 0,
            phase: MemoryPhase::SelectingDifficulty,
            difficulty: None,
            scored_moves: ScoredMoves::default(),
            rng,
        }
    }

    /// Chooses which move count [`MemoryEngine::final_score`] uses.
    pub fn with_scored_moves(mut self, scored_moves: ScoredMoves) -> Self {
        self.scored_moves = scored_moves;
        self
    }

    /// Cards in grid order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Moves made so far (one per pair of cards turned).
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Returns the current phase.
    pub fn phase(&self) -> MemoryPhase {
        self.phase
    }

    /// Returns the selected difficulty.
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Ids of face-up cards not yet matched.
    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    /// Deals a shuffled grid for the difficulty and zeroes the counters.
    #[instrument(skip(self))]
    pub fn setup(&mut self, difficulty: Difficulty) {
        let pairs = difficulty.memory_pairs();
        let mut symbols: Vec<&'static str> = ICON_POOL[..pairs]
            .iter()
            .chain(ICON_POOL[..pairs].iter())
            .copied()
            .collect();
        symbols.shuffle(&mut self.rng);

        self.cards = symbols
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| Card::new(id, symbol))
            .collect();
        self.pending.clear();
        self.moves = 0;
        self.difficulty = Some(difficulty);
        self.phase = MemoryPhase::Idle;

        info!(?difficulty, cards = self.cards.len(), "Memory grid dealt");
    }

    /// Deals a new grid at the same difficulty. Does nothing before the first setup.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        if let Some(difficulty) = self.difficulty {
            self.setup(difficulty);
        }
    }

    /// Discards the grid and goes back to difficulty selection.
    #[instrument(skip(self))]
    pub fn return_to_menu(&mut self) {
        debug!("Returning to difficulty selection");
        self.cards.clear();
        self.pending.clear();
        self.moves = 0;
        self.difficulty = None;
        self.phase = MemoryPhase::SelectingDifficulty;
    }

    /// Turns a card face up.
    ///
    /// The second card of a pair counts as a move and is compared with the first.
    /// A mismatch locks the board until [`MemoryEngine::resolve_mismatch`].
    ///
    /// # Errors
    ///
    /// Returns [`FlipError`] when no game is running, the board is locked, or the
    /// card is unknown, face up or matched.
    #[instrument(skip(self), fields(phase = ?self.phase, pending = self.pending.len()))]
    pub fn flip(&mut self, card_id: usize) -> Result<FlipOutcome, FlipError> {
        match self.phase {
            MemoryPhase::Idle => {}
            MemoryPhase::EvaluatingPair => return Err(FlipError::Processing),
            MemoryPhase::SelectingDifficulty | MemoryPhase::Won => {
                return Err(FlipError::NotPlaying);
            }
        }
        if self.pending.len() >= 2 {
            return Err(FlipError::Processing);
        }

        let card = self
            .cards
            .get_mut(card_id)
            .ok_or(FlipError::UnknownCard(card_id))?;
        if card.is_matched() {
            return Err(FlipError::AlreadyMatched(card_id));
        }
        if card.is_flipped() {
            return Err(FlipError::AlreadyFlipped(card_id));
        }

        card.set_flipped(true);
        self.pending.push(card_id);

        let [first, second] = match self.pending[..] {
            [first, second] => [first, second],
            _ => {
                debug!(card_id, "First card revealed");
                return Ok(FlipOutcome::Revealed);
            }
        };

        self.moves += 1;

        if self.cards[first].symbol() != self.cards[second].symbol() {
            debug!(first, second, moves = self.moves, "Pair mismatched");
            self.phase = MemoryPhase::EvaluatingPair;
            return Ok(FlipOutcome::Mismatched);
        }

        self.cards[first].set_matched();
        self.cards[second].set_matched();
        self.pending.clear();
        debug!(first, second, moves = self.moves, "Pair matched");

        if self.check_win() {
            self.phase = MemoryPhase::Won;
            info!(moves = self.moves, score = ?self.final_score(), "Memory game won");
            return Ok(FlipOutcome::Won);
        }

        Ok(FlipOutcome::Matched)
    }

    /// Turns a mismatched pair face down again and unlocks the board.
    ///
    /// Returns `false` when no mismatch was pending.
    #[instrument(skip(self))]
    pub fn resolve_mismatch(&mut self) -> bool {
        if self.phase != MemoryPhase::EvaluatingPair {
            return false;
        }
        for id in self.pending.drain(..) {
            if let Some(card) = self.cards.get_mut(id) {
                card.set_flipped(false);
            }
        }
        self.phase = MemoryPhase::Idle;
        debug!("Mismatched pair turned back");
        true
    }

    /// True once a grid is dealt and every card on it is matched.
    pub fn check_win(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(Card::is_matched)
    }

    /// `max(0, 500 - moves * 10)` once the game is won.
    pub fn final_score(&self) -> Option<u32> {
        if self.phase != MemoryPhase::Won {
            return None;
        }
        let moves = match self.scored_moves {
            ScoredMoves::BeforeClosingPair => self.moves.saturating_sub(1),
            ScoredMoves::IncludingClosingPair => self.moves,
        };
        Some(BASE_SCORE.saturating_sub(moves.saturating_mul(MOVE_PENALTY)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine() -> MemoryEngine<ChaCha8Rng> {
        MemoryEngine::new(ChaCha8Rng::seed_from_u64(21))
    }

    /// Finds the id of the card sharing `id`'s symbol.
    fn partner(game: &MemoryEngine<ChaCha8Rng>, id: usize) -> usize {
        let symbol = game.cards()[id].symbol();
        game.cards()
            .iter()
            .find(|c| c.id() != id && c.symbol() == symbol)
            .map(Card::id)
            .expect("every symbol has a partner")
    }

    /// Finds a card whose symbol differs from `id`'s.
    fn stranger(game: &MemoryEngine<ChaCha8Rng>, id: usize) -> usize {
        let symbol = game.cards()[id].symbol();
        game.cards()
            .iter()
            .find(|c| c.symbol() != symbol && !c.is_matched())
            .map(Card::id)
            .expect("another symbol exists")
    }

    #[test]
    fn test_flip_before_setup_rejected() {
        let mut game = engine();
        assert_eq!(game.flip(0), Err(FlipError::NotPlaying));
    }

    #[test]
    fn test_match_clears_pending_immediately() {
        let mut game = engine();
        game.setup(Difficulty::Easy);
        let other = partner(&game, 0);

        assert_eq!(game.flip(0), Ok(FlipOutcome::Revealed));
        assert_eq!(game.flip(other), Ok(FlipOutcome::Matched));
        assert!(game.pending().is_empty());
        assert_eq!(game.moves(), 1);
        assert!(game.cards()[0].is_matched());
        assert_eq!(game.flip(0), Err(FlipError::AlreadyMatched(0)));
    }

    #[test]
    fn test_mismatch_locks_until_resolved() {
        let mut game = engine();
        game.setup(Difficulty::Medium);
        let other = stranger(&game, 0);
        let third = (0..game.cards().len()).find(|&id| id != 0 && id != other).unwrap();

        game.flip(0).unwrap();
        assert_eq!(game.flip(other), Ok(FlipOutcome::Mismatched));
        assert_eq!(game.phase(), MemoryPhase::EvaluatingPair);
        assert_eq!(game.flip(third), Err(FlipError::Processing));
        assert!(!game.cards()[third].is_flipped());

        assert!(game.resolve_mismatch());
        assert!(!game.cards()[0].is_flipped());
        assert!(!game.cards()[other].is_flipped());
        assert_eq!(game.phase(), MemoryPhase::Idle);
        assert!(!game.resolve_mismatch());
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_same_card_twice_rejected() {
        let mut game = engine();
        game.setup(Difficulty::Easy);
        game.flip(3).unwrap();
        assert_eq!(game.flip(3), Err(FlipError::AlreadyFlipped(3)));
        assert_eq!(game.flip(99), Err(FlipError::UnknownCard(99)));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn test_score_conventions() {
        let mut before = engine();
        before.phase = MemoryPhase::Won;
        before.moves = 8;
        assert_eq!(before.final_score(), Some(430));

        let mut including = engine().with_scored_moves(ScoredMoves::IncludingClosingPair);
        including.phase = MemoryPhase::Won;
        including.moves = 8;
        assert_eq!(including.final_score(), Some(420));

        including.moves = 80;
        assert_eq!(including.final_score(), Some(0));
    }

    #[test]
    fn test_score_floors_at_zero_for_huge_move_counts() {
        let mut game = engine();
        game.setup(Difficulty::Easy);
        game.phase = MemoryPhase::Won;
        game.moves = u32::MAX;
        assert_eq!(game.final_score(), Some(0));

        let mut game = game.with_scored_moves(ScoredMoves::IncludingClosingPair);
        game.moves = u32::MAX / 2;
        assert_eq!(game.final_score(), Some(0));
    }

    #[test]
    fn test_reset_twice_equals_once_in_shape() {
        let mut game = engine();
        game.setup(Difficulty::Hard);
        game.flip(0).unwrap();
        game.reset_game();
        game.reset_game();
        assert_eq!(game.cards().len(), 20);
        assert_eq!(game.moves(), 0);
        assert!(game.pending().is_empty());
        assert_eq!(game.phase(), MemoryPhase::Idle);
        assert!(game.cards().iter().all(|c| !c.is_flipped() && !c.is_matched()));
    }
}
