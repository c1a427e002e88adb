//! Coup - rules engine for the social deduction card game
//!
//! This crate provides the core game logic for Coup, including:
//! - The five-character court deck
//! - Player state (coins, hidden influence, revealed cards)
//! - The action/challenge/block state machine with full rule enforcement
//! - Per-observer redaction of hidden information
//!
//! # Architecture
//!
//! The engine is synchronous and self-contained. One command is applied to
//! one `Game` snapshot at a time; `Game::submit_command` returns a new
//! snapshot and never mutates its receiver, so the surrounding system can
//! serialize access with a per-game lock or an optimistic conditional write.
//! Transport and persistence live outside this crate: a caller loads a
//! `Game`, applies a command, stores the result, and sends each player
//! `Game::redact` of the new state.
//!
//! # Modules
//!
//! - [`cards`]: character cards and the court deck
//! - [`player`]: per-player state and influence loss
//! - [`actions`]: player commands and the pending-action record
//! - [`history`]: append-only event log and its display projection
//! - [`game`]: the game aggregate and state machine
//! - [`view`]: per-observer redaction

pub mod actions;
pub mod cards;
pub mod game;
pub mod history;
pub mod player;
pub mod view;

// Re-export commonly used types
pub use actions::{ActionKind, ActionType, Block, Command, PendingAction, ResponseRecord};
pub use cards::{Character, Deck, COPIES_PER_CHARACTER, DECK_SIZE};
pub use game::{Game, GameError, GameOptions, GamePhase};
pub use history::{format_history, ChallengeOutcome, HistoryEntry, HistoryEvent};
pub use player::{Player, PlayerId, PlayerStatus};
pub use view::{RedactedGame, RedactedPendingAction, RedactedPlayer, DEBUG_OBSERVER};
