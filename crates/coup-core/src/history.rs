//! Append-only log of semantic game events.
//!
//! Events capture what happened (who, what, outcome, which card was revealed)
//! for audit and display. `format_history` is the pure human-readable
//! projection used by clients.

use crate::actions::ActionType;
use crate::cards::Character;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Result of resolving a challenge against a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeOutcome {
    /// The claim was truthful; the challenger loses influence
    Failed,
    /// The claim was a bluff; the claimant loses influence
    Succeeded,
}

impl ChallengeOutcome {
    fn as_str(self) -> &'static str {
        match self {
            ChallengeOutcome::Failed => "failed",
            ChallengeOutcome::Succeeded => "succeeded",
        }
    }
}

/// A single logged event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEvent {
    /// A character action or foreign aid entered its response window
    ActionDeclared {
        actor: PlayerId,
        action: ActionType,
        claimed_character: Option<Character>,
        target: Option<PlayerId>,
        coin_cost: u32,
    },

    /// An action executed
    ActionResolved {
        actor: PlayerId,
        action: ActionType,
        target: Option<PlayerId>,
        /// Card the target revealed, for coup/assassinate
        card_lost: Option<Character>,
        /// Coins moved, for steal
        amount: Option<u32>,
    },

    /// A challenge against an action claim was resolved
    ChallengeResolved {
        challenger: PlayerId,
        actor: PlayerId,
        action: ActionType,
        claimed_character: Option<Character>,
        outcome: ChallengeOutcome,
        card_lost: Option<Character>,
    },

    /// A block was declared against the pending action
    BlockDeclared {
        blocker: PlayerId,
        action: ActionType,
        claimed_character: Character,
    },

    /// A challenge against a block claim was resolved
    BlockChallengeResolved {
        challenger: PlayerId,
        blocker: PlayerId,
        action: ActionType,
        claimed_character: Character,
        outcome: ChallengeOutcome,
        card_lost: Option<Character>,
    },

    /// Every eligible player passed on a block; the action was cancelled
    BlockStood { blocker: PlayerId, action: ActionType },

    /// A player lost their last influence
    PlayerEliminated { player: PlayerId },

    /// One or zero active players remain
    GameEnded { winner: Option<PlayerId> },
}

/// A logged event plus the turn it happened on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Turn counter at the time of the event
    pub turn: u32,
    #[serde(flatten)]
    pub event: HistoryEvent,
}

impl HistoryEntry {
    /// Render the entry as a single display line
    pub fn render(&self) -> String {
        match &self.event {
            HistoryEvent::ActionDeclared {
                actor,
                action,
                claimed_character,
                target,
                ..
            } => {
                let mut line = format!("{actor} declared {action}");
                if let Some(claimed) = claimed_character {
                    line.push_str(&format!(" claiming {claimed}"));
                }
                if let Some(target) = target {
                    line.push_str(&format!(" targeting {target}"));
                }
                line
            }
            HistoryEvent::ActionResolved {
                actor,
                action,
                target,
                card_lost,
                amount,
            } => {
                let mut line = format!("{actor} performed {action}");
                if let Some(target) = target {
                    line.push_str(&format!(" against {target}"));
                }
                if let Some(card) = card_lost {
                    line.push_str(&format!(", revealing their {card}"));
                }
                if let Some(amount) = amount {
                    line.push_str(&format!(" for {amount} coin(s)"));
                }
                line
            }
            HistoryEvent::ChallengeResolved {
                challenger,
                actor,
                action,
                outcome,
                card_lost,
                ..
            } => {
                let mut line = format!(
                    "{challenger} challenged {actor}'s {action} - challenge {}",
                    outcome.as_str()
                );
                if let Some(card) = card_lost {
                    line.push_str(&format!(" ({card} revealed)"));
                }
                line
            }
            HistoryEvent::BlockDeclared {
                blocker,
                action,
                claimed_character,
            } => format!("{blocker} blocked {action} with {claimed_character}"),
            HistoryEvent::BlockChallengeResolved {
                challenger,
                blocker,
                outcome,
                card_lost,
                ..
            } => {
                let mut line = format!(
                    "{challenger} challenged {blocker}'s block - challenge {}",
                    outcome.as_str()
                );
                if let Some(card) = card_lost {
                    line.push_str(&format!(" ({card} revealed)"));
                }
                line
            }
            HistoryEvent::BlockStood { blocker, action } => {
                format!("{blocker}'s block stood, {action} was cancelled")
            }
            HistoryEvent::PlayerEliminated { player } => format!("{player} was eliminated"),
            HistoryEvent::GameEnded { winner } => match winner {
                Some(winner) => format!("{winner} won the game"),
                None => "the game ended with no survivors".to_string(),
            },
        }
    }
}

/// Project the log to human-readable lines. Pure; no side effects.
pub fn format_history(history: &[HistoryEntry]) -> Vec<String> {
    history.iter().map(HistoryEntry::render).collect()
}
