//! Commands players can submit and the in-flight pending action.
//!
//! A `Command` is the typed form of one player input. The loose transport
//! payload (`action` / `response` / `cardsToKeep`) maps onto it at the
//! boundary. `PendingAction` holds the action currently awaiting responses,
//! as a tagged union so each variant carries only its relevant fields.

use crate::cards::Character;
use crate::game::GameError;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// All action types a player can declare on their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Take 1 coin; resolves immediately
    Income,
    /// Take 2 coins; blockable by a Duke claim
    ForeignAid,
    /// Pay 7 coins, target loses one influence; resolves immediately
    Coup,
    /// Take 3 coins; requires claiming Duke
    Tax,
    /// Pay 3 coins, target loses one influence; requires claiming Assassin
    Assassinate,
    /// Take up to 2 coins from a target; requires claiming Captain
    Steal,
    /// Swap cards with the court deck; requires claiming Ambassador
    Exchange,
}

impl ActionType {
    /// The character a player must claim to declare this action
    pub fn required_claim(self) -> Option<Character> {
        match self {
            ActionType::Tax => Some(Character::Duke),
            ActionType::Assassinate => Some(Character::Assassin),
            ActionType::Steal => Some(Character::Captain),
            ActionType::Exchange => Some(Character::Ambassador),
            ActionType::Income | ActionType::ForeignAid | ActionType::Coup => None,
        }
    }

    /// Upfront coin cost, paid on declaration
    pub fn coin_cost(self) -> u32 {
        match self {
            ActionType::Coup => crate::game::COUP_COST,
            ActionType::Assassinate => crate::game::ASSASSINATE_COST,
            _ => 0,
        }
    }

    /// Whether the action needs a target player
    pub fn requires_target(self) -> bool {
        matches!(
            self,
            ActionType::Coup | ActionType::Assassinate | ActionType::Steal
        )
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::Income => "income",
            ActionType::ForeignAid => "foreign_aid",
            ActionType::Coup => "coup",
            ActionType::Tax => "tax",
            ActionType::Assassinate => "assassinate",
            ActionType::Steal => "steal",
            ActionType::Exchange => "exchange",
        };
        f.write_str(name)
    }
}

impl FromStr for ActionType {
    type Err = GameError;

    /// Parse a wire-format action name, e.g. from an HTTP payload
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(ActionType::Income),
            "foreign_aid" => Ok(ActionType::ForeignAid),
            "coup" => Ok(ActionType::Coup),
            "tax" => Ok(ActionType::Tax),
            "assassinate" => Ok(ActionType::Assassinate),
            "steal" => Ok(ActionType::Steal),
            "exchange" => Ok(ActionType::Exchange),
            other => Err(GameError::UnknownAction(other.to_string())),
        }
    }
}

/// One player input to `submit_command`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Declare an action at the start of your turn
    Declare {
        action: ActionType,
        /// Target player, for coup/assassinate/steal
        #[serde(default)]
        target: Option<PlayerId>,
        /// Character claimed to justify the action
        #[serde(default)]
        claimed_character: Option<Character>,
        /// For coup: which of the target's cards to flip (their oldest if absent)
        #[serde(default)]
        card_to_lose: Option<Character>,
    },

    /// Accuse the pending claim (action or block) of being a bluff
    Challenge {
        /// Which card the loser should flip (their oldest if absent)
        #[serde(default)]
        card_to_lose: Option<Character>,
    },

    /// Counter-claim a character to cancel the pending action
    Block { claimed_character: Character },

    /// Decline to challenge or block
    Pass,

    /// Choose which cards to keep during an exchange
    SelectExchange { cards_to_keep: Vec<Character> },
}

/// How a player responded to a pending action or block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseRecord {
    Pass,
    ChallengeFailed,
    ChallengeSucceeded,
}

/// A declared block: a counter-claim that cancels the action unless
/// successfully challenged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Who declared the block
    pub blocker: PlayerId,
    /// Character the blocker claims to hold
    pub claimed_character: Character,
    /// Responses from the other active players
    pub responses: BTreeMap<PlayerId, ResponseRecord>,
}

/// The action-specific payload of a pending action.
///
/// Income and coup resolve immediately and never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionKind {
    ForeignAid,
    Tax,
    Assassinate { target: PlayerId },
    Steal { target: PlayerId },
    Exchange {
        /// Hand plus freshly drawn cards; set when the exchange resolves
        options: Option<Vec<Character>>,
    },
}

impl ActionKind {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionKind::ForeignAid => ActionType::ForeignAid,
            ActionKind::Tax => ActionType::Tax,
            ActionKind::Assassinate { .. } => ActionType::Assassinate,
            ActionKind::Steal { .. } => ActionType::Steal,
            ActionKind::Exchange { .. } => ActionType::Exchange,
        }
    }

    /// The character the actor implicitly claims by declaring this action
    pub fn claim(&self) -> Option<Character> {
        self.action_type().required_claim()
    }

    /// Target player, if the action has one
    pub fn target(&self) -> Option<&PlayerId> {
        match self {
            ActionKind::Assassinate { target } | ActionKind::Steal { target } => Some(target),
            _ => None,
        }
    }

    /// Upfront cost the actor paid on declaration
    pub fn coin_cost(&self) -> u32 {
        self.action_type().coin_cost()
    }
}

/// An action awaiting challenge/block responses or exchange selection.
/// Owned exclusively by the game; cleared once resolved or cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Who declared the action
    pub actor: PlayerId,
    /// The action and its variant-specific data
    pub kind: ActionKind,
    /// Responses from the other active players
    pub responses: BTreeMap<PlayerId, ResponseRecord>,
    /// Declared block, if any (at most one per action)
    pub block: Option<Block>,
}

impl PendingAction {
    pub fn new(actor: PlayerId, kind: ActionKind) -> Self {
        Self {
            actor,
            kind,
            responses: BTreeMap::new(),
            block: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Character::*;

    #[test]
    fn test_required_claim_mapping() {
        assert_eq!(ActionType::Tax.required_claim(), Some(Duke));
        assert_eq!(ActionType::Assassinate.required_claim(), Some(Assassin));
        assert_eq!(ActionType::Steal.required_claim(), Some(Captain));
        assert_eq!(ActionType::Exchange.required_claim(), Some(Ambassador));
        assert_eq!(ActionType::Income.required_claim(), None);
        assert_eq!(ActionType::ForeignAid.required_claim(), None);
        assert_eq!(ActionType::Coup.required_claim(), None);
    }

    #[test]
    fn test_coin_costs() {
        assert_eq!(ActionType::Assassinate.coin_cost(), 3);
        assert_eq!(ActionType::Coup.coin_cost(), 7);
        assert_eq!(ActionType::Tax.coin_cost(), 0);
    }

    #[test]
    fn test_targets_required() {
        assert!(ActionType::Coup.requires_target());
        assert!(ActionType::Assassinate.requires_target());
        assert!(ActionType::Steal.requires_target());
        assert!(!ActionType::Tax.requires_target());
        assert!(!ActionType::Exchange.requires_target());
    }

    #[test]
    fn test_parse_action_names() {
        assert_eq!(
            "foreign_aid".parse::<ActionType>().unwrap(),
            ActionType::ForeignAid
        );
        assert!(matches!(
            "dance".parse::<ActionType>(),
            Err(GameError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_command_wire_format() {
        let command: Command = serde_json::from_str(
            r#"{"type":"declare","action":"steal","target":"player2","claimed_character":"Captain"}"#,
        )
        .unwrap();
        assert_eq!(
            command,
            Command::Declare {
                action: ActionType::Steal,
                target: Some("player2".to_string()),
                claimed_character: Some(Captain),
                card_to_lose: None,
            }
        );
    }
}
