//! Core game state machine.
//!
//! This module contains the `Game` aggregate and all rule enforcement:
//! action declaration, the challenge and block protocols, influence loss,
//! turn rotation, and game-over detection.
//!
//! `submit_command` never mutates the receiver: it returns a fresh snapshot
//! on success and leaves the stored aggregate untouched on any error, so the
//! caller can persist with an optimistic read-modify-write.

use crate::actions::{ActionKind, ActionType, Block, Command, PendingAction, ResponseRecord};
use crate::cards::{Character, Deck};
use crate::history::{format_history, ChallengeOutcome, HistoryEntry, HistoryEvent};
use crate::player::{Player, PlayerId, STARTING_HAND_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Minimum number of players
pub const MIN_PLAYERS: usize = 2;

/// Maximum number of players
pub const MAX_PLAYERS: usize = 6;

/// Default number of players
pub const DEFAULT_PLAYERS: usize = 3;

/// Coins paid to launch a coup
pub const COUP_COST: u32 = 7;

/// Coins paid on declaring an assassination
pub const ASSASSINATE_COST: u32 = 3;

/// A player holding this many coins must coup
pub const FORCED_COUP_THRESHOLD: u32 = 10;

/// Maximum coins taken by a steal
pub const STEAL_AMOUNT: u32 = 2;

/// Cards drawn from the deck during an exchange
pub const EXCHANGE_DRAW: usize = 2;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Waiting for the current player to declare an action
    ActionDeclaration,
    /// Waiting for the other players to challenge, block, or pass
    ActionResponse,
    /// A block was declared; waiting for challenges or passes against it
    BlockResponse,
    /// Transient phase while an action executes; never observed at rest
    ActionResolution,
    /// Waiting for the actor to pick which cards to keep
    ExchangeResponse,
    /// Game is over
    GameOver,
}

/// Errors that can occur when applying commands
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("player {0} is eliminated and cannot act")]
    PlayerEliminated(PlayerId),

    #[error("not your turn")]
    NotYourTurn,

    #[error("must perform coup when holding 10 or more coins")]
    MustCoup,

    #[error("the actor cannot respond to their own action")]
    ActorCannotRespond,

    #[error("a block has already been declared")]
    BlockAlreadyDeclared,

    #[error("no valid target for block")]
    NoValidBlockTarget,

    #[error("the blocker cannot respond to their own block")]
    BlockerCannotRespondToOwnBlock,

    #[error("{action} requires claiming {required}")]
    InvalidClaimForAction {
        action: ActionType,
        required: Character,
    },

    #[error("{0} requires a target")]
    MissingTarget(ActionType),

    #[error("not enough coins for {action}: requires {required}")]
    InsufficientCoins { action: ActionType, required: u32 },

    #[error("invalid exchange selection: {0}")]
    InvalidExchangeSelection(String),

    #[error("action is already being resolved")]
    ActionAlreadyResolving,

    #[error("the game is over")]
    GameOver,

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid command for current phase")]
    InvalidPhase,
}

/// Options for creating a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Number of seats, 2 through 6
    pub player_count: usize,
    /// Display names; missing entries default to "Player N"
    pub player_names: Option<Vec<String>>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYERS,
            player_names: None,
        }
    }
}

fn declare(
    action: ActionType,
    target: Option<PlayerId>,
    claimed_character: Option<Character>,
) -> Command {
    Command::Declare {
        action,
        target,
        claimed_character,
        card_to_lose: None,
    }
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// All players; order defines turn rotation
    pub players: Vec<Player>,
    /// The court deck
    pub deck: Deck,
    /// Index of the player whose turn it is
    pub turn_index: usize,
    /// Turn number (starts at 1)
    pub turn_count: u32,
    /// Current game phase
    pub phase: GamePhase,
    /// Action awaiting responses, if any
    pub pending_action: Option<PendingAction>,
    /// Append-only event log
    pub history: Vec<HistoryEntry>,
    /// Winner, once the game is over
    pub winner: Option<PlayerId>,
}

impl Game {
    /// Create a new game: fresh shuffled deck, 2 hidden cards and 2 coins per
    /// player, first player's action declaration up.
    pub fn new(options: GameOptions) -> Self {
        let GameOptions {
            player_count,
            player_names,
        } = options;
        assert!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count),
            "player count must be between {MIN_PLAYERS} and {MAX_PLAYERS}"
        );

        let mut rng = rand::thread_rng();
        let mut deck = Deck::standard(&mut rng);
        let names = player_names.unwrap_or_default();

        let players = (0..player_count)
            .map(|i| {
                let id = format!("player{}", i + 1);
                let name = names
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("Player {}", i + 1));
                let mut player = Player::new(id, name);
                for _ in 0..STARTING_HAND_SIZE {
                    if let Some(card) = deck.draw() {
                        player.hand.push(card);
                    }
                }
                player
            })
            .collect();

        Self {
            players,
            deck,
            turn_index: 0,
            turn_count: 1,
            phase: GamePhase::ActionDeclaration,
            pending_action: None,
            history: Vec::new(),
            winner: None,
        }
    }

    /// Get a player by ID
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The player whose turn it is
    pub fn current_player(&self) -> &Player {
        &self.players[self.turn_index]
    }

    /// Number of players still in the game
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Human-readable projection of the event log
    pub fn formatted_history(&self) -> Vec<String> {
        format_history(&self.history)
    }

    /// Apply one player command, returning the next state.
    ///
    /// The receiver is left unchanged; on error no state exists but the
    /// original, so a caller may retry with a corrected command.
    pub fn submit_command(&self, player_id: &str, command: Command) -> Result<Game, GameError> {
        debug!(player = player_id, phase = ?self.phase, ?command, "applying command");

        if !self.player(player_id).is_some_and(Player::is_active) {
            return Err(GameError::PlayerEliminated(player_id.to_string()));
        }

        let mut game = self.clone();
        match game.phase {
            GamePhase::ActionDeclaration => game.handle_declaration(player_id, command)?,
            GamePhase::ActionResponse => game.handle_action_response(player_id, command)?,
            GamePhase::BlockResponse => game.handle_block_response(player_id, command)?,
            GamePhase::ExchangeResponse => game.handle_exchange_selection(player_id, command)?,
            GamePhase::ActionResolution => return Err(GameError::ActionAlreadyResolving),
            GamePhase::GameOver => return Err(GameError::GameOver),
        }
        Ok(game)
    }

    /// Commands `player_id` could legally submit right now.
    ///
    /// Advisory only; `submit_command` remains the authority. During an
    /// exchange the selection is free-form, so a placeholder `SelectExchange`
    /// with no cards stands in for the real choice.
    pub fn valid_commands(&self, player_id: &str) -> Vec<Command> {
        let mut commands = Vec::new();
        let Some(player) = self.player(player_id).filter(|p| p.is_active()) else {
            return commands;
        };

        match self.phase {
            GamePhase::ActionDeclaration => {
                if self.current_player().id != player_id {
                    return commands;
                }
                let coins = player.coins;
                let others: Vec<&Player> = self
                    .players
                    .iter()
                    .filter(|p| p.is_active() && p.id != player_id)
                    .collect();

                if coins >= FORCED_COUP_THRESHOLD {
                    for target in &others {
                        commands.push(declare(ActionType::Coup, Some(target.id.clone()), None));
                    }
                    return commands;
                }

                commands.push(declare(ActionType::Income, None, None));
                commands.push(declare(ActionType::ForeignAid, None, None));
                commands.push(declare(ActionType::Tax, None, Some(Character::Duke)));
                commands.push(declare(
                    ActionType::Exchange,
                    None,
                    Some(Character::Ambassador),
                ));
                for target in &others {
                    if coins >= COUP_COST {
                        commands.push(declare(ActionType::Coup, Some(target.id.clone()), None));
                    }
                    if coins >= ASSASSINATE_COST {
                        commands.push(declare(
                            ActionType::Assassinate,
                            Some(target.id.clone()),
                            Some(Character::Assassin),
                        ));
                    }
                    if target.coins > 0 {
                        commands.push(declare(
                            ActionType::Steal,
                            Some(target.id.clone()),
                            Some(Character::Captain),
                        ));
                    }
                }
            }

            GamePhase::ActionResponse => {
                let Some(pending) = &self.pending_action else {
                    return commands;
                };
                if pending.actor == player_id {
                    return commands;
                }
                commands.push(Command::Pass);
                if pending.kind.claim().is_some() {
                    commands.push(Command::Challenge { card_to_lose: None });
                }
                match &pending.kind {
                    ActionKind::ForeignAid => commands.push(Command::Block {
                        claimed_character: Character::Duke,
                    }),
                    ActionKind::Assassinate { target } if target == player_id => {
                        commands.push(Command::Block {
                            claimed_character: Character::Contessa,
                        });
                    }
                    ActionKind::Steal { target } if target == player_id => {
                        commands.push(Command::Block {
                            claimed_character: Character::Captain,
                        });
                        commands.push(Command::Block {
                            claimed_character: Character::Ambassador,
                        });
                    }
                    _ => {}
                }
            }

            GamePhase::BlockResponse => {
                let Some(block) = self.pending_action.as_ref().and_then(|p| p.block.as_ref())
                else {
                    return commands;
                };
                if block.blocker == player_id {
                    return commands;
                }
                commands.push(Command::Pass);
                commands.push(Command::Challenge { card_to_lose: None });
            }

            GamePhase::ExchangeResponse => {
                if self
                    .pending_action
                    .as_ref()
                    .is_some_and(|p| p.actor == player_id)
                {
                    commands.push(Command::SelectExchange {
                        cards_to_keep: Vec::new(),
                    });
                }
            }

            GamePhase::ActionResolution | GamePhase::GameOver => {}
        }

        commands
    }

    // ==================== Action Declaration ====================

    fn handle_declaration(&mut self, player_id: &str, command: Command) -> Result<(), GameError> {
        if self.current_player().id != player_id {
            return Err(GameError::NotYourTurn);
        }

        let Command::Declare {
            action,
            target,
            claimed_character,
            card_to_lose,
        } = command
        else {
            return Err(GameError::InvalidPhase);
        };

        if self.current_player().coins >= FORCED_COUP_THRESHOLD && action != ActionType::Coup {
            return Err(GameError::MustCoup);
        }

        match action {
            // Income and coup resolve immediately: no challenge or block window
            ActionType::Income => {
                self.players[self.turn_index].coins += 1;
                let actor = self.current_player().id.clone();
                self.log(HistoryEvent::ActionResolved {
                    actor,
                    action,
                    target: None,
                    card_lost: None,
                    amount: None,
                });
                self.advance_turn();
                self.check_game_over();
            }

            ActionType::Coup => {
                let target_id = target.ok_or(GameError::MissingTarget(action))?;
                if !self.player(&target_id).is_some_and(Player::is_active) {
                    return Err(GameError::PlayerEliminated(target_id));
                }
                if self.current_player().coins < COUP_COST {
                    return Err(GameError::InsufficientCoins {
                        action,
                        required: COUP_COST,
                    });
                }
                self.players[self.turn_index].coins -= COUP_COST;
                let actor = self.current_player().id.clone();
                let card_lost = self.lose_influence(&target_id, card_to_lose);
                self.log(HistoryEvent::ActionResolved {
                    actor,
                    action,
                    target: Some(target_id),
                    card_lost,
                    amount: None,
                });
                self.advance_turn();
                self.check_game_over();
            }

            // Everything else opens a response window
            _ => {
                if let Some(required) = action.required_claim() {
                    if claimed_character != Some(required) {
                        return Err(GameError::InvalidClaimForAction { action, required });
                    }
                }

                let kind = match action {
                    ActionType::ForeignAid => ActionKind::ForeignAid,
                    ActionType::Tax => ActionKind::Tax,
                    ActionType::Assassinate => {
                        let target_id = target.ok_or(GameError::MissingTarget(action))?;
                        if !self.player(&target_id).is_some_and(Player::is_active) {
                            return Err(GameError::PlayerEliminated(target_id));
                        }
                        ActionKind::Assassinate { target: target_id }
                    }
                    ActionType::Steal => {
                        let target_id = target.ok_or(GameError::MissingTarget(action))?;
                        if !self.player(&target_id).is_some_and(Player::is_active) {
                            return Err(GameError::PlayerEliminated(target_id));
                        }
                        ActionKind::Steal { target: target_id }
                    }
                    ActionType::Exchange => ActionKind::Exchange { options: None },
                    ActionType::Income | ActionType::Coup => unreachable!("handled above"),
                };

                let cost = kind.coin_cost();
                if self.current_player().coins < cost {
                    return Err(GameError::InsufficientCoins {
                        action,
                        required: cost,
                    });
                }
                self.players[self.turn_index].coins -= cost;

                let actor = self.current_player().id.clone();
                self.log(HistoryEvent::ActionDeclared {
                    actor: actor.clone(),
                    action,
                    claimed_character: kind.claim(),
                    target: kind.target().cloned(),
                    coin_cost: cost,
                });
                self.pending_action = Some(PendingAction::new(actor, kind));
                self.phase = GamePhase::ActionResponse;
            }
        }

        Ok(())
    }

    // ==================== Action Response ====================

    fn handle_action_response(
        &mut self,
        player_id: &str,
        command: Command,
    ) -> Result<(), GameError> {
        let pending = self.pending_action.as_ref().ok_or(GameError::InvalidPhase)?;
        if pending.actor == player_id {
            return Err(GameError::ActorCannotRespond);
        }

        match command {
            Command::Challenge { card_to_lose } => {
                self.resolve_action_challenge(player_id, card_to_lose)
            }
            Command::Block { claimed_character } => self.declare_block(player_id, claimed_character),
            Command::Pass => self.record_action_pass(player_id),
            _ => Err(GameError::InvalidPhase),
        }
    }

    fn resolve_action_challenge(
        &mut self,
        challenger_id: &str,
        card_to_lose: Option<Character>,
    ) -> Result<(), GameError> {
        let pending = self.pending_action.as_ref().ok_or(GameError::InvalidPhase)?;
        let actor_id = pending.actor.clone();
        let action = pending.kind.action_type();
        let claim = pending.kind.claim();
        let cost = pending.kind.coin_cost();

        let (outcome, card_lost) = self.resolve_claim(&actor_id, claim, challenger_id, card_to_lose);
        self.log(HistoryEvent::ChallengeResolved {
            challenger: challenger_id.to_string(),
            actor: actor_id.clone(),
            action,
            claimed_character: claim,
            outcome,
            card_lost,
        });

        match outcome {
            ChallengeOutcome::Failed => {
                info!(challenger = challenger_id, %action, "challenge failed, action proceeds");
                if let Some(pending) = self.pending_action.as_mut() {
                    pending
                        .responses
                        .insert(challenger_id.to_string(), ResponseRecord::ChallengeFailed);
                }
                self.phase = GamePhase::ActionResolution;
                self.execute_pending();
            }
            ChallengeOutcome::Succeeded => {
                info!(challenger = challenger_id, %action, "challenge succeeded, action cancelled");
                // Assassination's upfront cost is never refunded
                if action != ActionType::Assassinate {
                    if let Some(actor) = self.player_mut(&actor_id) {
                        actor.coins += cost;
                    }
                }
                self.pending_action = None;
            }
        }

        // An exchange that survived its challenge still awaits the actor's
        // card selection; every other action finishes this turn.
        if self.phase != GamePhase::ExchangeResponse {
            self.advance_turn();
        }
        self.check_game_over();
        Ok(())
    }

    fn declare_block(
        &mut self,
        blocker_id: &str,
        claimed_character: Character,
    ) -> Result<(), GameError> {
        let pending = self.pending_action.as_mut().ok_or(GameError::InvalidPhase)?;
        let action = pending.kind.action_type();
        if pending.kind.target().is_none() && action != ActionType::ForeignAid {
            return Err(GameError::NoValidBlockTarget);
        }
        if pending.block.is_some() {
            return Err(GameError::BlockAlreadyDeclared);
        }

        pending.block = Some(Block {
            blocker: blocker_id.to_string(),
            claimed_character,
            responses: Default::default(),
        });
        self.phase = GamePhase::BlockResponse;
        self.log(HistoryEvent::BlockDeclared {
            blocker: blocker_id.to_string(),
            action,
            claimed_character,
        });
        Ok(())
    }

    fn record_action_pass(&mut self, player_id: &str) -> Result<(), GameError> {
        let pending = self.pending_action.as_mut().ok_or(GameError::InvalidPhase)?;
        pending
            .responses
            .insert(player_id.to_string(), ResponseRecord::Pass);
        let actor_id = pending.actor.clone();
        let responded = pending.responses.len();

        let eligible = self
            .players
            .iter()
            .filter(|p| p.is_active() && p.id != actor_id)
            .count();
        if responded >= eligible {
            debug!("all eligible players responded, resolving action");
            self.phase = GamePhase::ActionResolution;
            self.execute_pending();
            if self.phase == GamePhase::ActionResolution {
                self.advance_turn();
                self.check_game_over();
            }
        }
        Ok(())
    }

    // ==================== Block Response ====================

    fn handle_block_response(
        &mut self,
        player_id: &str,
        command: Command,
    ) -> Result<(), GameError> {
        let block = self
            .pending_action
            .as_ref()
            .and_then(|p| p.block.as_ref())
            .ok_or(GameError::InvalidPhase)?;
        if block.blocker == player_id {
            return Err(GameError::BlockerCannotRespondToOwnBlock);
        }

        match command {
            Command::Challenge { card_to_lose } => {
                self.resolve_block_challenge(player_id, card_to_lose)
            }
            Command::Pass => self.record_block_pass(player_id),
            _ => Err(GameError::InvalidPhase),
        }
    }

    fn resolve_block_challenge(
        &mut self,
        challenger_id: &str,
        card_to_lose: Option<Character>,
    ) -> Result<(), GameError> {
        let pending = self.pending_action.as_ref().ok_or(GameError::InvalidPhase)?;
        let block = pending.block.as_ref().ok_or(GameError::InvalidPhase)?;
        let blocker_id = block.blocker.clone();
        let claimed = block.claimed_character;
        let action = pending.kind.action_type();

        let (outcome, card_lost) =
            self.resolve_claim(&blocker_id, Some(claimed), challenger_id, card_to_lose);
        self.log(HistoryEvent::BlockChallengeResolved {
            challenger: challenger_id.to_string(),
            blocker: blocker_id.clone(),
            action,
            claimed_character: claimed,
            outcome,
            card_lost,
        });

        match outcome {
            ChallengeOutcome::Failed => {
                // The block stands; the original action is cancelled
                info!(blocker = %blocker_id, %action, "block challenge failed, block stands");
                self.pending_action = None;
            }
            ChallengeOutcome::Succeeded => {
                // The block was a bluff; the original action proceeds
                info!(blocker = %blocker_id, %action, "block challenge succeeded, block discarded");
                if let Some(pending) = self.pending_action.as_mut() {
                    pending.block = None;
                }
                self.phase = GamePhase::ActionResolution;
                self.execute_pending();
            }
        }

        self.advance_turn();
        self.check_game_over();
        Ok(())
    }

    fn record_block_pass(&mut self, player_id: &str) -> Result<(), GameError> {
        let pending = self.pending_action.as_mut().ok_or(GameError::InvalidPhase)?;
        let action = pending.kind.action_type();
        let block = pending.block.as_mut().ok_or(GameError::InvalidPhase)?;
        block
            .responses
            .insert(player_id.to_string(), ResponseRecord::Pass);
        let blocker_id = block.blocker.clone();
        let responded = block.responses.len();

        let eligible = self
            .players
            .iter()
            .filter(|p| p.is_active() && p.id != blocker_id)
            .count();
        if responded >= eligible {
            // Unchallenged block: the original action is cancelled
            self.log(HistoryEvent::BlockStood {
                blocker: blocker_id,
                action,
            });
            self.pending_action = None;
            self.advance_turn();
            self.check_game_over();
        }
        Ok(())
    }

    // ==================== Exchange Selection ====================

    fn handle_exchange_selection(
        &mut self,
        player_id: &str,
        command: Command,
    ) -> Result<(), GameError> {
        let Command::SelectExchange { cards_to_keep } = command else {
            return Err(GameError::InvalidPhase);
        };
        let pending = self.pending_action.as_ref().ok_or(GameError::InvalidPhase)?;
        if pending.actor != player_id {
            return Err(GameError::NotYourTurn);
        }
        let ActionKind::Exchange {
            options: Some(options),
        } = &pending.kind
        else {
            return Err(GameError::InvalidPhase);
        };

        let hand_size = self
            .player(player_id)
            .map(Player::influence_count)
            .unwrap_or(0);
        if cards_to_keep.len() != hand_size {
            return Err(GameError::InvalidExchangeSelection(format!(
                "must keep exactly {hand_size} card(s)"
            )));
        }

        // Each kept card consumes one copy from the options, so requesting
        // duplicates the pool does not hold is rejected
        let mut returned = options.clone();
        for card in &cards_to_keep {
            match returned.iter().position(|c| c == card) {
                Some(pos) => {
                    returned.remove(pos);
                }
                None => {
                    return Err(GameError::InvalidExchangeSelection(format!(
                        "{card} is not among the exchange options"
                    )));
                }
            }
        }

        let actor_id = pending.actor.clone();
        let action = pending.kind.action_type();
        if let Some(actor) = self.player_mut(&actor_id) {
            actor.hand = cards_to_keep;
        }
        let mut rng = rand::thread_rng();
        self.deck.return_cards(returned, &mut rng);
        self.log(HistoryEvent::ActionResolved {
            actor: actor_id,
            action,
            target: None,
            card_lost: None,
            amount: None,
        });
        self.pending_action = None;
        self.advance_turn();
        self.check_game_over();
        Ok(())
    }

    // ==================== Challenge Protocol ====================

    /// Resolve a challenge against a claim, shared by action- and
    /// block-challenges. A truthful claimant proves the card, draws a
    /// replacement, and shuffles the proven card back; the challenger loses
    /// one influence. A bluffing claimant loses one influence instead.
    fn resolve_claim(
        &mut self,
        claimant_id: &str,
        claim: Option<Character>,
        challenger_id: &str,
        card_to_lose: Option<Character>,
    ) -> (ChallengeOutcome, Option<Character>) {
        let proven =
            claim.filter(|c| self.player(claimant_id).is_some_and(|p| p.holds(*c)));

        match proven {
            Some(character) => {
                let lost = self.lose_influence(challenger_id, card_to_lose);
                self.replace_proven_card(claimant_id, character);
                (ChallengeOutcome::Failed, lost)
            }
            None => {
                let lost = self.lose_influence(claimant_id, card_to_lose);
                (ChallengeOutcome::Succeeded, lost)
            }
        }
    }

    /// The proven card leaves the claimant's hand, a replacement is drawn,
    /// and the proven card is shuffled back into the deck, so repeated
    /// challenges leak nothing about deck order.
    fn replace_proven_card(&mut self, player_id: &str, character: Character) {
        // draw first so the proven card cannot be drawn straight back
        let replacement = self.deck.draw();
        if let Some(player) = self.player_mut(player_id) {
            player.take_card(character);
            if let Some(card) = replacement {
                player.hand.push(card);
            }
        }
        let mut rng = rand::thread_rng();
        self.deck.return_cards([character], &mut rng);
    }

    // ==================== Action Execution ====================

    /// Execute the pending action. Clears it except for exchange, which
    /// moves to EXCHANGE_RESPONSE to await the actor's selection.
    fn execute_pending(&mut self) {
        let Some(pending) = self.pending_action.clone() else {
            return;
        };
        let actor_id = pending.actor;
        let action = pending.kind.action_type();

        match pending.kind {
            ActionKind::ForeignAid => {
                if let Some(actor) = self.player_mut(&actor_id) {
                    actor.coins += 2;
                }
                self.log(HistoryEvent::ActionResolved {
                    actor: actor_id,
                    action,
                    target: None,
                    card_lost: None,
                    amount: None,
                });
                self.pending_action = None;
            }

            ActionKind::Tax => {
                if let Some(actor) = self.player_mut(&actor_id) {
                    actor.coins += 3;
                }
                self.log(HistoryEvent::ActionResolved {
                    actor: actor_id,
                    action,
                    target: None,
                    card_lost: None,
                    amount: None,
                });
                self.pending_action = None;
            }

            ActionKind::Assassinate { target } => {
                // The target may already be eliminated from losing a
                // challenge; influence loss is then a no-op
                let card_lost = self.lose_influence(&target, None);
                self.log(HistoryEvent::ActionResolved {
                    actor: actor_id,
                    action,
                    target: Some(target),
                    card_lost,
                    amount: None,
                });
                self.pending_action = None;
            }

            ActionKind::Steal { target } => {
                let available = self.player(&target).map(|p| p.coins).unwrap_or(0);
                let amount = STEAL_AMOUNT.min(available);
                if let Some(victim) = self.player_mut(&target) {
                    victim.coins -= amount;
                }
                if let Some(actor) = self.player_mut(&actor_id) {
                    actor.coins += amount;
                }
                self.log(HistoryEvent::ActionResolved {
                    actor: actor_id,
                    action,
                    target: Some(target),
                    card_lost: None,
                    amount: Some(amount),
                });
                self.pending_action = None;
            }

            ActionKind::Exchange { .. } => {
                let drawn = self.deck.draw_up_to(EXCHANGE_DRAW);
                let mut options = self
                    .player(&actor_id)
                    .map(|p| p.hand.clone())
                    .unwrap_or_default();
                options.extend(drawn);
                if let Some(pending) = self.pending_action.as_mut() {
                    pending.kind = ActionKind::Exchange {
                        options: Some(options),
                    };
                }
                self.phase = GamePhase::ExchangeResponse;
            }
        }
    }

    // ==================== Turn and Elimination Bookkeeping ====================

    /// Move one influence card from hand to revealed, eliminating the player
    /// if it was their last. Logs the elimination.
    fn lose_influence(&mut self, player_id: &str, choice: Option<Character>) -> Option<Character> {
        let (lost, eliminated) = match self.player_mut(player_id) {
            Some(player) => {
                let lost = player.lose_influence(choice);
                (lost, lost.is_some() && !player.is_active())
            }
            None => (None, false),
        };
        if eliminated {
            info!(player = player_id, "player eliminated");
            self.log(HistoryEvent::PlayerEliminated {
                player: player_id.to_string(),
            });
        }
        lost
    }

    /// Clear the pending action and hand the turn to the next active player
    fn advance_turn(&mut self) {
        self.pending_action = None;
        let mut index = self.turn_index;
        loop {
            index = (index + 1) % self.players.len();
            if self.players[index].is_active() {
                break;
            }
        }
        self.turn_index = index;
        self.phase = GamePhase::ActionDeclaration;
        self.turn_count += 1;
        debug!(turn = self.turn_count, player = %self.players[index].id, "turn advanced");
    }

    /// If at most one active player remains, end the game
    fn check_game_over(&mut self) {
        if self.active_count() > 1 {
            return;
        }
        let winner = self
            .players
            .iter()
            .find(|p| p.is_active())
            .map(|p| p.id.clone());
        self.phase = GamePhase::GameOver;
        self.winner = winner.clone();
        info!(winner = ?self.winner, "game over");
        self.log(HistoryEvent::GameEnded { winner });
    }

    fn log(&mut self, event: HistoryEvent) {
        self.history.push(HistoryEntry {
            turn: self.turn_count,
            event,
        });
    }
}
