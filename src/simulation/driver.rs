use crate::board::TileId;
use crate::game::{
    build_house, decide_purchase, end_turn, jail_action, roll_dice, ActionError, GameEvent, GameState,
    JailAction, TurnPhase,
};
use crate::rng::GameRng;

/// Upper bound on build attempts in one turn
const MAX_BUILDS_PER_TURN: usize = 16;

/// Source of the decisions the engine waits on
pub trait Prompter {
    /// Buy the tile the current player landed on?
    fn confirm_purchase(&mut self, state: &GameState, tile: TileId) -> bool;

    /// How the current player tries to leave jail
    fn choose_jail_action(&mut self, state: &GameState) -> JailAction;

    /// A tile to build on before ending the turn, if any
    fn choose_build(&mut self, _state: &GameState) -> Option<TileId> {
        None
    }
}

/// Drive the current player's turn to completion, extra rolls included.
/// Returns every event raised along the way.
pub fn play_turn(
    state: &mut GameState,
    rng: &mut GameRng,
    prompter: &mut dyn Prompter,
) -> Result<Vec<GameEvent>, ActionError> {
    if !state.running {
        return Err(ActionError::NotRunning);
    }

    let player = state.current_player_id();
    let mut events = Vec::new();

    while state.running && state.current_player_id() == player {
        match state.phase {
            TurnPhase::AwaitingRoll => events.extend(roll_dice(state, rng)?),
            TurnPhase::InJail => {
                let choice = prompter.choose_jail_action(state);
                match jail_action(state, rng, choice) {
                    Ok(step) => events.extend(step),
                    Err(ActionError::InsufficientFunds { .. }) | Err(ActionError::NoJailCard) => {
                        log::debug!("jail action {:?} rejected, rolling instead", choice);
                        events.extend(jail_action(state, rng, JailAction::RollDoubles)?);
                    }
                    Err(e) => return Err(e),
                }
            }
            TurnPhase::AwaitingBuyDecision { tile_id } => {
                let confirmed = prompter.confirm_purchase(state, tile_id);
                events.extend(decide_purchase(state, confirmed)?);
            }
            TurnPhase::AwaitingEndTurn => {
                for _ in 0..MAX_BUILDS_PER_TURN {
                    let Some(tile) = prompter.choose_build(state) else {
                        break;
                    };
                    match build_house(state, tile) {
                        Ok(step) => events.extend(step),
                        Err(e) => {
                            log::debug!("build on tile {} rejected: {}", tile, e);
                            break;
                        }
                    }
                }
                events.extend(end_turn(state)?);
            }
            TurnPhase::GameOver { .. } => break,
            phase => return Err(ActionError::WrongPhase(phase)),
        }
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardConfig;
    use crate::card::CardDatabase;
    use crate::game::new_game;

    /// Scripted answers for driver tests
    struct Scripted {
        buy: bool,
        jail: JailAction,
        purchase_prompts: usize,
    }

    impl Prompter for Scripted {
        fn confirm_purchase(&mut self, _state: &GameState, _tile: TileId) -> bool {
            self.purchase_prompts += 1;
            self.buy
        }

        fn choose_jail_action(&mut self, _state: &GameState) -> JailAction {
            self.jail
        }
    }

    fn setup(seed: u64) -> (GameState, GameRng) {
        let board = BoardConfig::builtin().expect("board");
        let cards = CardDatabase::builtin().expect("cards");
        let mut rng = GameRng::new(Some(seed));
        let names = vec!["Rahim".to_string(), "Karim".to_string(), "Salma".to_string()];
        let state = new_game(&board, &cards, &names, &mut rng).expect("game should start");
        (state, rng)
    }

    #[test]
    fn test_play_turn_passes_to_next_player() {
        let (mut state, mut rng) = setup(1);
        let mut prompter = Scripted { buy: true, jail: JailAction::PayFine, purchase_prompts: 0 };
        let events = play_turn(&mut state, &mut rng, &mut prompter).expect("turn");
        assert!(events.iter().any(|e| matches!(e, GameEvent::DiceRolled { player: 0, .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::TurnEnded { player: 0, .. })));
        assert_ne!(state.current_player_id(), 0);
    }

    #[test]
    fn test_jail_fallback_to_roll() {
        let (mut state, mut rng) = setup(2);
        state.players[0].in_jail = true;
        state.players[0].position = 10;
        state.phase = TurnPhase::InJail;
        let mut prompter = Scripted { buy: false, jail: JailAction::UseCard, purchase_prompts: 0 };
        let events = play_turn(&mut state, &mut rng, &mut prompter).expect("turn");
        assert!(
            events.iter().any(|e| matches!(e, GameEvent::DiceRolled { player: 0, .. })),
            "without a card the driver rolls for doubles"
        );
    }

    #[test]
    fn test_many_turns_keep_invariants() {
        let (mut state, mut rng) = setup(3);
        let mut prompter = Scripted { buy: true, jail: JailAction::PayFine, purchase_prompts: 0 };
        for _ in 0..200 {
            if !state.running {
                break;
            }
            play_turn(&mut state, &mut rng, &mut prompter).expect("turn");
            for p in &state.players {
                assert!(p.cash >= 0 || p.is_bankrupt, "{} left with negative cash", p.name);
                assert!(p.position < state.board_len());
            }
            for t in &state.tiles {
                assert!(t.houses <= 4);
                assert!(!(t.has_hotel && t.houses > 0));
            }
        }
        assert!(prompter.purchase_prompts > 0);
    }

    #[test]
    fn test_play_turn_requires_running_game() {
        let (mut state, mut rng) = setup(4);
        state.running = false;
        let mut prompter = Scripted { buy: true, jail: JailAction::PayFine, purchase_prompts: 0 };
        assert_eq!(play_turn(&mut state, &mut rng, &mut prompter), Err(ActionError::NotRunning));
    }
}
