use crate::board::PlayerId;
use crate::game::bankruptcy::declare_bankruptcy;
use crate::game::error::ActionError;
use crate::game::events::{GameEvent, ReleaseReason};
use crate::game::landing::land_on_tile;
use crate::game::state::{GameState, TurnPhase};
use crate::rng::GameRng;

/// Consecutive doubles that send a player to jail
pub const MAX_DOUBLES: u8 = 3;

/// Failed jail rolls before the fine is forced
pub const MAX_JAIL_TURNS: u8 = 3;

/// Choice offered to a player who starts the turn in jail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JailAction {
    PayFine,
    RollDoubles,
    UseCard,
}

fn ensure_valid_dice(dice: (u8, u8)) -> Result<(), ActionError> {
    let face = 1..=6;
    if face.contains(&dice.0) && face.contains(&dice.1) {
        Ok(())
    } else {
        Err(ActionError::InvalidDice(dice))
    }
}

/// Total pips, widened before adding
fn dice_total(dice: (u8, u8)) -> i32 {
    dice.0 as i32 + dice.1 as i32
}

fn ensure_running(state: &GameState) -> Result<(), ActionError> {
    if state.running {
        Ok(())
    } else {
        Err(ActionError::NotRunning)
    }
}

/// Roll for the current player. A jailed player is redirected to the jail flow.
pub fn roll_dice(state: &mut GameState, rng: &mut GameRng) -> Result<Vec<GameEvent>, ActionError> {
    ensure_running(state)?;
    let starting_turn = matches!(state.phase, TurnPhase::AwaitingRoll | TurnPhase::InJail);
    if state.current_player().in_jail && starting_turn {
        state.phase = TurnPhase::InJail;
        let player = state.current_player_id();
        state.emit(GameEvent::JailDecisionRequired { player });
        return Ok(state.take_events());
    }
    if state.phase != TurnPhase::AwaitingRoll {
        return Err(ActionError::WrongPhase(state.phase));
    }
    let dice = rng.roll_dice();
    apply_roll(state, rng, dice)
}

/// Resolve a roll with known dice: doubles tracking, movement and landing
pub fn apply_roll(state: &mut GameState, rng: &mut GameRng, dice: (u8, u8)) -> Result<Vec<GameEvent>, ActionError> {
    ensure_running(state)?;
    if state.phase != TurnPhase::AwaitingRoll || state.current_player().in_jail {
        return Err(ActionError::WrongPhase(state.phase));
    }
    ensure_valid_dice(dice)?;

    let player = state.current_player_id();
    state.phase = TurnPhase::Rolling;
    state.dice = dice;
    state.emit(GameEvent::DiceRolled { player, dice });

    if dice.0 == dice.1 {
        let count = {
            let p = state.current_player_mut();
            p.doubles_rolled += 1;
            p.doubles_rolled
        };
        state.emit(GameEvent::DoublesRolled { player, count });
        if count >= MAX_DOUBLES {
            state.emit(GameEvent::ThreeDoubles { player });
            send_to_jail(state, player);
            advance_turn(state);
            return Ok(state.take_events());
        }
    } else {
        state.current_player_mut().doubles_rolled = 0;
    }

    let steps = dice_total(dice);
    move_player(state, rng, player, steps);
    finish_step(state);
    Ok(state.take_events())
}

/// Move relative to the current position, pay GO on a forward wrap, then resolve the landing
pub(crate) fn move_player(state: &mut GameState, rng: &mut GameRng, player: PlayerId, steps: i32) {
    let len = state.board_len() as i32;
    let from = state.players[player].position;
    let to = (from as i32 + steps).rem_euclid(len) as usize;

    state.phase = TurnPhase::Moving;
    state.players[player].position = to;
    log::debug!("player {} moves {} steps: {} -> {}", player, steps, from, to);
    state.emit(GameEvent::PlayerMoved { player, from, to });

    if steps > 0 && to < from {
        collect_go_payout(state, player);
    }

    land_on_tile(state, rng, player);
}

pub(crate) fn collect_go_payout(state: &mut GameState, player: PlayerId) {
    let amount = state.rules.go_payout;
    state.players[player].add_cash(amount);
    state.emit(GameEvent::PassedGo { player, amount });
}

/// Teleport a player to jail. Doubles no longer earn an extra roll.
pub(crate) fn send_to_jail(state: &mut GameState, player: PlayerId) {
    let jail = state.jail_index;
    let p = &mut state.players[player];
    p.position = jail;
    p.in_jail = true;
    p.jail_turns = 0;
    p.doubles_rolled = 0;
    state.emit(GameEvent::PlayerJailed { player });
}

fn release_from_jail(state: &mut GameState, player: PlayerId, reason: ReleaseReason) {
    let p = &mut state.players[player];
    p.in_jail = false;
    p.jail_turns = 0;
    state.emit(GameEvent::PlayerReleased { player, reason });
}

/// Close a resolution step unless it already handed control elsewhere
pub(crate) fn finish_step(state: &mut GameState) {
    if state.phase.is_resolving() {
        state.phase = TurnPhase::AwaitingEndTurn;
    }
}

/// Resolve the jailed player's choice
pub fn jail_action(state: &mut GameState, rng: &mut GameRng, action: JailAction) -> Result<Vec<GameEvent>, ActionError> {
    ensure_running(state)?;
    if !state.current_player().in_jail {
        return Err(ActionError::NotInJail);
    }
    if state.phase != TurnPhase::InJail {
        return Err(ActionError::WrongPhase(state.phase));
    }

    let player = state.current_player_id();
    match action {
        JailAction::PayFine => {
            let fine = state.rules.jail_fine;
            let available = state.current_player().cash;
            if available < fine {
                return Err(ActionError::InsufficientFunds { needed: fine, available });
            }
            state.current_player_mut().deduct_cash(fine);
            release_from_jail(state, player, ReleaseReason::PaidFine);
            state.phase = TurnPhase::AwaitingRoll;
        }
        JailAction::UseCard => {
            if state.current_player().jail_free_cards == 0 {
                return Err(ActionError::NoJailCard);
            }
            state.current_player_mut().jail_free_cards -= 1;
            release_from_jail(state, player, ReleaseReason::UsedCard);
            state.phase = TurnPhase::AwaitingRoll;
        }
        JailAction::RollDoubles => {
            let dice = rng.roll_dice();
            return apply_jail_roll(state, rng, dice);
        }
    }
    Ok(state.take_events())
}

/// Resolve a jail roll with known dice
pub fn apply_jail_roll(state: &mut GameState, rng: &mut GameRng, dice: (u8, u8)) -> Result<Vec<GameEvent>, ActionError> {
    ensure_running(state)?;
    if !state.current_player().in_jail {
        return Err(ActionError::NotInJail);
    }
    if state.phase != TurnPhase::InJail {
        return Err(ActionError::WrongPhase(state.phase));
    }
    ensure_valid_dice(dice)?;

    let player = state.current_player_id();
    state.phase = TurnPhase::Rolling;
    state.dice = dice;
    state.emit(GameEvent::DiceRolled { player, dice });
    let steps = dice_total(dice);

    if dice.0 == dice.1 {
        release_from_jail(state, player, ReleaseReason::RolledDoubles);
        move_player(state, rng, player, steps);
        finish_step(state);
        return Ok(state.take_events());
    }

    let attempt = {
        let p = state.current_player_mut();
        p.jail_turns += 1;
        p.jail_turns
    };
    state.emit(GameEvent::JailRollFailed { player, attempt });

    if attempt >= MAX_JAIL_TURNS {
        let fine = state.rules.jail_fine;
        state.current_player_mut().deduct_cash(fine);
        release_from_jail(state, player, ReleaseReason::ForcedFine);
        if state.current_player().is_insolvent() {
            declare_bankruptcy(state, player, None);
            return Ok(state.take_events());
        }
        move_player(state, rng, player, steps);
        finish_step(state);
    } else {
        advance_turn(state);
    }
    Ok(state.take_events())
}

/// End the current turn: grant an extra roll after doubles, otherwise pass to the next player
pub fn end_turn(state: &mut GameState) -> Result<Vec<GameEvent>, ActionError> {
    ensure_running(state)?;
    if state.phase != TurnPhase::AwaitingEndTurn {
        return Err(ActionError::WrongPhase(state.phase));
    }

    let player = state.current_player_id();
    let p = state.current_player_mut();
    if p.doubles_rolled > 0 && !p.in_jail {
        p.doubles_rolled = 0;
        state.phase = TurnPhase::AwaitingRoll;
        state.emit(GameEvent::ExtraRoll { player });
        return Ok(state.take_events());
    }

    advance_turn(state);
    Ok(state.take_events())
}

/// Pass the turn to the next non-bankrupt player, or end the game
pub(crate) fn advance_turn(state: &mut GameState) {
    if check_game_over(state) {
        return;
    }

    let previous = state.current_player_id();
    state.players[previous].doubles_rolled = 0;

    let count = state.players.len();
    let mut next = (previous + 1) % count;
    while state.players[next].is_bankrupt {
        next = (next + 1) % count;
    }

    state.current_player_index = next;
    state.turn += 1;
    state.emit(GameEvent::TurnEnded { player: previous, next });
    start_turn(state);
}

fn start_turn(state: &mut GameState) {
    let player = state.current_player_id();
    let in_jail = state.current_player().in_jail;
    state.phase = if in_jail { TurnPhase::InJail } else { TurnPhase::AwaitingRoll };
    state.emit(GameEvent::TurnStarted { player, in_jail });
}

/// End the game when at most one player remains. Returns whether it ended.
pub(crate) fn check_game_over(state: &mut GameState) -> bool {
    if state.is_game_over() {
        return true;
    }
    let active = state.active_players();
    if active.len() > 1 {
        return false;
    }
    let winner = active.first().copied();
    state.running = false;
    state.phase = TurnPhase::GameOver { winner };
    state.emit(GameEvent::GameOver { winner });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardConfig, TileKind};
    use crate::card::{Card, CardAction, CardDatabase};
    use crate::game::state::new_game;

    fn setup(players: usize) -> (GameState, GameRng) {
        let board = BoardConfig::builtin().expect("board");
        let cards = CardDatabase::new(
            vec![Card::new("Collect", CardAction::CollectMoney { amount: 100 })],
            vec![Card::new("Collect", CardAction::CollectMoney { amount: 100 })],
        );
        let mut rng = GameRng::new(Some(42));
        let names: Vec<String> = (0..players).map(|i| format!("P{}", i)).collect();
        let state = new_game(&board, &cards, &names, &mut rng).expect("game should start");
        (state, rng)
    }

    #[test]
    fn test_roll_moves_by_sum() {
        let (mut state, mut rng) = setup(2);
        apply_roll(&mut state, &mut rng, (2, 3)).expect("roll should succeed");
        assert_eq!(state.players[0].position, 5);
        assert_eq!(state.dice, (2, 3));
        assert_eq!(state.players[0].doubles_rolled, 0);
    }

    #[test]
    fn test_random_roll_stays_on_board() {
        let (mut state, mut rng) = setup(2);
        let events = roll_dice(&mut state, &mut rng).expect("roll should succeed");
        let (d1, d2) = state.dice;
        assert!((1..=6).contains(&d1) && (1..=6).contains(&d2));
        assert!(events.iter().any(|e| matches!(e, GameEvent::DiceRolled { .. })));
    }

    #[test]
    fn test_wrap_pays_go() {
        let (mut state, mut rng) = setup(2);
        state.players[0].position = 38;
        let cash = state.players[0].cash;
        let events = apply_roll(&mut state, &mut rng, (1, 2)).expect("roll should succeed");
        assert_eq!(state.players[0].position, 1);
        assert!(events.contains(&GameEvent::PassedGo { player: 0, amount: 2000 }));
        assert_eq!(state.players[0].cash, cash + 2000, "GO payout should be credited");
    }

    #[test]
    fn test_backward_move_does_not_pay_go() {
        let (mut state, mut rng) = setup(2);
        state.players[0].position = 2;
        let cash = state.players[0].cash;
        state.phase = TurnPhase::Moving;
        move_player(&mut state, &mut rng, 0, -3);
        assert_eq!(state.players[0].position, 39);
        assert_eq!(state.players[0].cash, cash, "moving back past GO pays nothing");
    }

    #[test]
    fn test_roll_rejected_when_not_running() {
        let (mut state, mut rng) = setup(2);
        state.running = false;
        assert_eq!(roll_dice(&mut state, &mut rng), Err(ActionError::NotRunning));
    }

    #[test]
    fn test_roll_rejected_twice_in_a_turn() {
        let (mut state, mut rng) = setup(2);
        apply_roll(&mut state, &mut rng, (1, 3)).expect("first roll");
        assert!(matches!(apply_roll(&mut state, &mut rng, (1, 3)), Err(ActionError::WrongPhase(_))));
    }

    #[test]
    fn test_jailed_player_redirected_from_roll() {
        let (mut state, mut rng) = setup(2);
        state.players[0].in_jail = true;
        state.players[0].position = 10;
        let events = roll_dice(&mut state, &mut rng).expect("redirect is not an error");
        assert_eq!(state.phase, TurnPhase::InJail);
        assert_eq!(state.players[0].position, 10, "jailed player must not move");
        assert_eq!(events, vec![GameEvent::JailDecisionRequired { player: 0 }]);
    }

    #[test]
    fn test_three_doubles_sends_to_jail() {
        let (mut state, mut rng) = setup(2);
        state.players[0].doubles_rolled = 2;
        state.players[0].position = 3;
        apply_roll(&mut state, &mut rng, (4, 4)).expect("roll should succeed");
        let p = &state.players[0];
        assert_eq!(p.position, 10, "teleported to jail, not moved by 8");
        assert!(p.in_jail);
        assert_eq!(p.doubles_rolled, 0);
        assert_eq!(state.current_player_id(), 1, "turn ends immediately");
    }

    #[test]
    fn test_doubles_grant_extra_roll() {
        let (mut state, mut rng) = setup(2);
        apply_roll(&mut state, &mut rng, (1, 1)).expect("roll should succeed");
        assert_eq!(state.players[0].doubles_rolled, 1);
        let events = end_turn(&mut state).expect("end turn");
        assert_eq!(events, vec![GameEvent::ExtraRoll { player: 0 }]);
        assert_eq!(state.current_player_id(), 0);
        assert_eq!(state.phase, TurnPhase::AwaitingRoll);
        assert_eq!(state.players[0].doubles_rolled, 0, "counter resets before the extra roll");
    }

    #[test]
    fn test_end_turn_advances() {
        let (mut state, mut rng) = setup(3);
        apply_roll(&mut state, &mut rng, (1, 3)).expect("roll");
        end_turn(&mut state).expect("end turn");
        assert_eq!(state.current_player_id(), 1);
        assert_eq!(state.phase, TurnPhase::AwaitingRoll);
    }

    #[test]
    fn test_end_turn_skips_bankrupt_players() {
        let (mut state, mut rng) = setup(3);
        state.players[1].is_bankrupt = true;
        apply_roll(&mut state, &mut rng, (1, 3)).expect("roll");
        end_turn(&mut state).expect("end turn");
        assert_eq!(state.current_player_id(), 2);
    }

    #[test]
    fn test_end_turn_declares_winner() {
        let (mut state, mut rng) = setup(2);
        apply_roll(&mut state, &mut rng, (1, 3)).expect("roll");
        state.players[1].is_bankrupt = true;
        let events = end_turn(&mut state).expect("end turn");
        assert!(events.contains(&GameEvent::GameOver { winner: Some(0) }));
        assert!(!state.running);
        assert_eq!(state.winner(), Some(0));
    }

    #[test]
    fn test_end_turn_requires_roll_first() {
        let (mut state, _rng) = setup(2);
        assert!(matches!(end_turn(&mut state), Err(ActionError::WrongPhase(TurnPhase::AwaitingRoll))));
    }

    #[test]
    fn test_goto_jail_tile() {
        let (mut state, mut rng) = setup(2);
        state.players[0].position = 25;
        apply_roll(&mut state, &mut rng, (2, 3)).expect("roll");
        assert_eq!(state.tiles[30].kind, TileKind::GotoJail);
        assert!(state.players[0].in_jail);
        assert_eq!(state.players[0].position, 10);
        end_turn(&mut state).expect("end turn");
        assert_eq!(state.current_player_id(), 1);
    }

    fn jailed(players: usize) -> (GameState, GameRng) {
        let (mut state, rng) = setup(players);
        state.players[0].in_jail = true;
        state.players[0].position = 10;
        state.phase = TurnPhase::InJail;
        (state, rng)
    }

    #[test]
    fn test_pay_fine_releases() {
        let (mut state, mut rng) = jailed(2);
        let cash = state.players[0].cash;
        jail_action(&mut state, &mut rng, JailAction::PayFine).expect("fine should be paid");
        assert!(!state.players[0].in_jail);
        assert_eq!(state.players[0].cash, cash - 500);
        assert_eq!(state.phase, TurnPhase::AwaitingRoll);
    }

    #[test]
    fn test_pay_fine_rejected_without_cash() {
        let (mut state, mut rng) = jailed(2);
        state.players[0].cash = 100;
        let result = jail_action(&mut state, &mut rng, JailAction::PayFine);
        assert_eq!(result, Err(ActionError::InsufficientFunds { needed: 500, available: 100 }));
        assert!(state.players[0].in_jail, "state unchanged on rejection");
        assert_eq!(state.phase, TurnPhase::InJail);
    }

    #[test]
    fn test_use_card() {
        let (mut state, mut rng) = jailed(2);
        assert_eq!(jail_action(&mut state, &mut rng, JailAction::UseCard), Err(ActionError::NoJailCard));
        state.players[0].jail_free_cards = 1;
        jail_action(&mut state, &mut rng, JailAction::UseCard).expect("card should be used");
        assert!(!state.players[0].in_jail);
        assert_eq!(state.players[0].jail_free_cards, 0);
    }

    #[test]
    fn test_jail_doubles_moves_out() {
        let (mut state, mut rng) = jailed(2);
        apply_jail_roll(&mut state, &mut rng, (3, 3)).expect("jail roll");
        assert!(!state.players[0].in_jail);
        assert_eq!(state.players[0].position, 16);
        assert_eq!(state.players[0].doubles_rolled, 0, "leaving jail on doubles gives no extra roll");
    }

    #[test]
    fn test_failed_jail_roll_ends_turn() {
        let (mut state, mut rng) = jailed(2);
        apply_jail_roll(&mut state, &mut rng, (1, 2)).expect("jail roll");
        assert!(state.players[0].in_jail);
        assert_eq!(state.players[0].jail_turns, 1);
        assert_eq!(state.current_player_id(), 1);
    }

    #[test]
    fn test_third_failed_roll_bankrupts_before_moving() {
        let (mut state, mut rng) = jailed(2);
        state.players[0].jail_turns = 2;
        state.players[0].cash = 200;
        apply_jail_roll(&mut state, &mut rng, (1, 2)).expect("jail roll");
        let p = &state.players[0];
        assert!(p.is_bankrupt, "200 - 500 leaves the player insolvent");
        assert_eq!(p.position, 10, "bankruptcy resolves before any movement");
        assert_eq!(p.cash, 0);
        assert_eq!(state.winner(), Some(1));
    }

    #[test]
    fn test_third_failed_roll_with_cash() {
        let (mut state, mut rng) = jailed(2);
        state.players[0].jail_turns = 2;
        let cash = state.players[0].cash;
        apply_jail_roll(&mut state, &mut rng, (1, 2)).expect("jail roll");
        let p = &state.players[0];
        assert!(!p.in_jail);
        assert_eq!(p.position, 13);
        assert_eq!(p.cash, cash - 500);
        assert!(matches!(state.phase, TurnPhase::AwaitingBuyDecision { tile_id: 13 }));
    }

    #[test]
    fn test_roll_rejects_out_of_range_dice() {
        let (mut state, mut rng) = setup(2);
        assert_eq!(apply_roll(&mut state, &mut rng, (0, 0)), Err(ActionError::InvalidDice((0, 0))));
        assert_eq!(apply_roll(&mut state, &mut rng, (200, 100)), Err(ActionError::InvalidDice((200, 100))));
        assert_eq!(apply_roll(&mut state, &mut rng, (3, 7)), Err(ActionError::InvalidDice((3, 7))));
        let p = &state.players[0];
        assert_eq!(p.position, 0, "rejected dice must not move the player");
        assert_eq!(p.doubles_rolled, 0, "rejected dice must not count as doubles");
        assert_eq!(state.phase, TurnPhase::AwaitingRoll);
        apply_roll(&mut state, &mut rng, (6, 5)).expect("valid dice still accepted");
        assert_eq!(state.players[0].position, 11);
    }

    #[test]
    fn test_jail_roll_rejects_out_of_range_dice() {
        let (mut state, mut rng) = jailed(2);
        assert_eq!(apply_jail_roll(&mut state, &mut rng, (0, 0)), Err(ActionError::InvalidDice((0, 0))));
        assert_eq!(
            apply_jail_roll(&mut state, &mut rng, (200, 100)),
            Err(ActionError::InvalidDice((200, 100)))
        );
        let p = &state.players[0];
        assert!(p.in_jail, "a rejected roll leaves the player jailed");
        assert_eq!(p.jail_turns, 0, "a rejected roll is not an attempt");
        assert_eq!(state.phase, TurnPhase::InJail);
    }

    #[test]
    fn test_jail_action_requires_jailed_player() {
        let (mut state, mut rng) = setup(2);
        assert_eq!(jail_action(&mut state, &mut rng, JailAction::PayFine), Err(ActionError::NotInJail));
    }
}
