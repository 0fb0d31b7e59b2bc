//! Hot-seat terminal game.

use super::{load_data, CliError, DataPaths};
use crate::board::{Money, PlayerId, TileId};
use crate::card::DeckKind;
use crate::game::debug;
use crate::game::{
    build_house, decide_purchase, end_turn, jail_action, mortgage, new_game, rent_due, roll_dice, sell_house,
    unmortgage, ActionError, GameEvent, GameState, JailAction, TurnPhase,
};
use crate::rng::GameRng;
use crate::storage::{clear_save, load_game, save_game, FileStore, KeyValueStore};
use std::io::{self, BufRead, Write};

/// A player command typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Roll,
    Buy,
    Pass,
    Jail(JailAction),
    Build(TileId),
    Sell(TileId),
    Mortgage(TileId),
    Unmortgage(TileId),
    End,
    Status,
    Board,
    Save,
    Load,
    ClearSave,
    Jackpot(bool),
    DebugCash(PlayerId, Money),
    DebugGoto(TileId),
    DebugCard(DeckKind),
    DebugImprove(TileId),
    DebugBankrupt,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  roll                      roll the dice
  buy | pass                answer a purchase offer
  pay | card | try          leave Thana: pay the fine, use a card, or roll for doubles
  build <tile>              build a house (or hotel)
  sell <tile>               sell a house (or hotel)
  mortgage <tile>           mortgage a property
  unmortgage <tile>         lift a mortgage
  end                       end your turn
  status | board            show players or the board
  save | load | clear       manage the saved game
  jackpot on|off            toggle the Free Parking jackpot
  debug cash <player> <n>   give cash (negative to take)
  debug goto <tile>         move the current player and resolve the tile
  debug card event|news     resolve a random card
  debug improve <tile>      add a free house
  debug bankrupt            bankrupt the current player
  help | quit";

fn parse_number<T: std::str::FromStr>(word: Option<&str>, what: &str) -> Result<T, String> {
    let word = word.ok_or_else(|| format!("missing {}", what))?;
    word.parse().map_err(|_| format!("'{}' is not a valid {}", word, what))
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };

    let command = match verb.to_lowercase().as_str() {
        "roll" | "r" => Command::Roll,
        "buy" | "y" => Command::Buy,
        "pass" | "n" => Command::Pass,
        "pay" => Command::Jail(JailAction::PayFine),
        "card" => Command::Jail(JailAction::UseCard),
        "try" => Command::Jail(JailAction::RollDoubles),
        "build" => Command::Build(parse_number(words.next(), "tile")?),
        "sell" => Command::Sell(parse_number(words.next(), "tile")?),
        "mortgage" => Command::Mortgage(parse_number(words.next(), "tile")?),
        "unmortgage" => Command::Unmortgage(parse_number(words.next(), "tile")?),
        "end" | "e" => Command::End,
        "status" | "s" => Command::Status,
        "board" | "b" => Command::Board,
        "save" => Command::Save,
        "load" => Command::Load,
        "clear" => Command::ClearSave,
        "jackpot" => match words.next() {
            Some("on") => Command::Jackpot(true),
            Some("off") => Command::Jackpot(false),
            _ => return Err("usage: jackpot on|off".to_string()),
        },
        "debug" => match words.next() {
            Some("cash") => {
                let player: usize = parse_number(words.next(), "player number")?;
                if player == 0 {
                    return Err("players are numbered from 1".to_string());
                }
                Command::DebugCash(player - 1, parse_number(words.next(), "amount")?)
            }
            Some("goto") => Command::DebugGoto(parse_number(words.next(), "tile")?),
            Some("card") => match words.next() {
                Some("event") => Command::DebugCard(DeckKind::Event),
                Some("news") => Command::DebugCard(DeckKind::LocalNews),
                _ => return Err("usage: debug card event|news".to_string()),
            },
            Some("improve") => Command::DebugImprove(parse_number(words.next(), "tile")?),
            Some("bankrupt") => Command::DebugBankrupt,
            _ => return Err("unknown debug command".to_string()),
        },
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', type 'help'", other)),
    };
    Ok(command)
}

/// Start a game from the command line and play it on stdin/stdout
pub fn execute(
    paths: &DataPaths,
    names: Vec<String>,
    seed: Option<u64>,
    jackpot: bool,
    save_dir: &str,
    resume: bool,
) -> Result<(), CliError> {
    let (board, cards) = load_data(paths)?;
    let mut rng = GameRng::new(seed);
    let mut state = new_game(&board, &cards, &names, &mut rng)?;
    if jackpot {
        state.set_free_parking_jackpot(true);
    }

    let mut store = FileStore::new(save_dir);
    if resume && !load_game(&store, &mut state)? {
        println!("No saved game found, starting fresh.");
    }

    println!("=== Bangladeshi Monopoly === (seed: {})", rng.seed());
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(&mut state, &mut rng, &mut store, stdin.lock(), &mut stdout)
}

/// Read commands until the game ends, the input closes or the player quits
pub fn run_session<R: BufRead, W: Write>(
    state: &mut GameState,
    rng: &mut GameRng,
    store: &mut dyn KeyValueStore,
    input: R,
    out: &mut W,
) -> Result<(), CliError> {
    print_status(state, out)?;
    write_prompt(state, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write_prompt(state, out)?;
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => apply_command(state, rng, store, command, out)?,
            Err(message) => writeln!(out, "✗ {}", message)?,
        }

        if state.is_game_over() {
            writeln!(out, "\n=== Final standings ===")?;
            print_status(state, out)?;
            return Ok(());
        }
        write_prompt(state, out)?;
    }
    Ok(())
}

fn apply_command<W: Write>(
    state: &mut GameState,
    rng: &mut GameRng,
    store: &mut dyn KeyValueStore,
    command: Command,
    out: &mut W,
) -> Result<(), CliError> {
    let result: Result<Vec<GameEvent>, ActionError> = match command {
        Command::Roll => roll_dice(state, rng),
        Command::Buy => decide_purchase(state, true),
        Command::Pass => decide_purchase(state, false),
        Command::Jail(action) => jail_action(state, rng, action),
        Command::Build(tile) => build_house(state, tile),
        Command::Sell(tile) => sell_house(state, tile),
        Command::Mortgage(tile) => mortgage(state, tile),
        Command::Unmortgage(tile) => unmortgage(state, tile),
        Command::End => end_turn(state),
        Command::Jackpot(enabled) => Ok(state.set_free_parking_jackpot(enabled)),
        Command::DebugCash(player, amount) => debug::grant_cash(state, player, amount),
        Command::DebugGoto(tile) => debug::teleport(state, rng, tile),
        Command::DebugCard(deck) => debug::force_card(state, rng, deck),
        Command::DebugImprove(tile) => debug::add_improvement(state, tile),
        Command::DebugBankrupt => debug::force_bankruptcy(state),
        Command::Status => return print_status(state, out),
        Command::Board => return print_board(state, out),
        Command::Help => {
            writeln!(out, "{}", HELP)?;
            return Ok(());
        }
        Command::Save => {
            match save_game(store, state) {
                Ok(()) => writeln!(out, "Game saved.")?,
                Err(e) => {
                    log::warn!("save failed: {}", e);
                    writeln!(out, "✗ Could not save: {}", e)?;
                }
            }
            return Ok(());
        }
        Command::Load => {
            match load_game(store, state) {
                Ok(true) => {
                    writeln!(out, "Game loaded.")?;
                    print_status(state, out)?;
                }
                Ok(false) => writeln!(out, "No saved game found.")?,
                Err(e) => {
                    log::warn!("load failed: {}", e);
                    writeln!(out, "✗ Could not load: {}", e)?;
                }
            }
            return Ok(());
        }
        Command::ClearSave => {
            match clear_save(store) {
                Ok(()) => writeln!(out, "Saved game cleared.")?,
                Err(e) => writeln!(out, "✗ Could not clear the save: {}", e)?,
            }
            return Ok(());
        }
        Command::Quit => return Ok(()),
    };

    match result {
        Ok(events) => {
            for event in &events {
                writeln!(out, "  {}", event.describe(state))?;
            }
        }
        Err(e) => writeln!(out, "✗ {}", e)?,
    }
    Ok(())
}

fn write_prompt<W: Write>(state: &GameState, out: &mut W) -> io::Result<()> {
    if state.players.is_empty() || state.is_game_over() {
        return Ok(());
    }
    let player = state.current_player();
    let hint = match state.phase {
        TurnPhase::AwaitingRoll => "roll",
        TurnPhase::InJail => "pay / card / try",
        TurnPhase::AwaitingBuyDecision { .. } => "buy / pass",
        TurnPhase::AwaitingEndTurn => "build / sell / mortgage / end",
        _ => "",
    };
    write!(
        out,
        "[{} | {} | {}] {} > ",
        player.name,
        state.rules.money(player.cash),
        state.tiles[player.position].name,
        hint
    )?;
    out.flush()
}

fn print_status<W: Write>(state: &GameState, out: &mut W) -> Result<(), CliError> {
    for (id, worth) in state.standings() {
        let player = &state.players[id];
        let marker = if id == state.current_player_id() && !state.is_game_over() { "*" } else { " " };
        let flags = match (player.is_bankrupt, player.in_jail) {
            (true, _) => " (bankrupt)".to_string(),
            (false, true) => format!(" (in Thana, {} tries)", player.jail_turns),
            _ => String::new(),
        };
        writeln!(
            out,
            "{} {:<12} cash {:>10}  worth {:>10}  on {:<20} cards {}{}",
            marker,
            player.name,
            state.rules.money(player.cash),
            state.rules.money(worth),
            state.tiles[player.position].name,
            player.jail_free_cards,
            flags
        )?;
    }
    if state.rules.free_parking_jackpot {
        writeln!(out, "  Free Parking pot: {}", state.rules.money(state.free_parking_pot))?;
    }
    if let Some(winner) = state.winner() {
        writeln!(out, "Winner: {}", state.players[winner].name)?;
    }
    Ok(())
}

fn print_board<W: Write>(state: &GameState, out: &mut W) -> Result<(), CliError> {
    for tile in &state.tiles {
        let owner = tile
            .owner
            .and_then(|id| state.player(id))
            .map(|p| p.name.as_str())
            .unwrap_or("-");
        let buildings = if tile.has_hotel {
            "hotel".to_string()
        } else if tile.houses > 0 {
            format!("{} houses", tile.houses)
        } else {
            String::new()
        };
        let mortgaged = if tile.is_mortgaged { "mortgaged" } else { "" };
        let rent = rent_due(state, tile.id);
        writeln!(
            out,
            "{:>2} {:<24} {:<10} {:<10} {:<8} {:<9} {}",
            tile.id,
            tile.name,
            format!("{:?}", tile.kind),
            owner,
            buildings,
            mortgaged,
            if rent > 0 { state.rules.money(rent) } else { String::new() }
        )?;
    }
    Ok(())
}
