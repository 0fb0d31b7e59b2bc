//! Configuration validation command.

use super::{load_data, CliError, DataPaths};
use crate::board::TileKind;
use crate::card::DeckKind;
use std::collections::BTreeMap;

/// Load the board and decks, run every check and print a summary
pub fn execute(paths: &DataPaths) -> Result<(), CliError> {
    println!(
        "Validating board: {}",
        paths.board.as_deref().unwrap_or("(built-in)")
    );
    println!();

    let (board, cards) = match load_data(paths) {
        Ok(data) => {
            print_check("Board and decks load", true);
            data
        }
        Err(e) => {
            print_check("Board and decks load", false);
            return Err(e);
        }
    };

    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for tile in &board.tiles {
        if let (TileKind::Property, Some(group)) = (tile.kind, tile.group.as_deref()) {
            *groups.entry(group).or_insert(0) += 1;
        }
    }
    let count = |kind: TileKind| board.tiles.iter().filter(|t| t.kind == kind).count();

    println!();
    println!("Summary:");
    println!("  Tiles:        {}", board.len());
    println!("  Properties:   {} in {} color groups", count(TileKind::Property), groups.len());
    for (group, size) in &groups {
        println!("    {:<12} {}", group, size);
    }
    println!("  Stations:     {}", count(TileKind::Station));
    println!("  Utilities:    {}", count(TileKind::Utility));
    println!("  Jail tile:    {}", board.jail_index().unwrap_or_default());
    println!("  Event cards:  {}", cards.cards(DeckKind::Event).len());
    println!("  News cards:   {}", cards.cards(DeckKind::LocalNews).len());
    println!("  Start cash:   {}", board.rules.money(board.rules.starting_cash));
    println!();
    println!("Validation successful!");
    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
