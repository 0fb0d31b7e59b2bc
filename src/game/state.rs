use crate::board::{BoardConfig, Money, PlayerId, RuleConfig, Tile, TileId, TileKind};
use crate::card::{CardDatabase, Deck, DeckKind};
use crate::game::error::SetupError;
use crate::game::events::GameEvent;
use crate::game::player::Player;
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Turn state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    NotStarted,
    AwaitingRoll,
    /// Current player starts the turn in jail and must choose a jail action
    InJail,
    Rolling,
    Moving,
    ResolvingLanding,
    AwaitingBuyDecision { tile_id: TileId },
    AwaitingEndTurn,
    GameOver { winner: Option<PlayerId> },
}

impl TurnPhase {
    /// Transient phases only observable inside a resolution step
    pub fn is_resolving(&self) -> bool {
        matches!(self, TurnPhase::Rolling | TurnPhase::Moving | TurnPhase::ResolvingLanding)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub tiles: Vec<Tile>,
    pub current_player_index: usize,
    pub dice: (u8, u8),
    pub free_parking_pot: Money,
    pub running: bool,
    pub rules: RuleConfig,
    pub phase: TurnPhase,
    pub turn: u32,
    pub jail_index: TileId,
    pub event_deck: Deck,
    pub local_news_deck: Deck,

    // Pending notifications, drained by each public operation
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh, not-yet-started game on the given board
    pub fn new(board: &BoardConfig, cards: &CardDatabase) -> Self {
        let mut tiles = board.tiles.clone();
        for tile in &mut tiles {
            tile.clear_ownership();
        }
        GameState {
            players: Vec::new(),
            tiles,
            current_player_index: 0,
            dice: (1, 1),
            free_parking_pot: 0,
            running: false,
            rules: board.rules.clone(),
            phase: TurnPhase::NotStarted,
            turn: 0,
            jail_index: board.jail_index().unwrap_or(0),
            event_deck: cards.deck(DeckKind::Event),
            local_news_deck: cards.deck(DeckKind::LocalNews),
            events: Vec::new(),
        }
    }

    /// Clear players, ownership, pot and decks. The game is left not running.
    pub fn reset(&mut self, rng: &mut GameRng) {
        self.players.clear();
        for tile in &mut self.tiles {
            tile.clear_ownership();
        }
        self.current_player_index = 0;
        self.dice = (1, 1);
        self.free_parking_pot = 0;
        self.running = false;
        self.phase = TurnPhase::NotStarted;
        self.turn = 0;
        self.event_deck.reset(rng);
        self.local_news_deck.reset(rng);
        self.events.clear();
    }

    /// Reset and seat the given players. Blank names become "Player N".
    pub fn start(&mut self, names: &[String], rng: &mut GameRng) -> Result<Vec<GameEvent>, SetupError> {
        if names.len() < MIN_PLAYERS || names.len() > MAX_PLAYERS {
            return Err(SetupError::InvalidPlayerCount(names.len()));
        }

        self.reset(rng);
        for (id, name) in names.iter().enumerate() {
            let name = name.trim();
            let name = if name.is_empty() {
                format!("Player {}", id + 1)
            } else {
                name.to_string()
            };
            self.players.push(Player::new(id, &name, self.rules.starting_cash));
        }

        self.running = true;
        self.turn = 1;
        self.phase = TurnPhase::AwaitingRoll;
        self.emit(GameEvent::GameStarted {
            players: self.players.len(),
        });
        self.emit(GameEvent::TurnStarted {
            player: 0,
            in_jail: false,
        });
        Ok(self.take_events())
    }

    /// Record a notification
    pub(crate) fn emit(&mut self, event: GameEvent) {
        log::info!("{}", event.describe(self));
        self.events.push(event);
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn board_len(&self) -> usize {
        self.tiles.len()
    }

    pub fn current_player_id(&self) -> PlayerId {
        self.current_player_index
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    pub fn current_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player_index]
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn deck(&self, kind: DeckKind) -> &Deck {
        match kind {
            DeckKind::Event => &self.event_deck,
            DeckKind::LocalNews => &self.local_news_deck,
        }
    }

    pub fn deck_mut(&mut self, kind: DeckKind) -> &mut Deck {
        match kind {
            DeckKind::Event => &mut self.event_deck,
            DeckKind::LocalNews => &mut self.local_news_deck,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            TurnPhase::GameOver { winner } => winner,
            _ => None,
        }
    }

    /// Players still in the game, in turn order
    pub fn active_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !p.is_bankrupt)
            .map(|p| p.id)
            .collect()
    }

    /// Tiles owned by a player, in board order
    pub fn owned_tiles(&self, player: PlayerId) -> Vec<&Tile> {
        self.tiles
            .iter()
            .filter(|t| t.owner == Some(player))
            .collect()
    }

    pub fn net_worth(&self, player: PlayerId) -> Money {
        self.players
            .get(player)
            .map(|p| p.net_worth(&self.tiles, &self.rules))
            .unwrap_or(0)
    }

    /// Players ranked by net worth, bankrupt players last
    pub fn standings(&self) -> Vec<(PlayerId, Money)> {
        let mut ranked: Vec<(PlayerId, Money)> = self
            .players
            .iter()
            .map(|p| (p.id, p.net_worth(&self.tiles, &self.rules)))
            .collect();
        ranked.sort_by(|a, b| {
            let a_out = self.players[a.0].is_bankrupt;
            let b_out = self.players[b.0].is_bankrupt;
            a_out.cmp(&b_out).then_with(|| b.1.cmp(&a.1))
        });
        ranked
    }

    /// Property tiles in a color group
    pub fn group_tiles<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Tile> + 'a {
        self.tiles.iter().filter(move |t| t.in_group(group))
    }

    /// Whether a player owns every property in a color group
    pub fn owns_group(&self, player: PlayerId, group: &str) -> bool {
        let mut tiles = self.group_tiles(group).peekable();
        tiles.peek().is_some() && tiles.all(|t| t.owner == Some(player))
    }

    /// Number of tiles of a kind owned by a player
    pub fn count_owned(&self, player: PlayerId, kind: TileKind) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.kind == kind && t.owner == Some(player))
            .count()
    }

    /// Enable or disable the free parking jackpot rule mid-game
    pub fn set_free_parking_jackpot(&mut self, enabled: bool) -> Vec<GameEvent> {
        self.rules.free_parking_jackpot = enabled;
        self.emit(GameEvent::JackpotToggled { enabled });
        self.take_events()
    }
}

/// Create and start a game in one step
pub fn new_game(
    board: &BoardConfig,
    cards: &CardDatabase,
    names: &[String],
    rng: &mut GameRng,
) -> Result<GameState, SetupError> {
    let mut state = GameState::new(board, cards);
    state.start(names, rng)?;
    Ok(state)
}
