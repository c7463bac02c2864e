//! The room state machine: roster, turns, racks, scores and the game cycle.
//!
//! A [`RoomSession`] is plain data plus methods. It never spawns, locks or
//! sends anything; each operation returns the events to deliver and the
//! room actor does the delivery. Operations that fail leave the session
//! exactly as it was.

use rand::SeedableRng;
use rand::rngs::StdRng;
use scrabr_protocol::{
    PlayerId, PlayerView, Recipient, RoomCode, RoomPhase, RoomView, ServerEvent, Standing,
};
use scrabr_rules::{
    Board, DictionaryOracle, LetterPool, Placement, Rack, Variant, evaluate_play,
};

use crate::{RoomConfig, RoomError};

/// Events produced by one operation, each with its audience.
pub type Outbox = Vec<(Recipient, ServerEvent)>;

#[derive(Debug, Clone)]
struct Player {
    id: PlayerId,
    name: String,
    ready: bool,
    score: u32,
    rack: Rack,
}

/// The outcome of a turn, computed before anything is committed.
struct TurnResult {
    board: Board,
    rack: Rack,
    score: u32,
    words: Vec<String>,
}

/// Authoritative state of one room.
pub struct RoomSession {
    code: RoomCode,
    config: RoomConfig,
    variant: Variant,
    phase: RoomPhase,
    board: Board,
    pool: LetterPool,
    /// Join order. Turn rotation follows it.
    players: Vec<Player>,
    turn: Option<PlayerId>,
    winner: Option<PlayerId>,
    words_created: Vec<String>,
    rng: StdRng,
}

impl RoomSession {
    /// Creates an empty lobby with an OS-seeded generator.
    pub fn new(code: RoomCode, variant: Variant, config: RoomConfig) -> Self {
        Self::with_rng(code, variant, config, StdRng::from_os_rng())
    }

    /// Creates an empty lobby drawing tiles from `rng`.
    pub fn with_rng(code: RoomCode, variant: Variant, config: RoomConfig, rng: StdRng) -> Self {
        Self {
            code,
            config,
            variant,
            phase: RoomPhase::Lobby,
            board: Board::empty(),
            pool: LetterPool::new(variant),
            players: Vec::new(),
            turn: None,
            winner: None,
            words_created: Vec::new(),
            rng,
        }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Option<PlayerId> {
        self.turn
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn remaining_tiles(&self) -> u32 {
        self.pool.total()
    }

    pub fn words_created(&self) -> &[String] {
        &self.words_created
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.index_of(player_id).is_some()
    }

    pub fn score_of(&self, player_id: PlayerId) -> Option<u32> {
        self.player(player_id).map(|p| p.score)
    }

    pub fn rack_of(&self, player_id: PlayerId) -> Option<&Rack> {
        self.player(player_id).map(|p| &p.rack)
    }

    // -----------------------------------------------------------------------
    // Lobby
    // -----------------------------------------------------------------------

    /// Adds a player to the lobby.
    pub fn join(&mut self, player_id: PlayerId, name: String) -> Result<Outbox, RoomError> {
        if !self.phase.is_joinable() {
            return Err(RoomError::WrongPhase(self.phase));
        }
        if self.contains(player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, self.code.clone()));
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        self.players.push(Player {
            id: player_id,
            name,
            ready: false,
            score: 0,
            rack: Rack::new(),
        });
        tracing::info!(
            room = %self.code,
            %player_id,
            players = self.players.len(),
            "player joined"
        );

        let mut out = vec![(
            Recipient::Player(player_id),
            ServerEvent::RoomJoined {
                room: self.code.clone(),
                player_id,
            },
        )];
        out.extend(self.broadcast_state());
        Ok(out)
    }

    /// Flips a player's ready flag and starts the game once everyone is.
    pub fn toggle_ready(&mut self, player_id: PlayerId) -> Result<Outbox, RoomError> {
        if !self.phase.is_joinable() {
            return Err(RoomError::WrongPhase(self.phase));
        }
        let idx = self.require_member(player_id)?;
        self.players[idx].ready = !self.players[idx].ready;

        let everyone_ready = self.players.len() >= self.config.min_players
            && self.players.iter().all(|p| p.ready);
        if everyone_ready {
            if let Err(err) = self.start_game() {
                self.players[idx].ready = !self.players[idx].ready;
                return Err(err);
            }
        }
        Ok(self.broadcast_state())
    }

    /// Deals a rack to every player in join order and hands the turn to the
    /// first of them.
    fn start_game(&mut self) -> Result<(), RoomError> {
        let mut pool = LetterPool::new(self.variant);
        let mut racks = Vec::with_capacity(self.players.len());
        for _ in 0..self.players.len() {
            let mut rack = Rack::new();
            pool.fill_rack(&mut rack, &mut self.rng)?;
            racks.push(rack);
        }

        for (player, rack) in self.players.iter_mut().zip(racks) {
            player.rack = rack;
            player.score = 0;
        }
        self.pool = pool;
        self.board = Board::empty();
        self.words_created.clear();
        self.phase = self.phase.next();
        self.turn = self.players.first().map(|p| p.id);

        tracing::info!(
            room = %self.code,
            players = self.players.len(),
            variant = ?self.variant,
            remaining = self.pool.total(),
            "game started"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------------

    /// Prices a tentative play for the turn holder without committing it.
    ///
    /// Out-of-turn and pre-game checks are ignored: they produce no events.
    pub async fn check_play<D: DictionaryOracle>(
        &self,
        player_id: PlayerId,
        placements: &[Placement],
        oracle: &D,
    ) -> Result<Outbox, RoomError> {
        let idx = self.require_member(player_id)?;
        if self.phase != RoomPhase::InProgress || self.turn != Some(player_id) {
            return Ok(Vec::new());
        }

        let play = evaluate_play(&self.board, &self.players[idx].rack, placements, oracle).await?;
        Ok(vec![(
            Recipient::Player(player_id),
            ServerEvent::PlayPriced {
                words: play.words,
                total: play.total,
            },
        )])
    }

    /// Applies a play by the turn holder.
    ///
    /// The play is fully evaluated before anything changes, so a rejected
    /// play leaves the room untouched and the turn where it was.
    pub async fn commit_play<D: DictionaryOracle>(
        &mut self,
        player_id: PlayerId,
        placements: &[Placement],
        oracle: &D,
    ) -> Result<Outbox, RoomError> {
        let idx = self.require_turn(player_id)?;
        let play = evaluate_play(&self.board, &self.players[idx].rack, placements, oracle).await?;

        let mut rack = self.players[idx].rack.clone();
        rack.take_letters(&play.consumed)?;
        let words: Vec<String> = play.words.into_iter().map(|w| w.word).collect();

        tracing::info!(
            room = %self.code,
            %player_id,
            score = play.total,
            ?words,
            "play accepted"
        );
        self.advance(
            idx,
            TurnResult {
                board: play.board,
                rack,
                score: play.total,
                words,
            },
        )
    }

    /// Passes the turn. Behaves like a play with no tiles.
    pub fn skip(&mut self, player_id: PlayerId) -> Result<Outbox, RoomError> {
        let idx = self.require_turn(player_id)?;
        tracing::debug!(room = %self.code, %player_id, "turn skipped");
        self.advance(
            idx,
            TurnResult {
                board: self.board.clone(),
                rack: self.players[idx].rack.clone(),
                score: 0,
                words: Vec::new(),
            },
        )
    }

    /// Moves the turn to the next player and tops up their rack, or ends
    /// the game if the bag cannot fill it.
    fn advance(&mut self, idx: usize, result: TurnResult) -> Result<Outbox, RoomError> {
        let next = (idx + 1) % self.players.len();
        let mut next_rack = if next == idx {
            result.rack.clone()
        } else {
            self.players[next].rack.clone()
        };

        if !self.pool.can_fill(&next_rack) {
            self.players[idx].score += result.score;
            return Ok(self.finish_game());
        }

        let mut pool = self.pool.clone();
        pool.fill_rack(&mut next_rack, &mut self.rng)?;

        self.board = result.board;
        self.pool = pool;
        self.words_created.extend(result.words);
        self.players[idx].rack = result.rack;
        self.players[idx].score += result.score;
        self.players[next].rack = next_rack;
        self.turn = Some(self.players[next].id);

        Ok(self.broadcast_state())
    }

    /// Records the winner and resets the room to a fresh lobby.
    fn finish_game(&mut self) -> Outbox {
        self.phase = self.phase.next();

        let mut standings: Vec<Standing> = self
            .players
            .iter()
            .map(|p| Standing {
                id: p.id,
                name: p.name.clone(),
                score: p.score,
            })
            .collect();
        // Stable: ties keep join order, so the earliest joiner wins them.
        standings.sort_by(|a, b| b.score.cmp(&a.score));
        let winner = standings.first().map(|s| s.id);

        tracing::info!(
            room = %self.code,
            winner = ?winner,
            top_score = standings.first().map_or(0, |s| s.score),
            "game finished"
        );

        self.winner = winner;
        self.board = Board::empty();
        self.pool = LetterPool::new(self.variant);
        self.words_created.clear();
        self.turn = None;
        for player in &mut self.players {
            player.rack.clear();
            player.ready = false;
            player.score = 0;
        }
        self.phase = self.phase.next();

        let mut out = vec![(Recipient::All, ServerEvent::GameOver { winner, standings })];
        out.extend(self.broadcast_state());
        out
    }

    // -----------------------------------------------------------------------
    // Departure
    // -----------------------------------------------------------------------

    /// Removes a player. The turn is left where it was, even if it belonged
    /// to the player leaving.
    pub fn leave(&mut self, player_id: PlayerId) -> Result<Outbox, RoomError> {
        let idx = self.require_member(player_id)?;
        self.players.remove(idx);
        tracing::info!(
            room = %self.code,
            %player_id,
            players = self.players.len(),
            "player left"
        );
        Ok(self.broadcast_state())
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// The room as `viewer` may see it: everything public plus their own rack.
    pub fn view_for(&self, viewer: PlayerId) -> RoomView {
        RoomView {
            code: self.code.clone(),
            phase: self.phase,
            variant: self.variant,
            board: self.board.clone(),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    name: p.name.clone(),
                    ready: p.ready,
                    score: p.score,
                    rack_size: p.rack.len(),
                })
                .collect(),
            turn: self.turn,
            winner: self.winner,
            words_created: self.words_created.clone(),
            remaining_tiles: self.pool.total(),
            rack: self
                .player(viewer)
                .map(|p| p.rack.tiles().to_vec())
                .unwrap_or_default(),
        }
    }

    /// A snapshot for one player, used to resync a stale client.
    pub fn snapshot_for(&self, player_id: PlayerId) -> Outbox {
        vec![(
            Recipient::Player(player_id),
            ServerEvent::GameState(self.view_for(player_id)),
        )]
    }

    /// One personalised snapshot per player.
    fn broadcast_state(&self) -> Outbox {
        self.players
            .iter()
            .flat_map(|p| self.snapshot_for(p.id))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    fn index_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    fn require_member(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        self.index_of(player_id)
            .ok_or_else(|| RoomError::NotInRoom(player_id, self.code.clone()))
    }

    /// Checks that a game is running and `player_id` holds the turn.
    fn require_turn(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        if self.phase != RoomPhase::InProgress {
            return Err(RoomError::WrongPhase(self.phase));
        }
        let idx = self.require_member(player_id)?;
        if self.turn != Some(player_id) {
            return Err(RoomError::NotYourTurn(player_id));
        }
        Ok(idx)
    }
}

#[cfg(test)]
mod tests {
    use scrabr_rules::{Letter, Position, Tile, TileId, WordList};

    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn session() -> RoomSession {
        RoomSession::with_rng(
            RoomCode::parse("TEST01").unwrap(),
            Variant::Standard,
            RoomConfig::default(),
            StdRng::seed_from_u64(11),
        )
    }

    fn oracle() -> WordList {
        WordList::from_words(["casa", "mar", "as", "os", "mo"])
    }

    fn rack_of(letters: &str) -> Rack {
        letters
            .chars()
            .enumerate()
            .map(|(i, c)| Tile {
                id: TileId(100 + i as u64),
                letter: Letter::new(c).unwrap(),
            })
            .collect()
    }

    fn across(row: usize, col: usize, word: &str) -> Vec<Placement> {
        word.chars()
            .enumerate()
            .map(|(i, c)| {
                Placement::new(Position::new(row, col + i).unwrap(), Letter::new(c).unwrap())
            })
            .collect()
    }

    /// Two players, both ready, game running with player 1 to move.
    fn started() -> RoomSession {
        let mut s = session();
        s.join(pid(1), "Ana".into()).unwrap();
        s.join(pid(2), "Bia".into()).unwrap();
        s.toggle_ready(pid(1)).unwrap();
        s.toggle_ready(pid(2)).unwrap();
        s
    }

    fn set_rack(s: &mut RoomSession, player: PlayerId, letters: &str) {
        let idx = s.index_of(player).unwrap();
        s.players[idx].rack = rack_of(letters);
    }

    fn events_for(out: &Outbox, player: PlayerId) -> Vec<&ServerEvent> {
        out.iter()
            .filter(|(r, _)| r.includes(player))
            .map(|(_, e)| e)
            .collect()
    }

    #[test]
    fn test_join_sends_confirmation_and_personal_snapshots() {
        let mut s = session();
        s.join(pid(1), "Ana".into()).unwrap();
        let out = s.join(pid(2), "Bia".into()).unwrap();

        let to_bia = events_for(&out, pid(2));
        assert!(matches!(to_bia[0], ServerEvent::RoomJoined { player_id, .. } if *player_id == pid(2)));
        assert!(matches!(to_bia[1], ServerEvent::GameState(view) if view.players.len() == 2));

        let to_ana = events_for(&out, pid(1));
        assert_eq!(to_ana.len(), 1, "only Bia gets the join confirmation");
    }

    #[test]
    fn test_join_refusals() {
        let mut s = RoomSession::with_rng(
            RoomCode::parse("TEST02").unwrap(),
            Variant::Standard,
            RoomConfig {
                max_players: 2,
                ..RoomConfig::default()
            },
            StdRng::seed_from_u64(1),
        );
        s.join(pid(1), "Ana".into()).unwrap();
        assert!(matches!(
            s.join(pid(1), "Ana".into()),
            Err(RoomError::AlreadyInRoom(..))
        ));
        s.join(pid(2), "Bia".into()).unwrap();
        assert!(matches!(s.join(pid(3), "Caio".into()), Err(RoomError::RoomFull(_))));
    }

    #[test]
    fn test_cannot_join_a_running_game() {
        let mut s = started();
        let err = s.join(pid(3), "Caio".into()).unwrap_err();
        assert!(matches!(err, RoomError::WrongPhase(RoomPhase::InProgress)));
    }

    #[test]
    fn test_single_ready_player_does_not_start() {
        let mut s = session();
        s.join(pid(1), "Ana".into()).unwrap();
        s.toggle_ready(pid(1)).unwrap();
        assert_eq!(s.phase(), RoomPhase::Lobby);

        s.join(pid(2), "Bia".into()).unwrap();
        assert_eq!(s.phase(), RoomPhase::Lobby, "Bia is not ready yet");
    }

    #[test]
    fn test_toggle_ready_twice_unreadies() {
        let mut s = session();
        s.join(pid(1), "Ana".into()).unwrap();
        s.join(pid(2), "Bia".into()).unwrap();
        s.toggle_ready(pid(1)).unwrap();
        s.toggle_ready(pid(1)).unwrap();
        s.toggle_ready(pid(2)).unwrap();
        assert_eq!(s.phase(), RoomPhase::Lobby);
    }

    #[test]
    fn test_all_ready_deals_racks_and_gives_first_joiner_the_turn() {
        let s = started();
        assert_eq!(s.phase(), RoomPhase::InProgress);
        assert_eq!(s.turn(), Some(pid(1)));
        assert_eq!(s.rack_of(pid(1)).unwrap().len(), 7);
        assert_eq!(s.rack_of(pid(2)).unwrap().len(), 7);
        assert_eq!(s.remaining_tiles(), 119 - 14);
    }

    #[test]
    fn test_view_shows_only_own_rack() {
        let s = started();
        let view = s.view_for(pid(1));
        assert_eq!(view.rack, s.rack_of(pid(1)).unwrap().tiles());
        assert_eq!(view.players[1].rack_size, 7);
        assert_ne!(s.view_for(pid(2)).rack, view.rack);
    }

    #[tokio::test]
    async fn test_commit_first_move() {
        let mut s = started();
        set_rack(&mut s, pid(1), "casaeio");
        let before = s.remaining_tiles();

        let out = s.commit_play(pid(1), &across(7, 5, "casa"), &oracle()).await.unwrap();

        assert_eq!(s.score_of(pid(1)), Some(5));
        assert_eq!(s.words_created(), ["casa"]);
        assert_eq!(s.turn(), Some(pid(2)));
        assert_eq!(s.rack_of(pid(1)).unwrap().len(), 3, "acting rack is not refilled");
        assert_eq!(s.remaining_tiles(), before, "next rack was already full");
        assert_eq!(s.board().get(Position::CENTER), Letter::new('s'));
        assert_eq!(events_for(&out, pid(2)).len(), 1);
    }

    #[tokio::test]
    async fn test_next_player_is_topped_up() {
        let mut s = started();
        set_rack(&mut s, pid(1), "casaeio");
        s.commit_play(pid(1), &across(7, 5, "casa"), &oracle()).await.unwrap();
        s.skip(pid(2)).unwrap();

        assert_eq!(s.turn(), Some(pid(1)));
        assert_eq!(s.rack_of(pid(1)).unwrap().len(), 7);
        assert_eq!(s.remaining_tiles(), 119 - 14 - 4);
    }

    #[tokio::test]
    async fn test_out_of_turn_commit_is_a_desync() {
        let mut s = started();
        let err = s
            .commit_play(pid(2), &across(7, 5, "casa"), &oracle())
            .await
            .unwrap_err();
        assert!(err.is_desync());
        assert!(s.board().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_commit_changes_nothing() {
        let mut s = started();
        set_rack(&mut s, pid(1), "zzqaeio");
        let rack = s.rack_of(pid(1)).unwrap().clone();

        let err = s
            .commit_play(pid(1), &across(7, 6, "zzq"), &oracle())
            .await
            .unwrap_err();

        assert!(err.is_rule_violation());
        assert_eq!(s.turn(), Some(pid(1)));
        assert_eq!(s.rack_of(pid(1)), Some(&rack));
        assert!(s.board().is_empty());
        assert_eq!(s.score_of(pid(1)), Some(0));
    }

    #[tokio::test]
    async fn test_commit_with_tiles_not_on_rack_is_rejected() {
        let mut s = started();
        set_rack(&mut s, pid(1), "caeiouu");
        let err = s
            .commit_play(pid(1), &across(7, 5, "casa"), &oracle())
            .await
            .unwrap_err();
        assert!(err.is_rule_violation());
    }

    #[test]
    fn test_skip_rotates_and_wraps() {
        let mut s = started();
        s.skip(pid(1)).unwrap();
        assert_eq!(s.turn(), Some(pid(2)));
        s.skip(pid(2)).unwrap();
        assert_eq!(s.turn(), Some(pid(1)));
    }

    #[test]
    fn test_skip_before_game_is_a_desync() {
        let mut s = session();
        s.join(pid(1), "Ana".into()).unwrap();
        let err = s.skip(pid(1)).unwrap_err();
        assert!(err.is_desync());
    }

    #[tokio::test]
    async fn test_game_ends_when_bag_cannot_fill_next_rack() {
        let mut s = started();
        set_rack(&mut s, pid(1), "casaeio");
        set_rack(&mut s, pid(2), "aeiou");
        s.pool = LetterPool::from_counts([(Letter::new('a').unwrap(), 1)]);

        let out = s.commit_play(pid(1), &across(7, 5, "casa"), &oracle()).await.unwrap();

        let over = out
            .iter()
            .find_map(|(r, e)| match e {
                ServerEvent::GameOver { winner, standings } if *r == Recipient::All => {
                    Some((*winner, standings.clone()))
                }
                _ => None,
            })
            .expect("game over event");
        assert_eq!(over.0, Some(pid(1)));
        assert_eq!(over.1[0].score, 5);
        assert_eq!(over.1[1].id, pid(2));

        assert_eq!(s.phase(), RoomPhase::Lobby);
        assert_eq!(s.winner(), Some(pid(1)));
        assert_eq!(s.turn(), None);
        assert!(s.board().is_empty());
        assert!(s.words_created().is_empty());
        assert_eq!(s.score_of(pid(1)), Some(0));
        assert!(s.rack_of(pid(2)).unwrap().is_empty());
        assert_eq!(s.remaining_tiles(), 119);
        assert!(s.view_for(pid(1)).players.iter().all(|p| !p.ready));
    }

    #[test]
    fn test_tied_game_goes_to_first_joiner() {
        let mut s = started();
        s.pool = LetterPool::from_counts([]);
        set_rack(&mut s, pid(2), "aeiou");
        s.skip(pid(1)).unwrap();
        assert_eq!(s.winner(), Some(pid(1)));
        assert_eq!(s.phase(), RoomPhase::Lobby);
    }

    #[test]
    fn test_new_game_can_start_after_reset() {
        let mut s = started();
        s.pool = LetterPool::from_counts([]);
        set_rack(&mut s, pid(2), "a");
        s.skip(pid(1)).unwrap();

        s.toggle_ready(pid(1)).unwrap();
        s.toggle_ready(pid(2)).unwrap();
        assert_eq!(s.phase(), RoomPhase::InProgress);
        assert_eq!(s.remaining_tiles(), 119 - 14);
    }

    #[test]
    fn test_bag_ends_game_only_when_it_falls_short() {
        let mut s = started();
        set_rack(&mut s, pid(2), "aeiou");
        s.pool = LetterPool::from_counts([(Letter::new('s').unwrap(), 2)]);

        // Exactly enough to top Bia up.
        s.skip(pid(1)).unwrap();
        assert_eq!(s.phase(), RoomPhase::InProgress);
        assert_eq!(s.rack_of(pid(2)).unwrap().len(), 7);
        assert_eq!(s.remaining_tiles(), 0);

        // An empty bag is fine while Ana's rack is still full.
        s.skip(pid(2)).unwrap();
        assert_eq!(s.phase(), RoomPhase::InProgress);
        assert_eq!(s.turn(), Some(pid(1)));

        set_rack(&mut s, pid(2), "aeiouu");
        s.skip(pid(1)).unwrap();
        assert_eq!(s.phase(), RoomPhase::Lobby);
    }

    #[tokio::test]
    async fn test_commits_never_clear_earlier_tiles() {
        let mut s = started();
        let oracle = oracle();
        let at = |row, col| Position::new(row, col).unwrap();
        let letter = |c| Letter::new(c).unwrap();
        let turns = [
            (pid(1), "casaeio", across(7, 5, "casa")),
            (
                pid(2),
                "mreiouu",
                vec![
                    Placement::new(at(6, 6), letter('m')),
                    Placement::new(at(8, 6), letter('r')),
                ],
            ),
            (pid(1), "seiouuu", vec![Placement::new(at(8, 8), letter('s'))]),
        ];

        for (player, rack, placements) in turns {
            set_rack(&mut s, player, rack);
            let before: Vec<_> = s.board().occupied().collect();

            s.commit_play(player, &placements, &oracle).await.unwrap();

            for (pos, l) in &before {
                assert_eq!(s.board().get(*pos), Some(*l), "{pos:?} lost its tile");
            }
            assert_eq!(s.board().occupied().count(), before.len() + placements.len());
        }
        assert_eq!(s.words_created(), ["casa", "mar", "as"]);
    }

    #[test]
    fn test_leave_on_own_turn_keeps_turn() {
        let mut s = started();
        s.leave(pid(1)).unwrap();
        assert_eq!(s.turn(), Some(pid(1)));
        assert_eq!(s.player_count(), 1);
        assert!(matches!(s.skip(pid(2)), Err(RoomError::NotYourTurn(_))));
    }

    #[test]
    fn test_last_player_leaving_empties_room() {
        let mut s = session();
        s.join(pid(1), "Ana".into()).unwrap();
        let out = s.leave(pid(1)).unwrap();
        assert!(out.is_empty());
        assert!(s.is_empty());
        assert!(matches!(s.leave(pid(1)), Err(RoomError::NotInRoom(..))));
    }

    #[tokio::test]
    async fn test_check_play_prices_without_committing() {
        let mut s = started();
        set_rack(&mut s, pid(1), "casaeio");

        let out = s.check_play(pid(1), &across(7, 5, "casa"), &oracle()).await.unwrap();

        assert_eq!(out.len(), 1);
        assert!(matches!(
            &out[0],
            (Recipient::Player(p), ServerEvent::PlayPriced { total: 5, .. }) if *p == pid(1)
        ));
        assert!(s.board().is_empty());
        assert_eq!(s.turn(), Some(pid(1)));
    }

    #[tokio::test]
    async fn test_check_play_out_of_turn_is_a_no_op() {
        let s = started();
        let out = s.check_play(pid(2), &across(7, 5, "casa"), &oracle()).await.unwrap();
        assert!(out.is_empty());

        let mut lobby = session();
        lobby.join(pid(1), "Ana".into()).unwrap();
        let out = lobby.check_play(pid(1), &across(7, 5, "casa"), &oracle()).await.unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_blitz_room_uses_smaller_bag() {
        let s = RoomSession::with_rng(
            RoomCode::parse("BLITZ1").unwrap(),
            Variant::Blitz,
            RoomConfig::default(),
            StdRng::seed_from_u64(5),
        );
        assert_eq!(s.remaining_tiles(), 65);
        assert!(s.view_for(pid(1)).variant.is_blitz());
    }
}
