/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, trace, warn};

use super::{
    perft, Board, CastlingRights, CheckInfo, Color, File, Move, MoveGen, MoveList, Piece,
    PieceKind, Rank, Square, FEN_STARTPOS,
};

/// Where a [`Game`] stands, as a function of its current position alone.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum GameStatus {
    /// The side to move is not in check and has at least one legal move.
    #[default]
    Normal,

    /// The side to move is in check and has at least one legal move.
    InCheck,

    /// The side to move is in check and has no legal moves.
    Checkmate,

    /// The side to move is not in check and has no legal moves.
    Stalemate,
}

impl GameStatus {
    /// Returns `true` if no further moves can be made.
    #[inline(always)]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "normal",
            Self::InCheck => "check",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
        };
        write!(f, "{s}")
    }
}

/// A game of chess.
///
/// This type owns the board along with everything needed to generate legal moves and to undo
/// moves exactly: the King locations, castling rights, the en passant target, and a log of every
/// move played along with the state it replaced.
///
/// The basic methods you're probably looking for are [`Game::legal_moves`], [`Game::make_move`],
/// and [`Game::undo_move`].
#[derive(Clone)]
pub struct Game {
    /// The placement of every piece.
    board: Board,

    /// Whose turn it is.
    side_to_move: Color,

    /// Where each color's King stands, indexed by [`Color`].
    kings: [Square; Color::COUNT],

    /// Castling rights for the current position.
    castling_rights: CastlingRights,

    /// The square a Pawn skipped over on the previous ply, if it advanced two squares.
    ep_square: Option<Square>,

    /// Plies since the last capture or Pawn move.
    halfmove: usize,

    /// Starts at 1 and increments after Black moves.
    fullmove: usize,

    /// Every move played so far, oldest first.
    history: Vec<Move>,

    /// Castling rights after each ply, starting with the rights the game was set up with.
    castling_log: Vec<CastlingRights>,

    /// En passant target after each ply, starting with the target the game was set up with.
    ep_log: Vec<Option<Square>>,

    /// Halfmove clock after each ply, starting with the clock the game was set up with.
    halfmove_log: Vec<usize>,

    /// Legal moves for the side to move, refreshed after every change of position.
    legal_moves: MoveList,

    /// Check and terminal status for the side to move.
    status: GameStatus,
}

impl Game {
    /// Creates a new [`Game`] at the standard starting position.
    ///
    /// # Example
    /// ```
    /// # use newt::Game;
    /// let game = Game::new();
    /// assert_eq!(game.legal_moves().len(), 20);
    /// ```
    pub fn new() -> Self {
        Self::with_kings(
            Board::startpos(),
            [Square::E1, Square::E8],
            Color::White,
            CastlingRights::ALL,
            None,
            0,
            1,
        )
    }

    /// Builds a [`Game`] around an arbitrary position, failing if either side does not have
    /// exactly one King.
    fn from_parts(
        board: Board,
        side_to_move: Color,
        castling_rights: CastlingRights,
        ep_square: Option<Square>,
        halfmove: usize,
        fullmove: usize,
    ) -> Result<Self> {
        let mut kings = [Square::default(); Color::COUNT];
        for color in Color::all() {
            let king = Piece::new(color, PieceKind::King);
            let mut found = board.find(king);

            kings[color] = found
                .next()
                .ok_or_else(|| anyhow!("Position has no {}", king.name()))?;
            if found.next().is_some() {
                bail!("Position has more than one {}", king.name());
            }
        }

        // The side that just moved cannot have left its King attacked
        let waiting = side_to_move.opponent();
        if CheckInfo::for_side(&board, &kings, waiting).is_in_check() {
            bail!("{} is in check, but it is not their turn", waiting.name());
        }

        if let Some(ep) = ep_square {
            let expected = Rank::SIX.relative_to(side_to_move);
            if ep.rank() != expected {
                bail!(
                    "En passant target {ep} must be on rank {expected} when {} is to move",
                    side_to_move.name()
                );
            }
        }

        Ok(Self::with_kings(
            board,
            kings,
            side_to_move,
            castling_rights,
            ep_square,
            halfmove,
            fullmove,
        ))
    }

    /// Builds a [`Game`] whose King locations are already known.
    fn with_kings(
        board: Board,
        kings: [Square; Color::COUNT],
        side_to_move: Color,
        castling_rights: CastlingRights,
        ep_square: Option<Square>,
        halfmove: usize,
        fullmove: usize,
    ) -> Self {
        let mut game = Self {
            board,
            side_to_move,
            kings,
            castling_rights,
            ep_square,
            halfmove,
            fullmove,
            history: Vec::with_capacity(128),
            castling_log: vec![castling_rights],
            ep_log: vec![ep_square],
            halfmove_log: vec![halfmove],
            legal_moves: MoveList::new(),
            status: GameStatus::Normal,
        };

        game.refresh();
        game
    }

    /// Creates a new [`Game`] from the provided FEN string.
    ///
    /// Every field after the piece placements is optional and defaults to `w - - 0 1`.
    ///
    /// # Example
    /// ```
    /// # use newt::{Color, Game};
    /// let game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R b K - 3 40").unwrap();
    /// assert_eq!(game.side_to_move(), Color::Black);
    /// assert_eq!(game.to_fen(), "4k3/8/8/8/8/8/8/4K2R b K - 3 40");
    ///
    /// assert!(Game::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut split = fen.split_whitespace();
        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;
        let board = Board::from_fen(placements)?;

        let active_color = split.next().unwrap_or("w");
        let side_to_move = Color::from_str(active_color)
            .with_context(|| format!("Invalid side to move in FEN {fen:?}"))?;

        let castling_rights = CastlingRights::from_uci(split.next().unwrap_or("-"))?;

        let ep_square = match split.next().unwrap_or("-") {
            "-" => None,
            square => Some(
                Square::from_uci(square)
                    .with_context(|| format!("Invalid en passant target in FEN {fen:?}"))?,
            ),
        };

        let halfmove = split.next().unwrap_or("0");
        let halfmove = halfmove.parse().or(Err(anyhow!(
            "FEN string must have valid halfmove counter. Got {halfmove:?}"
        )))?;

        let fullmove = split.next().unwrap_or("1");
        let fullmove = fullmove.parse().or(Err(anyhow!(
            "FEN string must have valid fullmove counter. Got {fullmove:?}"
        )))?;

        Self::from_parts(
            board,
            side_to_move,
            castling_rights,
            ep_square,
            halfmove,
            fullmove,
        )
    }

    /// Formats the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        let ep = self
            .ep_square
            .map(|square| square.to_uci())
            .unwrap_or_else(|| String::from("-"));

        format!(
            "{} {} {} {ep} {} {}",
            self.board.to_fen(),
            self.side_to_move.to_uci(),
            self.castling_rights,
            self.halfmove,
            self.fullmove,
        )
    }

    /// Discards all history and returns to the standard starting position.
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("Game reset to {FEN_STARTPOS}");
    }

    /// The board as it currently stands.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The [`Color`] whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The square `color`'s King stands on.
    #[inline(always)]
    pub const fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// The current castling rights.
    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// The square a Pawn may capture onto en passant this ply, if any.
    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Every move played so far, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// The check and terminal status of the side to move.
    #[inline(always)]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns `true` if the side to move is in check.
    #[inline(always)]
    pub const fn is_in_check(&self) -> bool {
        matches!(self.status, GameStatus::InCheck | GameStatus::Checkmate)
    }

    /// Returns `true` if the side to move is in check and cannot escape.
    #[inline(always)]
    pub const fn is_checkmate(&self) -> bool {
        matches!(self.status, GameStatus::Checkmate)
    }

    /// Returns `true` if the side to move is not in check but has no legal moves.
    #[inline(always)]
    pub const fn is_stalemate(&self) -> bool {
        matches!(self.status, GameStatus::Stalemate)
    }

    /// Every legal move for the side to move, in board order of the moving piece.
    ///
    /// A Pawn reaching its last rank appears once, with a pending promotion that must be resolved
    /// through [`Move::with_promotion`] before it is played.
    #[inline(always)]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// Every legal move of the piece on `square`.
    pub fn legal_moves_from(&self, square: Square) -> impl Iterator<Item = Move> + '_ {
        self.legal_moves
            .iter()
            .copied()
            .filter(move |mv| mv.from() == square)
    }

    /// Scans for checks and pins against the side to move.
    #[inline(always)]
    pub fn check_info(&self) -> CheckInfo {
        CheckInfo::for_side(&self.board, &self.kings, self.side_to_move)
    }

    /// Computes the legal moves of the side to move from scratch.
    ///
    /// Pins and checks are recomputed first. Out of check, this is every move the per-piece
    /// generators produce. In single check, only King moves and moves that block or capture the
    /// checker remain. In double check, only King moves remain.
    pub fn generate_legal_moves(&mut self) -> MoveList {
        let info = self.check_info();

        MoveGen::new(
            &self.board,
            &mut self.kings,
            self.side_to_move,
            &info,
            self.castling_rights,
            self.ep_square,
        )
        .generate()
    }

    /// Recomputes the legal move list and status after the position changed.
    fn refresh(&mut self) {
        self.legal_moves = self.generate_legal_moves();
        let in_check = self.check_info().is_in_check();

        self.status = match (self.legal_moves.is_empty(), in_check) {
            (false, false) => GameStatus::Normal,
            (false, true) => GameStatus::InCheck,
            (true, true) => GameStatus::Checkmate,
            (true, false) => GameStatus::Stalemate,
        };

        trace!(
            "{} has {} legal moves in {}",
            self.side_to_move.name(),
            self.legal_moves.len(),
            self.board.to_fen()
        );
        if self.status.is_terminal() {
            info!("{} is in {}", self.side_to_move.name(), self.status);
        }
    }

    /// Finds the legal move from `from` to `to`, if there is one.
    #[inline(always)]
    pub fn find_move(&self, from: Square, to: Square) -> Option<Move> {
        self.legal_moves
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to)
    }

    /// Converts a string such as `e2e4` or `e7e8q` into one of the current legal moves.
    ///
    /// A promotion given without a fifth character is returned still pending.
    ///
    /// # Example
    /// ```
    /// # use newt::{Game, PieceKind};
    /// let game = Game::from_fen("8/4P3/8/8/8/8/8/k6K w - - 0 1").unwrap();
    /// let mv = game.parse_move("e7e8n").unwrap();
    /// assert_eq!(mv.promotion(), Some(PieceKind::Knight));
    ///
    /// assert!(game.parse_move("e7e6").is_err());
    /// assert!(game.parse_move("h1h1h1").is_err());
    /// ```
    pub fn parse_move(&self, mv_str: &str) -> Result<Move> {
        let mv_str = mv_str.trim();
        let (from, to, promotion) = match (mv_str.get(0..2), mv_str.get(2..4), mv_str.get(4..)) {
            (Some(from), Some(to), Some(promotion)) if promotion.len() <= 1 => {
                (from, to, promotion.chars().next())
            }
            _ => bail!("Move {mv_str:?} must be two squares followed by an optional promotion, such as \"e7e8q\""),
        };

        let from = Square::from_uci(from)?;
        let to = Square::from_uci(to)?;
        let Some(mv) = self.find_move(from, to) else {
            bail!("{mv_str} is not a legal move in {}", self.to_fen());
        };

        match promotion {
            Some(c) => mv.with_promotion(PieceKind::from_uci(c)?),
            None => Ok(mv),
        }
    }

    /// Applies the provided [`Move`], which must be one of [`Game::legal_moves`].
    ///
    /// A promotion left pending is resolved to a Queen.
    pub fn make_move(&mut self, mv: Move) {
        let mv = if mv.is_pending_promotion() {
            warn!("Move {mv} was played with an unresolved promotion; promoting to a queen");
            mv.with_promotion(PieceKind::Queen).unwrap_or(mv)
        } else {
            mv
        };

        let color = mv.piece().color();

        self.board.clear(mv.from());
        if mv.is_en_passant() {
            self.board.clear(mv.captured_square());
        }
        self.board.place(mv.landing_piece(), mv.to());

        if let Some(side) = mv.castle_side() {
            if let Some(rook) = self.board.take(side.rook_from(color)) {
                self.board.place(rook, side.rook_to(color));
            }
        }

        if mv.piece().is_king() {
            self.kings[color] = mv.to();
            self.castling_rights.revoke_all(color);
        }
        if mv.piece().is_rook() {
            self.castling_rights.revoke_corner(mv.from());
        }
        if mv.captured().is_some_and(|captured| captured.is_rook()) {
            self.castling_rights.revoke_corner(mv.to());
        }

        self.ep_square = if mv.is_pawn_double_push() {
            mv.from().forward_by(color, 1)
        } else {
            None
        };

        if mv.piece().is_pawn() || mv.is_capture() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }
        if color.is_black() {
            self.fullmove += 1;
        }

        self.history.push(mv);
        self.castling_log.push(self.castling_rights);
        self.ep_log.push(self.ep_square);
        self.halfmove_log.push(self.halfmove);
        self.side_to_move = color.opponent();

        debug!("{} played {}", color.name(), mv.to_uci());
        self.refresh();
    }

    /// Applies the provided [`Move`] only if it is currently legal.
    ///
    /// Unlike [`Game::make_move`], a pending promotion is an error here.
    pub fn make_move_checked(&mut self, mv: Move) -> Result<()> {
        let Some(legal) = self.find_move(mv.from(), mv.to()) else {
            bail!("{mv} is not a legal move in {}", self.to_fen());
        };
        if mv.is_pending_promotion() {
            bail!("{mv} promotes a Pawn, but no piece was chosen");
        }

        // Use the generated move, so that a stale kind or capture cannot slip through
        let mv = match mv.promotion() {
            Some(kind) => legal.with_promotion(kind)?,
            None => legal,
        };

        self.make_move(mv);
        Ok(())
    }

    /// Converts the provided string to a [`Move`] and applies it, if it is legal.
    ///
    /// Equivalent to calling [`Game::parse_move`] and [`Game::make_move_checked`].
    ///
    /// # Example
    /// ```
    /// # use newt::Game;
    /// let mut game = Game::new();
    /// game.make_move_uci("e2e4").unwrap();
    /// assert_eq!(game.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    ///
    /// assert!(game.make_move_uci("e2e4").is_err());
    /// ```
    pub fn make_move_uci(&mut self, mv_str: &str) -> Result<()> {
        let mv = self.parse_move(mv_str)?;
        self.make_move_checked(mv)
    }

    /// Reverts the most recently applied [`Move`]. Does nothing if no moves have been made.
    ///
    /// Returns the move that was undone.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.history.pop()?;
        self.castling_log.pop();
        self.ep_log.pop();
        self.halfmove_log.pop();

        let color = mv.piece().color();

        self.board.clear(mv.to());
        self.board.place(mv.piece(), mv.from());
        if let Some(captured) = mv.captured() {
            self.board.place(captured, mv.captured_square());
        }

        if let Some(side) = mv.castle_side() {
            if let Some(rook) = self.board.take(side.rook_to(color)) {
                self.board.place(rook, side.rook_from(color));
            }
        }

        if mv.piece().is_king() {
            self.kings[color] = mv.from();
        }

        if let Some(&rights) = self.castling_log.last() {
            self.castling_rights = rights;
        }
        if let Some(&ep_square) = self.ep_log.last() {
            self.ep_square = ep_square;
        }
        if let Some(&halfmove) = self.halfmove_log.last() {
            self.halfmove = halfmove;
        }
        if color.is_black() {
            self.fullmove -= 1;
        }
        self.side_to_move = color;

        debug!("{} took back {}", color.name(), mv.to_uci());
        self.refresh();
        Some(mv)
    }

    /// Counts the leaf nodes of the legal move tree down to `depth`.
    ///
    /// This is just a convenience method. See [`perft()`] for more.
    #[inline(always)]
    pub fn perft(&mut self, depth: usize) -> u64 {
        perft(self, depth)
    }
}

impl Default for Game {
    /// Standard starting position for Chess.
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    /// Wrapper for [`Game::from_fen`]
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.check_info();
        let squares_to_string = |squares: &mut dyn Iterator<Item = Square>| {
            squares.map(Square::to_uci).collect::<Vec<_>>().join(", ")
        };

        for rank in Rank::iter().rev() {
            write!(f, "{rank}|")?;
            for file in File::iter() {
                let piece = self.board.piece_at(Square::new(file, rank));
                let piece_char = piece.map(|p| p.to_uci()).unwrap_or('.');
                write!(f, " {piece_char}")?;
            }

            if rank == Rank::EIGHT {
                write!(f, "        FEN: {}", self.to_fen())?;
            } else if rank == Rank::SEVEN {
                write!(f, "       Turn: {}", self.side_to_move.name())?;
            } else if rank == Rank::SIX {
                write!(f, "     Status: {}", self.status)?;
            } else if rank == Rank::FIVE {
                let checkers = &mut info.checks().iter().map(|check| check.attacker);
                write!(f, "   Checkers: {}", squares_to_string(checkers))?;
            } else if rank == Rank::FOUR {
                let pinned = &mut info.pins().iter().map(|pin| pin.pinned);
                write!(f, "     Pinned: {}", squares_to_string(pinned))?;
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for file in File::iter() {
            write!(f, "{file} ")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("fen", &self.to_fen())
            .field("status", &self.status)
            .field("history", &self.history)
            .finish()
    }
}
