//! Solver for the "Rush Hour" sliding-block puzzle.
//!
//! A board holds straight pieces that slide one cell at a time along their
//! own axis. The primary piece `P` has to reach the exit `K`. Boards are
//! read from the text format described in [`parse`], then solved with one of
//! the [`Strategy`] variants: uniform-cost, greedy best-first, A* or
//! backtracking.
//!
//! ```
//! use rush_hour_solver::{parse_board, reconstruct_path, search, Heuristic, Strategy};
//!
//! let puzzle = parse_board("3 5\n\nAAB..\n..B.C\nPP..CK\n").unwrap();
//! let goal = search(&puzzle, Strategy::AStar(Heuristic::Manhattan)).goal.unwrap();
//!
//! assert_eq!(goal.cost(), 4);
//! assert_eq!(reconstruct_path(&goal).len(), 5);
//! ```

pub mod board;
pub mod error;
pub mod heuristic;
pub mod moves;
pub mod parse;
pub mod report;
pub mod search;

use smallvec::{Array, SmallVec};

pub use board::{Board, Exit, Orientation, Orientations};
pub use error::{BoardError, Malformed};
pub use heuristic::Heuristic;
pub use moves::{try_move, Direction, Move};
pub use parse::parse_board;
pub use report::{write_report, Report};
pub use search::{reconstruct_path, search, GoalNode, SearchOutcome, Stats, Step, Strategy};

/// The initial board together with everything fixed for its lifetime.
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub board: Board,
    pub exit: Exit,
    pub orientations: Orientations,
}

impl Puzzle {
    /// Whether the primary piece has reached the edge cell next to the exit.
    pub fn is_goal(&self, board: &Board) -> bool {
        let cell = self.exit.goal_cell(board.rows(), board.cols());
        board[cell] == board::PRIMARY
    }

    pub fn try_move(&self, board: &Board, mv: Move) -> Option<Board> {
        moves::try_move(board, mv.piece, mv.direction, &self.orientations, self.exit)
    }

    pub fn successors<const N: usize>(&self, board: &Board, out: &mut SmallVec<[(Move, Board); N]>)
    where
        [(Move, Board); N]: Array<Item = (Move, Board)>,
    {
        moves::successors(board, &self.orientations, self.exit, out)
    }
}
