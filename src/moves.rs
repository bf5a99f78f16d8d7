use std::{fmt::Display, ops::Neg};

use smallvec::{Array, SmallVec};

use crate::board::{Board, Exit, Orientation, Orientations, EMPTY, PRIMARY};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// `(row, column)` step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Vertical,
            Direction::Left | Direction::Right => Orientation::Horizontal,
        }
    }
}

impl Neg for Direction {
    type Output = Direction;

    fn neg(self) -> Self::Output {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// A single slide of one piece by one cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub piece: u8,
    pub direction: Direction,
}

impl Move {
    pub fn new(piece: u8, direction: Direction) -> Move {
        Move { piece, direction }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.piece as char, self.direction)
    }
}

// scanning against the direction of travel visits the leading cell first
#[auto_enums::auto_enum(Iterator)]
fn scan_order(len: usize, delta: i32) -> impl Iterator<Item = usize> {
    match delta {
        0 | 1 => (0..len).rev(),
        -1 => 0..len,
        _ => unreachable!(),
    }
}

/// Slides `piece` one cell towards `direction`, or returns `None` if the
/// slide is not allowed.
///
/// The target cell must be empty. Only the primary piece may step off the
/// board, and only onto the exit; cells that end up outside are dropped.
pub fn try_move(
    board: &Board,
    piece: u8,
    direction: Direction,
    orientations: &Orientations,
    exit: Exit,
) -> Option<Board> {
    if orientations.get(piece)? != direction.orientation() {
        return None;
    }

    let delta = direction.delta();
    let mut cells = SmallVec::<[(usize, usize); 8]>::new();
    for i in scan_order(board.rows(), delta.0) {
        for j in scan_order(board.cols(), delta.1) {
            if board[(i, j)] == piece {
                cells.push((i, j));
            }
        }
    }

    let step = |(i, j): (usize, usize)| {
        (i as isize + delta.0 as isize, j as isize + delta.1 as isize)
    };

    let target = step(*cells.first()?);
    match board.checked_pos(target) {
        Some(pos) if board[pos] != EMPTY => return None,
        Some(_) => {}
        None if piece != PRIMARY || target != (exit.row, exit.col) => return None,
        None => {}
    }

    // leading cell first, so each write lands on a cell already vacated
    let mut result = board.clone();
    for &cell in &cells {
        result[cell] = EMPTY;
        if let Some(to) = board.checked_pos(step(cell)) {
            result[to] = piece;
        }
    }

    Some(result)
}

/// Every legal single slide from `board`, pieces in row-major order of first
/// appearance and directions in `DIRECTIONS` order.
pub fn successors<const N: usize>(
    board: &Board,
    orientations: &Orientations,
    exit: Exit,
    out: &mut SmallVec<[(Move, Board); N]>,
) where
    [(Move, Board); N]: Array<Item = (Move, Board)>,
{
    let mut examined = [false; 256];

    for (_, piece) in board.cells() {
        if piece == EMPTY || examined[piece as usize] {
            continue;
        }
        examined[piece as usize] = true;

        for &direction in &DIRECTIONS {
            if let Some(next) = try_move(board, piece, direction, orientations, exit) {
                out.push((Move::new(piece, direction), next));
            }
        }
    }
}
