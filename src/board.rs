use std::{
    fmt::{Display, Write},
    ops::{Index, IndexMut},
};

use itertools::Itertools;

use crate::error::BoardError;

pub const EMPTY: u8 = b'.';
pub const EXIT: u8 = b'K';
pub const PRIMARY: u8 = b'P';

/// The contents of a grid. Two boards are equal iff every cell matches,
/// so a `Board` doubles as the search state.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl Board {
    pub fn new(from: Vec<Vec<u8>>) -> Board {
        let rows = from.len();
        let cols = from.first().map_or(0, Vec::len);
        debug_assert!(from.iter().all(|row| row.len() == cols));
        let cells = from.into_iter().flatten().collect();

        Board { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Converts a signed coordinate into an in-bounds one.
    pub fn checked_pos(&self, (i, j): (isize, isize)) -> Option<(usize, usize)> {
        if i < 0 || j < 0 || i as usize >= self.rows || j as usize >= self.cols {
            None
        } else {
            Some((i as usize, j as usize))
        }
    }

    /// Cells in row-major order, with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), u8)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(ix, &c)| ((ix / cols, ix % cols), c))
    }

    /// Coordinates of every cell occupied by `piece`, row-major.
    pub fn piece_cells(&self, piece: u8) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .filter(move |&(_, c)| c == piece)
            .map(|(pos, _)| pos)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for line in self.cells.chunks(self.cols.max(1)) {
            if !first {
                f.write_char('\n')?;
            } else {
                first = false;
            }

            for c in line {
                f.write_char(*c as char)?;
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board({}x{}):\n{}", self.rows, self.cols, self)
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u8;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.cells[index.0 * self.cols + index.1]
    }
}

impl IndexMut<(usize, usize)> for Board {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.cells[index.0 * self.cols + index.1]
    }
}

/// Where the primary piece leaves the grid.
///
/// A coordinate of `-1` or `rows`/`cols` means "just outside" that edge;
/// otherwise the exit is an ordinary cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Exit {
    pub row: isize,
    pub col: isize,
}

impl Exit {
    pub fn new(row: isize, col: isize) -> Exit {
        Exit { row, col }
    }

    /// The in-bounds cell the primary piece must occupy to be solved:
    /// the exit position clamped into the grid.
    pub fn goal_cell(&self, rows: usize, cols: usize) -> (usize, usize) {
        let clamp = |v: isize, len: usize| v.clamp(0, len as isize - 1) as usize;
        (clamp(self.row, rows), clamp(self.col, cols))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Axis of every piece, fixed for the lifetime of a puzzle.
#[derive(Clone)]
pub struct Orientations {
    lookup: [Option<Orientation>; 256],
}

impl Orientations {
    /// Every piece must occupy a contiguous run of one row or one column.
    /// Single-cell pieces are treated as horizontal.
    pub fn derive(board: &Board) -> Result<Orientations, BoardError> {
        let mut lookup = [None; 256];

        for piece in board.cells().map(|(_, c)| c).filter(|&c| c != EMPTY).unique() {
            let cells = board.piece_cells(piece).collect_vec();

            let orientation = if cells.iter().map(|&(i, _)| i).all_equal() {
                Orientation::Horizontal
            } else if cells.iter().map(|&(_, j)| j).all_equal() {
                Orientation::Vertical
            } else {
                return Err(BoardError::NonLinearPiece(piece as char));
            };

            // row-major order means consecutive cells differ by exactly one step
            let contiguous = cells.iter().tuple_windows().all(|(a, b)| match orientation {
                Orientation::Horizontal => b.1 == a.1 + 1,
                Orientation::Vertical => b.0 == a.0 + 1,
            });
            if !contiguous {
                return Err(BoardError::NonLinearPiece(piece as char));
            }

            lookup[piece as usize] = Some(orientation);
        }

        Ok(Orientations { lookup })
    }

    pub fn get(&self, piece: u8) -> Option<Orientation> {
        self.lookup[piece as usize]
    }

    pub fn pieces(&self) -> impl Iterator<Item = (u8, Orientation)> + '_ {
        self.lookup
            .iter()
            .enumerate()
            .filter_map(|(c, o)| o.map(|o| (c as u8, o)))
    }
}

impl std::fmt::Debug for Orientations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.pieces().map(|(c, o)| (c as char, o)))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        Board::new(rows.iter().map(|r| r.as_bytes().to_vec()).collect())
    }

    #[test]
    fn orientation_of_each_piece() {
        let b = board(&["AAB", "..B", "PP."]);
        let o = Orientations::derive(&b).unwrap();

        assert_eq!(o.get(b'A'), Some(Orientation::Horizontal));
        assert_eq!(o.get(b'B'), Some(Orientation::Vertical));
        assert_eq!(o.get(b'P'), Some(Orientation::Horizontal));
        assert_eq!(o.get(b'.'), None);
        assert_eq!(o.pieces().count(), 3);
    }

    #[test]
    fn single_cell_piece_is_horizontal() {
        let o = Orientations::derive(&board(&[".P."])).unwrap();
        assert_eq!(o.get(b'P'), Some(Orientation::Horizontal));
    }

    #[test]
    fn bent_piece_is_rejected() {
        let err = Orientations::derive(&board(&["AA.", ".A.", "PP."])).unwrap_err();
        assert_eq!(err, BoardError::NonLinearPiece('A'));
    }

    #[test]
    fn split_piece_is_rejected() {
        let err = Orientations::derive(&board(&["A.A", "...", "PP."])).unwrap_err();
        assert_eq!(err, BoardError::NonLinearPiece('A'));
    }

    #[test]
    fn goal_cell_clamps_sentinels() {
        assert_eq!(Exit::new(2, -1).goal_cell(6, 6), (2, 0));
        assert_eq!(Exit::new(2, 6).goal_cell(6, 6), (2, 5));
        assert_eq!(Exit::new(-1, 3).goal_cell(6, 6), (0, 3));
        assert_eq!(Exit::new(6, 3).goal_cell(6, 6), (5, 3));
        assert_eq!(Exit::new(4, 4).goal_cell(6, 6), (4, 4));
    }

    #[test]
    fn display_matches_rows() {
        let b = board(&["AAB", "..B"]);
        assert_eq!(b.to_string(), "AAB\n..B");
        assert_eq!(b[(1, 2)], b'B');
        assert_eq!(b.checked_pos((0, 3)), None);
        assert_eq!(b.checked_pos((-1, 0)), None);
        assert_eq!(b.checked_pos((1, 1)), Some((1, 1)));
    }
}
