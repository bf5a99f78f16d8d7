//! The board file format.
//!
//! ```text
//! 6 6
//! 11
//! AAB..F
//! ..BCDF
//! GPPCDFK
//! GH.III
//! GHJ...
//! LLJMM.
//! ```
//!
//! The first line gives `<rows> <cols>`. The second line is skipped (it
//! conventionally holds the number of non-primary pieces). Each board row is
//! either `cols` cells, or `cols + 1` characters with the exit marker `K` as
//! the first or last character. A line holding only spaces and a single `K`
//! directly above the first row or below the last row places the exit on the
//! top or bottom edge instead; its `K` must fall within the grid's columns.
//! Trailing spaces are part of a row, and anything but blank lines after the
//! grid is rejected.

use std::str::FromStr;

use itertools::Itertools;
use log::warn;

use crate::board::{Board, Exit, Orientations, EMPTY, EXIT, PRIMARY};
use crate::error::{BoardError, Malformed};
use crate::Puzzle;

pub fn parse_board(text: &str) -> Result<Puzzle, BoardError> {
    let mut lines = text
        .lines()
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .enumerate()
        .peekable();

    let (rows, cols) = parse_header(lines.next().map_or("", |(_, l)| l))?;
    let declared_pieces = lines
        .next()
        .and_then(|(_, l)| l.trim().parse::<usize>().ok());

    let mut exit = None;

    if let Some(col) = lines.peek().and_then(|&(_, l)| edge_exit(l)) {
        lines.next();
        exit = Some(edge_exit_on(-1, col, cols)?);
    }

    let mut grid = Vec::with_capacity(rows);
    for row in 0..rows {
        let (_, line) = lines.next().ok_or(Malformed::RowCount {
            expected: rows,
            found: row,
        })?;
        grid.push(parse_row(row, line, cols, &mut exit)?);
    }

    if let Some(col) = lines.peek().and_then(|&(_, l)| edge_exit(l)) {
        lines.next();
        set_exit(&mut exit, edge_exit_on(rows as isize, col, cols)?)?;
    }

    if let Some((index, _)) = lines.find(|(_, l)| !l.trim().is_empty()) {
        return Err(Malformed::TrailingInput { line: index + 1 }.into());
    }

    let exit = exit.ok_or(Malformed::MissingExit)?;
    let board = Board::new(grid);
    let orientations = Orientations::derive(&board)?;
    if orientations.get(PRIMARY).is_none() {
        return Err(Malformed::MissingPrimaryPiece.into());
    }

    if let Some(declared) = declared_pieces {
        let found = orientations.pieces().filter(|&(c, _)| c != PRIMARY).count();
        if declared != found {
            warn!("board declares {declared} pieces besides the primary piece, found {found}");
        }
    }

    Ok(Puzzle {
        board,
        exit,
        orientations,
    })
}

impl FromStr for Puzzle {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_board(s)
    }
}

fn parse_header(line: &str) -> Result<(usize, usize), Malformed> {
    let dims = line.split_whitespace().collect_vec();
    if dims.len() != 2 {
        return Err(Malformed::Header(line.to_string()));
    }

    let dim = |s: &str| match s.parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(Malformed::Dimension(s.to_string())),
    };

    Ok((dim(dims[0])?, dim(dims[1])?))
}

/// Column of the `K` in a line made only of spaces and one exit marker.
fn edge_exit(line: &str) -> Option<usize> {
    let mut markers = line.bytes().positions(|c| c == EXIT);
    let col = markers.next()?;
    if markers.next().is_none() && line.bytes().all(|c| c == EXIT || c == b' ') {
        Some(col)
    } else {
        None
    }
}

/// Exit for a `K` line above (`row == -1`) or below (`row == rows`) the grid.
fn edge_exit_on(row: isize, col: usize, cols: usize) -> Result<Exit, Malformed> {
    if col >= cols {
        return Err(Malformed::MisplacedExit { row, column: col });
    }
    Ok(Exit::new(row, col as isize))
}

fn set_exit(exit: &mut Option<Exit>, at: Exit) -> Result<(), Malformed> {
    if exit.is_some() {
        return Err(Malformed::DuplicateExit { row: at.row });
    }
    *exit = Some(at);
    Ok(())
}

fn parse_row(
    row: usize,
    line: &str,
    cols: usize,
    exit: &mut Option<Exit>,
) -> Result<Vec<u8>, Malformed> {
    let bytes = line.as_bytes();
    let markers = bytes.iter().positions(|&c| c == EXIT).collect_vec();

    let cells = if bytes.len() == cols {
        if let Some(&column) = markers.first() {
            return Err(Malformed::MisplacedExit {
                row: row as isize,
                column,
            });
        }
        bytes
    } else if bytes.len() == cols + 1 {
        match markers[..] {
            [] => {
                return Err(Malformed::RowLength {
                    row,
                    found: bytes.len(),
                    expected: cols,
                })
            }
            [0] => {
                set_exit(exit, Exit::new(row as isize, -1))?;
                &bytes[1..]
            }
            [k] if k == cols => {
                set_exit(exit, Exit::new(row as isize, cols as isize))?;
                &bytes[..cols]
            }
            [k] | [_, k, ..] => {
                return Err(Malformed::MisplacedExit {
                    row: row as isize,
                    column: k,
                })
            }
        }
    } else {
        return Err(Malformed::RowLength {
            row,
            found: bytes.len(),
            expected: cols,
        });
    };

    for (column, &c) in cells.iter().enumerate() {
        if c != EMPTY && !c.is_ascii_graphic() {
            return Err(Malformed::InvalidCell {
                row,
                column,
                cell: c as char,
            });
        }
    }

    Ok(cells.to_vec())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::Orientation;

    const SAMPLE: &str = "6 6
11
AAB..F
..BCDF
GPPCDFK
GH.III
GHJ...
LLJMM.
";

    fn malformed(text: &str) -> Malformed {
        match parse_board(text) {
            Err(BoardError::MalformedInput(m)) => m,
            other => panic!("expected malformed input, got {other:?}"),
        }
    }

    #[test]
    fn parses_sample() {
        let puzzle = parse_board(SAMPLE).unwrap();

        assert_eq!(puzzle.board.rows(), 6);
        assert_eq!(puzzle.board.cols(), 6);
        assert_eq!(puzzle.exit, Exit::new(2, 6));
        assert_eq!(puzzle.orientations.get(b'P'), Some(Orientation::Horizontal));
        assert_eq!(puzzle.orientations.get(b'G'), Some(Orientation::Vertical));
        assert_eq!(puzzle.orientations.pieces().count(), 12);
    }

    #[test]
    fn reserializing_reproduces_cells() {
        let puzzle = parse_board(SAMPLE).unwrap();
        let expected = SAMPLE
            .lines()
            .skip(2)
            .map(|l| l.replace('K', ""))
            .join("\n");

        assert_eq!(puzzle.board.to_string(), expected);
    }

    #[test]
    fn left_exit() {
        let puzzle = parse_board("2 3\n\nKPP.\n...\n").unwrap();
        assert_eq!(puzzle.exit, Exit::new(0, -1));
        assert_eq!(puzzle.board.to_string(), "PP.\n...");
    }

    #[test]
    fn top_and_bottom_exits() {
        let top = parse_board("2 3\n\n K\n.P.\n.P.\n").unwrap();
        assert_eq!(top.exit, Exit::new(-1, 1));
        assert_eq!(top.orientations.get(b'P'), Some(Orientation::Vertical));

        let bottom = parse_board("2 3\n\n..P\n..P\n  K\n").unwrap();
        assert_eq!(bottom.exit, Exit::new(2, 2));
    }

    #[test]
    fn crlf_and_trailing_blank_lines() {
        let puzzle = parse_board("1 3\r\n\r\n.P.K\r\n\r\n\r\n").unwrap();
        assert_eq!(puzzle.exit, Exit::new(0, 3));
    }

    #[test]
    fn header_errors() {
        assert_eq!(malformed("6\n\n"), Malformed::Header("6".to_string()));
        assert_eq!(malformed("6 6 6\n"), Malformed::Header("6 6 6".to_string()));
        assert_eq!(malformed("six 6\n"), Malformed::Dimension("six".to_string()));
        assert_eq!(malformed("0 6\n"), Malformed::Dimension("0".to_string()));
        assert_eq!(malformed(""), Malformed::Header(String::new()));
    }

    #[test]
    fn row_count_errors() {
        assert_eq!(
            malformed("3 3\n\nPP.K\n...\n"),
            Malformed::RowCount {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn trailing_input() {
        assert_eq!(
            malformed("1 3\n\n.P.K\n...\n"),
            Malformed::TrailingInput { line: 4 }
        );
        assert_eq!(
            malformed("1 3\n\n.P.K\n\n  \nAAA\n"),
            Malformed::TrailingInput { line: 6 }
        );
    }

    #[test]
    fn row_length_errors() {
        assert_eq!(
            malformed("2 3\n\nPP.K\n..\n"),
            Malformed::RowLength {
                row: 1,
                found: 2,
                expected: 3
            }
        );
        assert_eq!(
            malformed("1 3\n\nPP..\n"),
            Malformed::RowLength {
                row: 0,
                found: 4,
                expected: 3
            }
        );
    }

    #[test]
    fn exit_marker_errors() {
        assert_eq!(
            malformed("1 3\n\nPKP.\n"),
            Malformed::MisplacedExit { row: 0, column: 1 }
        );
        assert_eq!(
            malformed("1 3\n\nPK.\n"),
            Malformed::MisplacedExit { row: 0, column: 1 }
        );
        assert_eq!(malformed("1 3\n\nPP.\n"), Malformed::MissingExit);
        assert_eq!(
            malformed("2 3\n\nPP.K\nA..K\n"),
            Malformed::DuplicateExit { row: 1 }
        );
        assert_eq!(
            malformed("1 3\n\n.P.K\n K\n"),
            Malformed::DuplicateExit { row: 1 }
        );
    }

    #[test]
    fn edge_exit_outside_the_columns() {
        assert_eq!(
            malformed("2 3\n\n     K\n..P\n..P\n"),
            Malformed::MisplacedExit { row: -1, column: 5 }
        );
        assert_eq!(
            malformed("2 3\n\n..P\n..P\n   K\n"),
            Malformed::MisplacedExit { row: 2, column: 3 }
        );
    }

    #[test]
    fn trailing_spaces_count_toward_row_length() {
        assert_eq!(
            malformed("1 3\n\nPP. \n"),
            Malformed::RowLength {
                row: 0,
                found: 4,
                expected: 3
            }
        );
        assert_eq!(
            malformed("2 3\n\nPP.K\n... \n"),
            Malformed::RowLength {
                row: 1,
                found: 4,
                expected: 3
            }
        );
    }

    #[test]
    fn cell_errors() {
        assert_eq!(
            malformed("1 3\n\nP .K\n"),
            Malformed::InvalidCell {
                row: 0,
                column: 1,
                cell: ' '
            }
        );
        assert_eq!(malformed("1 3\n\nAA.K\n"), Malformed::MissingPrimaryPiece);
    }

    #[test]
    fn non_linear_piece() {
        assert_eq!(
            parse_board("2 3\n\nPPAK\n.AA\n").unwrap_err(),
            BoardError::NonLinearPiece('A')
        );
    }

    #[test]
    fn from_str() {
        let puzzle: Puzzle = "1 3\n\n.P.K\n".parse().unwrap();
        assert_eq!(puzzle.exit, Exit::new(0, 3));
        assert!(".P.K".parse::<Puzzle>().is_err());
    }
}
