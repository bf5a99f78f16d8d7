use crate::board::{Board, Exit, PRIMARY};

/// Estimated number of slides left, measured from the primary piece's
/// leading cell to the goal cell.
///
/// Every slide moves the primary piece by at most one cell along one axis,
/// so both estimates are lower bounds: `Euclidean <= Manhattan <= true cost`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Heuristic {
    Manhattan,
    Euclidean,
}

impl Heuristic {
    /// Returns `f64::MAX` if the primary piece is missing from `board`.
    pub fn evaluate(self, board: &Board, exit: Exit) -> f64 {
        let (gi, gj) = exit.goal_cell(board.rows(), board.cols());

        board
            .piece_cells(PRIMARY)
            .map(|(i, j)| {
                let di = i.abs_diff(gi) as f64;
                let dj = j.abs_diff(gj) as f64;
                match self {
                    Heuristic::Manhattan => di + dj,
                    Heuristic::Euclidean => di.hypot(dj),
                }
            })
            .min_by(f64::total_cmp)
            .unwrap_or(f64::MAX)
    }
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Heuristic::Manhattan => "Manhattan",
            Heuristic::Euclidean => "Euclidean",
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parse::parse_board;

    #[test]
    fn distance_from_leading_cell() {
        let p = parse_board("3 5\n\n.....\nPP...K\n.....\n").unwrap();

        // leading cell (1, 1), goal cell (1, 4)
        assert_eq!(Heuristic::Manhattan.evaluate(&p.board, p.exit), 3.0);
        assert_eq!(Heuristic::Euclidean.evaluate(&p.board, p.exit), 3.0);
    }

    #[test]
    fn euclidean_never_exceeds_manhattan() {
        let p = parse_board("4 4\n\n....\n...PK\n....\n....\n").unwrap();
        let board = crate::board::Board::new(vec![
            b"....".to_vec(),
            b"....".to_vec(),
            b"....".to_vec(),
            b"P...".to_vec(),
        ]);

        let m = Heuristic::Manhattan.evaluate(&board, p.exit);
        let e = Heuristic::Euclidean.evaluate(&board, p.exit);
        assert_eq!(m, 5.0);
        assert!((e - 13f64.sqrt()).abs() < 1e-9);
        assert!(e <= m);
    }

    #[test]
    fn zero_on_goal() {
        let p = parse_board("2 2\n\nPPK\n..\n").unwrap();
        assert_eq!(Heuristic::Manhattan.evaluate(&p.board, p.exit), 0.0);
        assert_eq!(Heuristic::Euclidean.evaluate(&p.board, p.exit), 0.0);
    }

    #[test]
    fn missing_primary_piece_is_maximal() {
        let board = Board::new(vec![b"AA.".to_vec()]);
        let exit = Exit::new(0, 3);
        assert_eq!(Heuristic::Manhattan.evaluate(&board, exit), f64::MAX);
        assert_eq!(Heuristic::Euclidean.evaluate(&board, exit), f64::MAX);
    }
}
