use thiserror::Error;

/// Why a board could not be turned into a puzzle. Raised before any search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("malformed input: {0}")]
    MalformedInput(#[from] Malformed),
    #[error("piece '{0}' does not occupy a single straight run of cells")]
    NonLinearPiece(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("header must be `<rows> <cols>`, found {0:?}")]
    Header(String),
    #[error("invalid grid dimension {0:?}")]
    Dimension(String),
    #[error("expected {expected} board rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} characters (expected {expected}, or one more with an exit marker)")]
    RowLength {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("exit marker at row {row}, column {column} is not on the board edge")]
    MisplacedExit { row: isize, column: usize },
    #[error("board has no exit marker")]
    MissingExit,
    #[error("second exit marker at row {row}")]
    DuplicateExit { row: isize },
    #[error("invalid cell {cell:?} at row {row}, column {column}")]
    InvalidCell { row: usize, column: usize, cell: char },
    #[error("board has no primary piece 'P'")]
    MissingPrimaryPiece,
    #[error("unexpected content on line {line} after the board")]
    TrailingInput { line: usize },
}
