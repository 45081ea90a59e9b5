#[derive(Debug, thiserror::Error, Copy, Clone, Eq, PartialEq)]
pub enum ParseJsonPointerError {
    #[error("malformed json pointer: must be empty or start with `/`")]
    MissingLeadingSlash,
    #[error("malformed json pointer: invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
}
