use thiserror::Error;

pub type PatternResult<T> = Result<T, PatternError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Unclosed '[' at position {0}")]
    UnclosedEscape(usize),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Date out of range while stepping {0} intervals")]
    OutOfRange(i64),

    #[error("Index name is required")]
    EmptyName,

    #[error("Index name contains illegal characters: {}", format_chars(.0))]
    IllegalCharacters(Vec<char>),
}

fn format_chars(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| format!("{:?}", c))
        .collect::<Vec<_>>()
        .join(", ")
}
