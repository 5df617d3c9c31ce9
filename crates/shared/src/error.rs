use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("full name must be at least {min} characters")]
    NameTooShort { min: usize },
    #[error("date of birth {0} is in the future")]
    DateOfBirthInFuture(NaiveDate),
    #[error("unknown state '{0}'")]
    UnknownState(String),
    #[error("invalid profile image: {0}")]
    InvalidProfileImage(String),
}
