use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfoClubError {
    #[error("Configuration error: {0}")]
    Config(String),
}
