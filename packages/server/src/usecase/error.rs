//! UseCase errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("mailbox address '{0}' does not name a client")]
    InvalidAddress(String),
}
