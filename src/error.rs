use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
	#[error("no entry found for key")]
	KeyNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
