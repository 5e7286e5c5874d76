use num_bigint::BigUint;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SssError>;

#[derive(Debug, Error)]
pub enum SssError {
    #[error("threshold {threshold} must be in 1..={share_count} (share count {share_count})")]
    InvalidThreshold { threshold: usize, share_count: usize },
    #[error("no shares supplied for reconstruction")]
    EmptyShareSet,
    #[error("{value} has no inverse modulo {modulus}")]
    NoModularInverse { value: BigUint, modulus: BigUint },
    #[error("modulus {modulus} must exceed both the secret and the share count")]
    ModulusTooSmall { modulus: BigUint },
    #[error("modulus {0} is not prime")]
    CompositeModulus(BigUint),
    #[error("malformed share {0:?}, expected \"index value\"")]
    MalformedShare(String),
    #[error("recovered value is not a valid payload: {0}")]
    DecodeFailure(#[from] std::string::FromUtf8Error),
}
