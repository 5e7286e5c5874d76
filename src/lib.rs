pub mod encoding;
pub mod error;
pub mod field;
pub mod polynomial;
pub mod reconstruct;
pub mod sss;

pub use encoding::*;
pub use error::*;
pub use field::*;
pub use polynomial::*;
pub use reconstruct::*;
pub use sss::*;
