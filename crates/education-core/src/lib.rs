pub mod envelope;
pub mod error;
pub mod types;
pub mod validate;

pub use envelope::*;
pub use error::*;
pub use types::*;
pub use validate::*;
