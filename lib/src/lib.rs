pub mod constants;
pub mod crypto;
pub mod identifiers;

pub mod mls;
pub mod util;
