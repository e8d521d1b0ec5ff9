pub mod time;
pub mod uuid;
