pub mod case;
pub mod payload;
