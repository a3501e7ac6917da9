pub mod gate;
pub mod logic;
pub mod status;
pub mod summary;
