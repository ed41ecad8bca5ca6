pub mod backdrop;
pub mod notice;
pub mod shortcuts;
