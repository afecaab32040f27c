pub mod credential;
pub mod generation;
pub mod quota;
pub mod segment;
pub mod voice;
