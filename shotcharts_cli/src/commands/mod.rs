pub mod load;
pub mod players;
pub mod schedule;
pub mod shots;
