pub mod burst;
pub mod connection;
pub mod constellation;
pub mod particle;
