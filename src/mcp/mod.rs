pub mod handler;
pub mod protocol;
pub mod tools;
pub mod transport;
