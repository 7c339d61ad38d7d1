#![forbid(unsafe_code)]

pub mod markup;
pub mod model;
pub mod time;

pub use time::Clock;
