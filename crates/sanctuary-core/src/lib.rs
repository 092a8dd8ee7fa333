pub mod banner;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod io;
pub mod occurrence;
pub mod paths;
pub mod reference;
pub mod season;
pub mod select;
pub mod verse;

pub use error::{Result, SanctuaryError};
