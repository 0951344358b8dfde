pub mod common;
mod persistent_refresh;
mod token_lifecycle;
