pub mod context;
pub mod evaluation;
pub mod profile;
pub mod transcript;
