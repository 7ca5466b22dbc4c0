pub mod file;
pub mod settings;

pub use self::{file::File, settings::Settings};
