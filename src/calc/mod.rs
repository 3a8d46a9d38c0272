pub mod dates;
pub mod format;
pub mod layout;
pub mod scale;
