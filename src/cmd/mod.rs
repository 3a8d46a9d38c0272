pub mod init;
pub mod root;
pub mod summary;
