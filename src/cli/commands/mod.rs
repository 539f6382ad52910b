pub mod analyze;
pub mod cache;
pub mod init;
