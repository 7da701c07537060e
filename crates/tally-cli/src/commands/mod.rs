pub mod categories;
pub mod export;
pub mod expenses;
pub mod init;
pub mod maintenance;
pub mod misc;
pub mod report;
