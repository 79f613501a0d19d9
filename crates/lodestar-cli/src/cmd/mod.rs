pub mod checkin;
pub mod init;
pub mod profile;
pub mod serve;
pub mod streak;
