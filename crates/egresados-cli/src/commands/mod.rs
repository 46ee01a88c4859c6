pub mod backup;
pub mod backups;
pub mod create_user;
pub mod init_db;
