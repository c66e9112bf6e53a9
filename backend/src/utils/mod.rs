pub mod email;
pub mod ids;
pub mod jwt;
pub mod password;
pub mod schedule;
pub mod time;
