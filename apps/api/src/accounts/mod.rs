// Accounts: users, sessions, profiles and the portfolio sub-records.

pub mod forms;
pub mod handlers;
pub mod password;
pub mod repo;
pub mod session;
pub mod slug;
