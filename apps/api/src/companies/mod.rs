// Companies: recruiter-owned organisations that group job postings.

pub mod forms;
pub mod handlers;
pub mod repo;
