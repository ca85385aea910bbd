// Jobs: postings, tags, applications and recommendations.

pub mod applications;
pub mod forms;
pub mod handlers;
pub mod recommend;
pub mod repo;
