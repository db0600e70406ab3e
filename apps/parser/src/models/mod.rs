pub mod entities;
pub mod resume;

pub use entities::{Certification, Education, Experience, Project};
pub use resume::{PersonalInfo, ResumeRecord};
