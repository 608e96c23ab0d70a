pub mod feedback;
pub mod resume;
pub mod user;
pub mod version;
