pub mod github;
pub mod message;
