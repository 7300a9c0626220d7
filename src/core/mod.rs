pub mod app;
pub mod config;
pub mod design;
pub mod feedback;
pub mod guard;
pub mod image;
pub mod keyring;
pub mod message;
pub mod session;
