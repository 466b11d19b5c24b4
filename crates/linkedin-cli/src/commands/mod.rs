pub mod authorize;
pub mod profile;
