pub mod health;
pub mod info;
pub mod reset;

pub(crate) const SERVICE_NAME: &str = "CTF Database Reset Service";
