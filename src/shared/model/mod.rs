pub mod identity_reference;
pub mod user;
