pub mod authorities;
pub mod token;
