pub mod access;
pub mod proxy;
