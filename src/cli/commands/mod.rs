pub mod request;
pub mod resource;
pub mod session;
