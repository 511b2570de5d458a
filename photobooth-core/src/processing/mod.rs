pub mod capture;
pub mod codec;
pub mod compositor;
pub mod layout;
pub mod mirror;
pub mod text;
