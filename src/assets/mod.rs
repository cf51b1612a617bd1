pub mod decode;
pub mod fetch;
pub mod frames;
pub mod loader;
pub mod photo;
