pub mod compositor;
pub mod scheduler;
pub mod surface;
