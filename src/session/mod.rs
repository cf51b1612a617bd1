pub mod notify;
pub mod preview;
