pub mod gate;
pub mod response;
