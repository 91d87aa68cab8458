pub mod grabber;
pub mod scaling;
