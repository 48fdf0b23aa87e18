pub mod split_controller;

pub use split_controller::configure;
