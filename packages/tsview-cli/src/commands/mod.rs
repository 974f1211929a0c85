pub mod info;
pub mod play;
pub mod stats;
pub mod validate;
pub mod view;
