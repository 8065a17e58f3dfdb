pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod fade;
pub mod natural;
pub mod playlist;
pub mod scan;
pub mod slideshow;
pub mod view;
pub mod render {
    pub mod loader;
    pub mod viewer;
}
