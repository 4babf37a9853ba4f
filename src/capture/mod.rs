//! Screen capture module for grabbing question screenshots.

mod region;
mod screen;

pub use region::{Region, Selection};
pub use screen::{
    capture_region, capture_screen, load_image_file, CaptureError, CapturedImage, Screenshot,
    DEFAULT_CAPTURE_DELAY_MS,
};
