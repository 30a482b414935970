//! Loading user-supplied files as request attachments.

mod image;

pub use image::{ImageLoadError, MAX_IMAGE_BYTES, load_image, media_type_for};
