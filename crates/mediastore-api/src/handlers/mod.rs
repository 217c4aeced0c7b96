pub mod health;
pub mod image_upload;
pub mod video_upload;
