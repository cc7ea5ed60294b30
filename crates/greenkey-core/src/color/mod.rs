pub mod gray;
pub mod hsv;

pub use gray::to_gray;
pub use hsv::{bgr_to_hsv, to_hsv};
