/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Exclusive upper bound of the 8-bit hue scale (degrees / 2).
pub const HUE_SCALE: u16 = 180;

/// Default half-width of the output crop, as a fraction of image width.
pub const DEFAULT_CROP_MARGIN_WIDTH: f32 = 0.38;

/// Default half-height of the output crop, as a fraction of image height.
pub const DEFAULT_CROP_MARGIN_HEIGHT: f32 = 0.38;

/// Width the image is downscaled to before face detection.
pub const DEFAULT_FACE_DETECTION_WIDTH: u32 = 100;

/// Default output width in pixels.
pub const DEFAULT_OUTPUT_WIDTH: u32 = 1080;

/// Side of the square structuring element used to smooth the matte.
pub const DEFAULT_SMOOTH_KERNEL: usize = 3;

/// Opening passes applied to the matte.
pub const DEFAULT_SMOOTH_ITERATIONS: usize = 1;

/// Thickness (pixels) of the border ring used for edge blending.
pub const DEFAULT_BORDER_THICKNESS: usize = 1;

/// Gaussian sigma that softens the border ring into a blend alpha.
pub const DEFAULT_BLEND_SIGMA: f32 = 1.0;

/// JPEG quality used when the output extension selects JPEG.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Raster extensions picked up by input discovery.
pub const DEFAULT_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "tif", "tiff", "bmp", "webp"];

/// Minimum face size (pixels, detection resolution) for the SeetaFace backend.
pub const FACE_MIN_SIZE: u32 = 20;

/// Score threshold for the SeetaFace backend.
pub const FACE_SCORE_THRESHOLD: f64 = 2.0;
