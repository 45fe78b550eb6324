//! Image capture and encoding
//!
//! Produces an [`ImagePayload`] from a camera stream or a file.

mod camera;
mod command_camera;
mod encode;
mod exif;
mod file;
mod payload;

pub use camera::{acquire_camera_stream, CameraStream, Facing, MediaDevices, VideoTrack};
pub use command_camera::CommandCamera;
pub use encode::{encode_jpeg, fit_within, EncodeOptions};
pub use file::load_from_file;
pub use payload::{ImagePayload, ImageSource};
