pub mod buffer;
#[cfg(feature = "gui")]
pub mod playback;

pub use buffer::SampleBuffer;
#[cfg(feature = "gui")]
pub use playback::Player;
