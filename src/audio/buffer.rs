use crate::error::{FilterError, Result};

/// Decoded audio held in memory
///
/// Samples are interleaved frame by frame `[c0, c1, .., c0, c1, ..]`, in the
/// same layout as the WAV file they came from. A buffer always holds at least
/// one frame, every sample is finite and the sample rate is non-zero.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(FilterError::InvalidParameter(
                "channel count must be at least 1".into(),
            ));
        }
        if sample_rate == 0 {
            return Err(FilterError::InvalidParameter(
                "sample rate must be positive".into(),
            ));
        }
        if samples.is_empty() {
            return Err(FilterError::InvalidParameter("buffer is empty".into()));
        }
        if samples.len() % channels as usize != 0 {
            return Err(FilterError::InvalidParameter(format!(
                "{} samples do not split into {} channels",
                samples.len(),
                channels
            )));
        }
        if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
            return Err(FilterError::InvalidParameter(format!(
                "sample {} is not finite",
                pos
            )));
        }

        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(samples, 1, sample_rate)
    }

    /// Interleave separate channel vectors of equal length
    pub fn from_channels(channels: &[Vec<f32>], sample_rate: u32) -> Result<Self> {
        let frames = channels.first().map_or(0, Vec::len);
        if channels.iter().any(|c| c.len() != frames) {
            return Err(FilterError::InvalidParameter(
                "channels differ in length".into(),
            ));
        }
        let count = u16::try_from(channels.len()).map_err(|_| {
            FilterError::InvalidParameter(format!("too many channels: {}", channels.len()))
        })?;

        let mut samples = Vec::with_capacity(frames * channels.len());
        for i in 0..frames {
            for channel in channels {
                samples.push(channel[i]);
            }
        }

        Self::new(samples, count, sample_rate)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Copy out one channel
    pub fn channel(&self, index: usize) -> Vec<f32> {
        self.samples
            .iter()
            .skip(index)
            .step_by(self.channels as usize)
            .copied()
            .collect()
    }

    pub fn split_channels(&self) -> Vec<Vec<f32>> {
        (0..self.channels as usize).map(|c| self.channel(c)).collect()
    }

    /// Build a new buffer by transforming each channel independently.
    /// The transform must keep the channel length.
    pub fn map_channels<F>(&self, mut transform: F) -> Result<Self>
    where
        F: FnMut(&[f32]) -> Result<Vec<f32>>,
    {
        let mapped = self
            .split_channels()
            .iter()
            .map(|channel| transform(channel))
            .collect::<Result<Vec<_>>>()?;

        if mapped.iter().any(|c| c.len() != self.frames()) {
            return Err(FilterError::InvalidParameter(
                "channel transform changed the buffer length".into(),
            ));
        }

        Self::from_channels(&mapped, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_split_and_join() {
        let buffer = SampleBuffer::new(vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3], 2, 8000).unwrap();
        assert_eq!(buffer.frames(), 3);
        assert_eq!(buffer.channel(0), vec![0.1, 0.2, 0.3]);
        assert_eq!(buffer.channel(1), vec![-0.1, -0.2, -0.3]);

        let joined = SampleBuffer::from_channels(&buffer.split_channels(), 8000).unwrap();
        assert_eq!(joined, buffer);
    }

    #[test]
    fn test_rejects_invalid_buffers() {
        assert!(SampleBuffer::mono(vec![], 8000).is_err());
        assert!(SampleBuffer::mono(vec![0.0], 0).is_err());
        assert!(SampleBuffer::new(vec![0.0, 0.0, 0.0], 2, 8000).is_err());
        assert!(SampleBuffer::mono(vec![0.0, f32::NAN], 8000).is_err());
        assert!(SampleBuffer::from_channels(&[vec![0.0, 1.0], vec![0.0]], 8000).is_err());
    }

    #[test]
    fn test_duration() {
        let buffer = SampleBuffer::mono(vec![0.0; 4000], 8000).unwrap();
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_map_channels_rejects_length_change() {
        let buffer = SampleBuffer::mono(vec![0.0; 8], 8000).unwrap();
        let result = buffer.map_channels(|c| Ok(c[..4].to_vec()));
        assert!(result.is_err());
    }
}
