use crate::error::SineModelError;

/// A single audio sample (32-bit float, range -1.0 to 1.0).
pub type Sample = f32;

/// Buffer holding audio samples in interleaved format.
///
/// For mono audio, samples are stored sequentially: `[s0, s1, s2, ...]`
/// For stereo audio, samples are interleaved: `[L0, R0, L1, R1, ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Raw interleaved sample data.
    pub data: Vec<Sample>,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new audio buffer.
    ///
    /// # Errors
    /// Returns `SineModelError::InvalidFormat` if `channels` is 0 or the data
    /// length is not a multiple of it, and `SineModelError::InvalidSampleRate`
    /// if `sample_rate` is 0.
    pub fn new(
        data: Vec<Sample>,
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, SineModelError> {
        if channels == 0 {
            return Err(SineModelError::InvalidFormat(
                "channel count must be at least 1".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(SineModelError::InvalidSampleRate(sample_rate));
        }
        if data.len() % channels as usize != 0 {
            return Err(SineModelError::InvalidFormat(format!(
                "{} samples do not divide into {} channels",
                data.len(),
                channels
            )));
        }
        Ok(Self {
            data,
            channels,
            sample_rate,
        })
    }

    /// Create a mono buffer.
    pub fn from_mono(data: Vec<Sample>, sample_rate: u32) -> Self {
        Self {
            data,
            channels: 1,
            sample_rate,
        }
    }

    /// Create an `AudioBuffer` from separate channel vectors.
    ///
    /// # Errors
    /// Returns error if no channels are given or they differ in length.
    pub fn from_channels(
        channels_data: &[Vec<Sample>],
        sample_rate: u32,
    ) -> Result<Self, SineModelError> {
        if channels_data.is_empty() || channels_data.len() > u16::MAX as usize {
            return Err(SineModelError::InvalidFormat(format!(
                "unsupported channel count: {}",
                channels_data.len()
            )));
        }
        let num_frames = channels_data[0].len();
        if channels_data.iter().any(|ch| ch.len() != num_frames) {
            return Err(SineModelError::InvalidFormat(
                "all channels must have the same number of samples".to_string(),
            ));
        }
        AudioBuffer::new(
            interleave(channels_data),
            sample_rate,
            channels_data.len() as u16,
        )
    }

    /// Number of frames in the buffer (total samples / channels).
    pub fn num_frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.data.len() / self.channels as usize
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Returns true if the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a single channel's data as a new vector.
    pub fn channel_data(&self, channel: u16) -> Vec<Sample> {
        if channel >= self.channels {
            return Vec::new();
        }
        self.data
            .iter()
            .skip(channel as usize)
            .step_by(self.channels as usize)
            .copied()
            .collect()
    }

    /// Splits the buffer into one vector per channel.
    pub fn deinterleave(&self) -> Vec<Vec<Sample>> {
        (0..self.channels).map(|ch| self.channel_data(ch)).collect()
    }
}

/// Interleaves per-channel vectors into a single buffer, truncating to the shortest channel.
#[inline]
pub(crate) fn interleave(channels: &[Vec<Sample>]) -> Vec<Sample> {
    let min_len = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    (0..min_len)
        .flat_map(|i| channels.iter().map(move |ch| ch[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_buffer_new_valid() {
        let buf = AudioBuffer::new(vec![0.0; 100], 44100, 1).unwrap();
        assert_eq!(buf.num_frames(), 100);
        assert_eq!(buf.sample_rate, 44100);
    }

    #[test]
    fn test_audio_buffer_invalid_channels() {
        assert!(AudioBuffer::new(vec![0.0; 100], 44100, 0).is_err());
        assert!(AudioBuffer::new(vec![0.0; 101], 44100, 2).is_err());
    }

    #[test]
    fn test_audio_buffer_invalid_sample_rate() {
        assert_eq!(
            AudioBuffer::new(vec![0.0; 100], 0, 1),
            Err(SineModelError::InvalidSampleRate(0))
        );
    }

    #[test]
    fn test_duration() {
        let buf = AudioBuffer::new(vec![0.0; 88200], 44100, 2).unwrap();
        assert!((buf.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_channel_data() {
        let buf = AudioBuffer::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 44100, 2).unwrap();
        assert_eq!(buf.channel_data(0), vec![1.0, 3.0, 5.0]);
        assert_eq!(buf.channel_data(1), vec![2.0, 4.0, 6.0]);
        assert!(buf.channel_data(2).is_empty());
    }

    #[test]
    fn test_from_channels_roundtrip() {
        let left = vec![1.0, 3.0, 5.0];
        let right = vec![2.0, 4.0, 6.0];
        let buf = AudioBuffer::from_channels(&[left.clone(), right.clone()], 48000).unwrap();
        assert_eq!(buf.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(buf.deinterleave(), vec![left, right]);
    }

    #[test]
    fn test_from_channels_mismatched() {
        let err = AudioBuffer::from_channels(&[vec![0.0; 3], vec![0.0; 4]], 44100);
        assert!(err.is_err());
        assert!(AudioBuffer::from_channels(&[], 44100).is_err());
    }
}
