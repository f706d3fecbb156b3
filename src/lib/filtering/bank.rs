use crate::filtering::sma::SmaFilter;
use crate::sensors::sample::{Channel, SensorSample, NUM_CHANNELS};

/// One moving-average ring per sensor channel, `SIZE` samples deep.
pub struct FilterBank<const SIZE: usize> {
    channels: [SmaFilter<f32, SIZE>; NUM_CHANNELS],
}

impl<const SIZE: usize> FilterBank<SIZE> {
    pub fn new() -> Self {
        Self {
            channels: core::array::from_fn(|_| SmaFilter::new()),
        }
    }

    pub fn push(&mut self, channel: Channel, value: f32) {
        self.channels[channel.index()].insert(value);
    }

    /// Pushes every channel of a sample.
    pub fn push_sample(&mut self, sample: &SensorSample) {
        for channel in Channel::ALL {
            self.push(channel, sample.get(channel));
        }
    }

    /// Mean of the samples held for `channel`, `None` before its first push.
    pub fn filtered(&self, channel: Channel) -> Option<f32> {
        self.channels[channel.index()].filtered()
    }

    /// Filtered value of every channel, channels never pushed read as zero.
    pub fn sample(&self) -> SensorSample {
        let mut sample = SensorSample::default();
        for channel in Channel::ALL {
            sample = sample.with(channel, self.filtered(channel).unwrap_or(0.0));
        }
        sample
    }

    pub fn len(&self, channel: Channel) -> usize {
        self.channels[channel.index()].len()
    }

    pub fn reset(&mut self) {
        for filter in self.channels.iter_mut() {
            filter.reset();
        }
    }
}

impl<const SIZE: usize> Default for FilterBank<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_independent() {
        let mut bank = FilterBank::<10>::new();
        bank.push(Channel::AccelX, 4.0);
        bank.push(Channel::AccelX, 6.0);
        bank.push(Channel::GyroZ, -1.0);

        assert_eq!(bank.filtered(Channel::AccelX), Some(5.0));
        assert_eq!(bank.filtered(Channel::GyroZ), Some(-1.0));
        assert_eq!(bank.filtered(Channel::MagY), None);
        assert_eq!(bank.len(Channel::AccelX), 2);
    }

    #[test]
    fn sample_collects_every_channel() {
        let mut bank = FilterBank::<30>::new();
        let input = SensorSample {
            accel: (0.125, 0.25, 9.75),
            gyro: (1.0, 2.0, 3.0),
            mag: (20.0, -5.0, 40.0),
            elevation: 1.5,
        };
        for _ in 0..45 {
            bank.push_sample(&input);
        }
        assert_eq!(bank.sample(), input);
    }

    #[test]
    fn outlier_in_long_window() {
        let mut bank = FilterBank::<30>::new();
        for _ in 0..29 {
            bank.push(Channel::Elevation, 0.0);
        }
        bank.push(Channel::Elevation, 500.0);
        let mean = bank.filtered(Channel::Elevation).unwrap();
        assert!((mean - 16.6667).abs() < 1e-3);
    }

    #[test]
    fn reset_clears_all_channels() {
        let mut bank = FilterBank::<10>::new();
        bank.push_sample(&SensorSample::default());
        bank.reset();
        for channel in Channel::ALL {
            assert_eq!(bank.filtered(channel), None);
        }
    }
}
