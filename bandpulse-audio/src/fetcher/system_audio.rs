use std::sync::{Arc, Mutex, PoisonError};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat, SampleRate, StreamError, SupportedStreamConfigRange,
};
use tracing::{debug, instrument, warn};

use crate::DEFAULT_SAMPLE_RATE;

use super::Fetcher;

/// Holds the latest mono samples. The newest sample is at the end.
struct SampleBuffer {
    buffer: Box<[f32]>,
    channels: u16,
}

impl SampleBuffer {
    pub fn new(capacity: usize, channels: u16) -> Self {
        Self {
            buffer: vec![0.; capacity].into_boxed_slice(),
            channels,
        }
    }

    /// Downmixes the interleaved `data` and appends it.
    pub fn push(&mut self, data: &[f32]) {
        let channels = usize::from(self.channels.max(1));
        let capacity = self.buffer.len();
        let frames = data.chunks_exact(channels);

        let new_len = frames.len().min(capacity);
        let skip = frames.len() - new_len;

        // move the older values to the left
        self.buffer.copy_within(new_len.., 0);

        for (value, samples) in self.buffer[capacity - new_len..]
            .iter_mut()
            .zip(frames.skip(skip))
        {
            *value = samples.iter().sum::<f32>() / channels as f32;
        }
    }

    pub fn latest(&self, buf: &mut [f32]) {
        let amount = buf.len().min(self.buffer.len());
        let buf_len = buf.len();

        buf[..buf_len - amount].fill(0.);
        buf[buf_len - amount..].copy_from_slice(&self.buffer[self.buffer.len() - amount..]);
    }
}

/// Errors which can occur while creating [crate::fetcher::SystemAudioFetcher].
#[derive(thiserror::Error, Debug)]
pub enum SystemAudioError {
    /// No default audio device could be found to fetch from.
    #[error("Couldn't retrieve default output dev")]
    NoDefaultDevice,

    /// No configuration with `f32` samples could be found of the device.
    #[error("Couldn't retrieve any config with f32 samples of the output stream of the device.")]
    NoAvailableOutputConfigs,

    #[error("Couldn't retrieve the supported configs of the device: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("Couldn't build the audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Couldn't start the audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Fetcher for the system audio.
///
/// It's recommended to use [SystemAudio::default] to create a new instance of this struct.
pub struct SystemAudio {
    sample_buffer: Arc<Mutex<SampleBuffer>>,
    sample_rate: SampleRate,

    stream: cpal::Stream,
}

impl SystemAudio {
    /// This exposes the API of [cpal] which you can use to use your own [cpal::Device] and [cpal::SupportedStreamConfigRange]
    /// if you want.
    #[instrument(name = "SystemAudio::new", skip_all)]
    pub fn new<E>(
        device: &cpal::Device,
        stream_config_range: &SupportedStreamConfigRange,
        error_callback: E,
    ) -> Result<Box<Self>, SystemAudioError>
    where
        E: FnMut(StreamError) + Send + 'static,
    {
        let stream_config = {
            let supported_stream_config = stream_config_range
                .try_with_sample_rate(DEFAULT_SAMPLE_RATE)
                .unwrap_or(stream_config_range.with_max_sample_rate());
            supported_stream_config.config()
        };
        let sample_rate = stream_config.sample_rate;

        debug!("Stream config: {:?}", stream_config);

        let sample_buffer = {
            // one second of audio is more than any spectrum needs
            let buffer = SampleBuffer::new(sample_rate.0 as usize, stream_config.channels);
            Arc::new(Mutex::new(buffer))
        };

        let stream = device.build_input_stream(
            &stream_config,
            {
                let buffer = sample_buffer.clone();
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mut buf = buffer.lock().unwrap_or_else(PoisonError::into_inner);
                    buf.push(data);
                }
            },
            error_callback,
            None,
        )?;
        stream.play()?;

        Ok(Box::new(Self {
            stream,
            sample_buffer,
            sample_rate,
        }))
    }

    /// Picks the default output device of the default host and its best fitting config.
    ///
    /// This is the recommended function to create an instance of this struct.
    ///
    /// # Args
    /// - `error_callback` will be passed to the
    ///   `error_callback` of [`cpal::traits::DeviceTrait::build_input_stream`].
    pub fn default<E>(error_callback: E) -> Result<Box<Self>, SystemAudioError>
    where
        E: FnMut(StreamError) + Send + 'static,
    {
        let Some(default_device) = cpal::default_host().default_output_device() else {
            return Err(SystemAudioError::NoDefaultDevice);
        };

        let default_stream_config = default_output_config(&default_device)?;

        Self::new(&default_device, &default_stream_config, error_callback)
    }
}

impl Drop for SystemAudio {
    /// Closes the audio stream before it gets dropped.
    fn drop(&mut self) {
        if let Err(err) = self.stream.pause() {
            warn!("Couldn't pause the audio stream: {}", err);
        }
    }
}

impl Fetcher for SystemAudio {
    fn fetch_samples(&mut self, buf: &mut [f32]) {
        let sample_buffer = self
            .sample_buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        sample_buffer.latest(buf);
    }

    fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }
}

/// Returns the best fitting config of the device which delivers `f32` samples.
#[instrument(skip_all)]
pub fn default_output_config(
    device: &cpal::Device,
) -> Result<SupportedStreamConfigRange, SystemAudioError> {
    let mut matching_configs: Vec<_> = device
        .supported_output_configs()?
        .filter(|config| config.sample_format() == SampleFormat::F32)
        .collect();

    matching_configs.sort_by(|a, b| a.cmp_default_heuristics(b));
    matching_configs
        .into_iter()
        .next()
        .ok_or(SystemAudioError::NoAvailableOutputConfigs)
}
