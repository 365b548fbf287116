use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

use chefia::ChefError;

const TARGET_RATE: u32 = 16000;

/// Start capturing audio from the default input device.
/// Samples are appended to the shared buffer as mono f32 at roughly 16kHz.
/// Drop the returned `Stream` to stop recording and release the microphone.
///
/// Any failure to open the device is reported as `MediaAccessDenied`.
pub fn start_capture(buffer: Arc<Mutex<Vec<f32>>>) -> Result<(cpal::Stream, u32), ChefError> {
    open_stream(buffer).map_err(|e| ChefError::MediaAccessDenied(e.to_string()))
}

fn open_stream(
    buffer: Arc<Mutex<Vec<f32>>>,
) -> Result<(cpal::Stream, u32), Box<dyn std::error::Error>> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or("No input device found")?;

    log::info!("Input device: {:?}", device.description());

    let supported_configs: Vec<_> = device.supported_input_configs()?.collect();

    let desired = supported_configs.iter().find(|c| {
        c.channels() == 1
            && c.min_sample_rate() <= TARGET_RATE
            && c.max_sample_rate() >= TARGET_RATE
            && c.sample_format() == cpal::SampleFormat::F32
    });

    let (config, native_rate, downsample_factor) = if let Some(cfg) = desired {
        (cfg.with_sample_rate(TARGET_RATE).config(), TARGET_RATE, 1usize)
    } else {
        // Default config, decimated in the callback
        let default_config = device.default_input_config()?;
        let rate = default_config.sample_rate();
        let factor = (rate / TARGET_RATE).max(1) as usize;
        let actual_rate = rate / factor as u32;
        log::info!("Using native rate {rate}Hz, downsampling by {factor}x to ~{actual_rate}Hz");
        (default_config.config(), actual_rate, factor)
    };

    let channels = config.channels as usize;

    let stream = device.build_input_stream(
        &config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            let Ok(mut buf) = buffer.lock() else {
                return;
            };
            for (i, frame) in data.chunks(channels).enumerate() {
                if i % downsample_factor == 0 {
                    buf.push(frame.iter().sum::<f32>() / channels as f32);
                }
            }
        },
        |err| log::error!("Input stream error: {err}"),
        None,
    )?;

    stream.play()?;
    Ok((stream, native_rate))
}
