use std::cell::RefCell;
use std::rc::Rc;

use chefia::media::encode_recording;
use chefia::MediaKind;

use super::pipeline::dispatch_request;
use super::state::AppState;

/// Hold-to-talk press: open the microphone.
pub fn start_recording(state: &Rc<RefCell<AppState>>) {
    let mut s = state.borrow_mut();
    if !s.session.can_record() {
        return;
    }
    log::info!("Starting recording");

    if let Ok(mut buf) = s.audio_buffer.lock() {
        buf.clear();
    }

    let buffer = s.audio_buffer.clone();
    match crate::recorder::start_capture(buffer) {
        Ok((stream, sample_rate)) => {
            s.cpal_stream = Some(stream);
            s.sample_rate = sample_rate;
            s.session.recording_started();
        }
        Err(e) => s.session.media_access_denied(&e.to_string()),
    }
}

/// Hold-to-talk release: close the microphone and send what was said.
pub fn stop_recording(state: &Rc<RefCell<AppState>>) {
    let request = {
        let mut s = state.borrow_mut();
        // Release the device whatever happens next.
        s.cpal_stream = None;
        if !s.session.recording_stopped() {
            return;
        }
        log::info!("Stopping recording");

        let samples = s
            .audio_buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default();
        let sample_rate = s.sample_rate;
        log::info!(
            "Captured {} samples ({:.1}s at {}Hz)",
            samples.len(),
            samples.len() as f32 / sample_rate as f32,
            sample_rate
        );

        match encode_recording(&samples, sample_rate) {
            Ok(payload) => {
                log::debug!("Encoded recording: {} bytes of base64", payload.encoded_len());
                s.session.submit_media(payload, MediaKind::Audio)
            }
            Err(e) => {
                s.session.media_failed(MediaKind::Audio, &e);
                None
            }
        }
    };

    if let Some(request) = request {
        dispatch_request(state, request);
    }
}

/// Drop any live capture without submitting it.
pub fn cancel_recording(state: &Rc<RefCell<AppState>>) {
    let mut s = state.borrow_mut();
    if s.cpal_stream.take().is_some() {
        log::info!("Recording discarded");
    }
    if let Ok(mut buf) = s.audio_buffer.lock() {
        buf.clear();
    }
}
