// HTMLAudioElement sound backend.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, Event, HtmlAudioElement};

use crate::error::FxError;
use crate::fx::{PlayOptions, SoundBackend, SoundId};

// Zero-length PCM clip swapped in when an asset fails to load.
const SILENT_WAV: &str =
    "data:audio/wav;base64,UklGRiQAAABXQVZFZm10IBAAAAABAAEARKwAAIhYAQACABAAZGF0YQAAAAA=";

struct LoadedSound {
    audio: HtmlAudioElement,
    on_error: Closure<dyn FnMut(Event)>,
}

#[derive(Default)]
pub struct HtmlAudioBackend {
    sounds: HashMap<SoundId, LoadedSound>,
    // Autoplay refusals reported after `play` has returned.
    rejected: Rc<RefCell<Vec<(SoundId, PlayOptions)>>>,
}

impl HtmlAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SoundBackend for HtmlAudioBackend {
    fn load(&mut self, id: SoundId, url: &str) -> Result<(), FxError> {
        let load_err = |e: JsValue| FxError::Load {
            id: id.name(),
            reason: format!("{e:?}"),
        };
        let audio = HtmlAudioElement::new_with_src(url).map_err(load_err)?;
        audio.set_preload("auto");

        let fallback = audio.clone();
        let on_error = Closure::wrap(Box::new(move |_evt: Event| {
            if fallback.src() != SILENT_WAV {
                warn!("sound {} failed to load, substituting silence", id.name());
                fallback.set_src(SILENT_WAV);
            }
        }) as Box<dyn FnMut(Event)>);
        audio
            .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
            .map_err(load_err)?;

        if let Some(old) = self.sounds.insert(id, LoadedSound { audio, on_error }) {
            detach(&old);
        }
        Ok(())
    }

    fn play(&mut self, id: SoundId, options: PlayOptions) -> Result<(), FxError> {
        let sound = self
            .sounds
            .get(&id)
            .ok_or_else(|| FxError::UnknownSound(id.name().to_string()))?;
        let audio = &sound.audio;
        audio.set_current_time(0.0);
        if let Some(volume) = options.volume {
            audio.set_volume(volume.clamp(0.0, 1.0) as f64);
        }
        if let Some(looped) = options.looped {
            audio.set_loop(looped);
        }
        let promise = audio.play().map_err(|e| FxError::Playback {
            id: id.name(),
            reason: format!("{e:?}"),
        })?;
        let rejected = self.rejected.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                if is_autoplay_refusal(&e) {
                    warn!("playback of {} blocked, will retry after next interaction", id.name());
                    rejected.borrow_mut().push((id, options));
                } else {
                    // AbortError from pause() or load(), or a decode failure.
                    debug!("playback of {} ended early: {e:?}", id.name());
                }
            }
        });
        Ok(())
    }

    fn stop(&mut self, id: SoundId) {
        if let Some(sound) = self.sounds.get(&id) {
            // pause() cannot throw for a plain media element; the Result is JS plumbing.
            let _ = sound.audio.pause();
            sound.audio.set_current_time(0.0);
        }
    }

    fn release(&mut self, id: SoundId) {
        if let Some(sound) = self.sounds.remove(&id) {
            let _ = sound.audio.pause();
            detach(&sound);
            sound.audio.remove_attribute("src").ok();
        }
    }

    fn take_rejected(&mut self) -> Vec<(SoundId, PlayOptions)> {
        std::mem::take(&mut *self.rejected.borrow_mut())
    }
}

fn is_autoplay_refusal(err: &JsValue) -> bool {
    err.dyn_ref::<DomException>()
        .is_some_and(|e| e.name() == "NotAllowedError")
}

fn detach(sound: &LoadedSound) {
    sound
        .audio
        .remove_event_listener_with_callback("error", sound.on_error.as_ref().unchecked_ref())
        .ok();
}
