//! WASM bindings for numbrush-core
//!
//! Lets a browser front end drive the puzzle state machine and render tones
//! with the same synthesizer the native engine uses. Playback itself stays
//! on the JavaScript side.

#![cfg(feature = "wasm")]

use crate::game::{ClickOutcome, GameSession};
use crate::synth::{synthesize, SoundName};
use crate::types::{Level, ToneSpec, Waveform};
use std::sync::Arc;
use wasm_bindgen::prelude::*;

fn outcome_name(outcome: ClickOutcome) -> &'static str {
    match outcome {
        ClickOutcome::NoOp => "noop",
        ClickOutcome::CorrectMatch => "correctMatch",
        ClickOutcome::Feedback => "feedback",
        ClickOutcome::LevelComplete => "levelComplete",
    }
}

/// A game session handle for JavaScript
#[wasm_bindgen]
pub struct WasmSession {
    inner: GameSession,
}

#[wasm_bindgen]
impl WasmSession {
    /// Build a session from a level object (`{ name, palette, sections }`)
    #[wasm_bindgen(constructor)]
    pub fn new(level: JsValue) -> Result<WasmSession, JsError> {
        let level: Level = serde_wasm_bindgen::from_value(level)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(WasmSession {
            inner: GameSession::new(Arc::new(level)),
        })
    }

    #[wasm_bindgen(js_name = selectColor)]
    pub fn select_color(&mut self, color: &str) {
        self.inner.select_color(color);
    }

    /// Returns "noop", "correctMatch", "feedback" or "levelComplete"
    #[wasm_bindgen(js_name = clickSection)]
    pub fn click_section(&mut self, number: u32) -> String {
        outcome_name(self.inner.click_section(number)).to_string()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// `{ number, color }` or `null` once the level is complete
    #[wasm_bindgen(js_name = currentInstruction)]
    pub fn current_instruction(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.inner.current_instruction())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = completedCount)]
    pub fn completed_count(&self) -> usize {
        self.inner.completed_count()
    }

    #[wasm_bindgen(js_name = fillFor)]
    pub fn fill_for(&self, number: u32) -> Option<String> {
        self.inner.fill_for(number).map(|c| c.to_string())
    }
}

/// Render a tone into mono f32 samples
#[wasm_bindgen(js_name = synthesizeTone)]
pub fn synthesize_tone(
    frequency: f32,
    duration: f32,
    waveform: &str,
    sample_rate: u32,
) -> Result<Vec<f32>, JsError> {
    let waveform = Waveform::from_str(waveform)
        .ok_or_else(|| JsError::new(&format!("unknown waveform '{}'", waveform)))?;
    let spec = ToneSpec::new(frequency, duration, waveform)?;
    Ok(synthesize(&spec, sample_rate).samples().to_vec())
}

/// Render a catalogue sound by key
#[wasm_bindgen(js_name = synthesizeSound)]
pub fn synthesize_sound(name: &str, sample_rate: u32) -> Result<Vec<f32>, JsError> {
    let sound: SoundName = name.parse()?;
    Ok(synthesize(&sound.tone_spec(), sample_rate).samples().to_vec())
}
