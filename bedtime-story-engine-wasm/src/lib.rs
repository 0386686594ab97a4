//! WASM bindings for bedtime-story-engine — powers the in-browser story maker.

use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

use bedtime_story_engine::core::compositor::StoryEngine;
use bedtime_story_engine::core::content::ContentPack;
use bedtime_story_engine::core::dice::RandomPicker;
use bedtime_story_engine::schema::keys::{AnimalKey, ThemeKey};
use bedtime_story_engine::schema::story::{StoryDraft, StoryRequest};

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct ChoiceInfo {
    key: &'static str,
    label: &'static str,
    description: &'static str,
}

fn parse_request(request_json: &str) -> Result<StoryRequest, JsError> {
    let request: StoryRequest = serde_json::from_str(request_json)
        .map_err(|e| JsError::new(&format!("Invalid request JSON: {e}")))?;
    request
        .validate()
        .map_err(|e| JsError::new(&format!("Invalid request: {e}")))?;
    Ok(request)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// StoryDemo — the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StoryDemo {
    engine: StoryEngine,
    picker: RandomPicker<StdRng>,
}

#[wasm_bindgen]
impl StoryDemo {
    /// Create a story maker over the built-in content with the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<StoryDemo, JsError> {
        let engine = StoryEngine::builder()
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(StoryDemo {
            engine,
            picker: RandomPicker::seeded(seed),
        })
    }

    /// Create a story maker with extra content merged over the built-in
    /// pack. Both arguments are RON text; pass `{}` for no vocabulary.
    pub fn with_content(
        seed: u64,
        fragments_ron: &str,
        vocabulary_ron: &str,
    ) -> Result<StoryDemo, JsError> {
        let mut content = ContentPack::builtin()
            .map_err(|e| JsError::new(&format!("Built-in content error: {e}")))?;
        let overlay = ContentPack::parse_ron(fragments_ron, vocabulary_ron)
            .map_err(|e| JsError::new(&format!("Content parse error: {e}")))?;
        content.merge(overlay);
        let engine = StoryEngine::new(content)
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(StoryDemo {
            engine,
            picker: RandomPicker::seeded(seed),
        })
    }

    /// Write a story for a request described by a JSON string.
    ///
    /// Expected JSON shape:
    /// ```json
    /// {
    ///   "childName": "Mia",
    ///   "animal": "fox",
    ///   "theme": "courage",
    ///   "customMessage": "Sweet dreams!",
    ///   "language": "en"
    /// }
    /// ```
    /// `customMessage` and `language` are optional. Returns the story as JSON.
    pub fn generate(&mut self, request_json: &str) -> Result<String, JsError> {
        let request = parse_request(request_json)?;
        let draft = self.engine.generate_with(&request, &mut self.picker);
        to_json(&draft)
    }

    /// Write several stories for the same request. Returns a JSON array.
    pub fn generate_variants(&mut self, request_json: &str, count: usize) -> Result<String, JsError> {
        let request = parse_request(request_json)?;
        let drafts: Vec<StoryDraft> = (0..count)
            .map(|_| self.engine.generate_with(&request, &mut self.picker))
            .collect();
        to_json(&drafts)
    }

    /// Return JSON array of the animals with their own stories.
    pub fn animals() -> String {
        let info: Vec<ChoiceInfo> = AnimalKey::ALL
            .iter()
            .map(|a| ChoiceInfo {
                key: a.as_str(),
                label: a.label(),
                description: a.description(),
            })
            .collect();
        to_json(&info).unwrap_or_else(|_| "[]".to_string())
    }

    /// Return JSON array of the themes with their own stories.
    pub fn themes() -> String {
        let info: Vec<ChoiceInfo> = ThemeKey::ALL
            .iter()
            .map(|t| ChoiceInfo {
                key: t.as_str(),
                label: t.label(),
                description: t.description(),
            })
            .collect();
        to_json(&info).unwrap_or_else(|_| "[]".to_string())
    }

    /// Restart the random sequence with a new seed.
    pub fn reset(&mut self, seed: u64) {
        self.picker = RandomPicker::seeded(seed);
    }
}
