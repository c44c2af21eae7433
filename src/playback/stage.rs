use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    foundation::core::Canvas,
    foundation::error::TideloopResult,
    playback::scheduler::Presenter,
    render::surface::{FrameRGBA, Surface},
};

/// Registry of mounted presentation regions, keyed by element id.
///
/// Clones share the same registry.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    elements: Arc<Mutex<BTreeMap<String, StageElement>>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount (or remount) an element of the given size and return a handle to it.
    pub fn mount(&self, id: impl Into<String>, canvas: Canvas) -> StageElement {
        let id = id.into();
        let element = StageElement {
            id: Arc::from(id.as_str()),
            state: Arc::new(Mutex::new(ElementState {
                canvas,
                frame: None,
            })),
        };
        lock(&self.elements).insert(id, element.clone());
        element
    }

    pub fn unmount(&self, id: &str) -> bool {
        lock(&self.elements).remove(id).is_some()
    }

    pub fn element(&self, id: &str) -> Option<StageElement> {
        lock(&self.elements).get(id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        lock(&self.elements).keys().cloned().collect()
    }
}

#[derive(Debug)]
struct ElementState {
    canvas: Canvas,
    frame: Option<FrameRGBA>,
}

/// A mounted region holding a copy of the last frame presented to it.
#[derive(Clone, Debug)]
pub struct StageElement {
    id: Arc<str>,
    state: Arc<Mutex<ElementState>>,
}

impl StageElement {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn canvas(&self) -> Canvas {
        lock(&self.state).canvas
    }

    pub fn set_canvas(&self, canvas: Canvas) {
        let mut state = lock(&self.state);
        if state.canvas != canvas {
            state.canvas = canvas;
            state.frame = None;
        }
    }

    /// Last presented frame, or `None` before the first present.
    pub fn latest_frame(&self) -> Option<FrameRGBA> {
        lock(&self.state).frame.clone()
    }
}

impl Presenter for StageElement {
    fn present(&mut self, surface: &Surface) -> TideloopResult<()> {
        let mut state = lock(&self.state);
        state.canvas = surface.canvas();
        state.frame = Some(surface.to_frame());
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/playback/stage.rs"]
mod tests;
