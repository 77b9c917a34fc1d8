/// Operating mode, fixed for the engine's lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Every `fill`/`stroke` uploads and draws at once; paths are scratch.
    Immediate,
    /// `fill`/`stroke` commit geometry; `display` draws everything committed.
    Retained,
}

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub mode: Mode,

    /// Distinct style strings memoized before FIFO eviction starts.
    pub style_cache_capacity: usize,

    /// Default segment count for `arc` when the caller passes `None`.
    pub arc_segments: u32,

    /// Initial fill style (any form the color resolver accepts).
    pub fill_style: String,

    /// Initial stroke style.
    pub stroke_style: String,
}

impl EngineConfig {
    #[inline]
    pub fn immediate() -> Self {
        Self::default()
    }

    #[inline]
    pub fn retained() -> Self {
        Self {
            mode: Mode::Retained,
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Immediate,
            style_cache_capacity: 64,
            arc_segments: 17,
            fill_style: "black".to_string(),
            stroke_style: "black".to_string(),
        }
    }
}
