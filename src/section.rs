//! Page sections that cross-fade as the scroll band changes.

use serde::Serialize;

/// One of the fixed UI sections overlaid on the scene.
///
/// The id doubles as the DOM element id in the browser build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    Mid,
    Particles,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Hero, Section::Mid, Section::Particles];

    pub fn id(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::Mid => "mid",
            Section::Particles => "particles",
        }
    }

    pub fn from_id(id: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.id() == id)
    }

    fn index(self) -> usize {
        match self {
            Section::Hero => 0,
            Section::Mid => 1,
            Section::Particles => 2,
        }
    }
}

/// Current opacity of every section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOpacities {
    values: [f32; 3],
}

impl SectionOpacities {
    /// All sections start fully visible, as unstyled page content does.
    pub fn new() -> Self {
        Self { values: [1.0; 3] }
    }

    pub fn get(&self, section: Section) -> f32 {
        self.values[section.index()]
    }

    pub fn set(&mut self, section: Section, opacity: f32) {
        self.values[section.index()] = opacity.clamp(0.0, 1.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, f32)> + '_ {
        Section::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

impl Default for SectionOpacities {
    fn default() -> Self {
        Self::new()
    }
}
