//! Theme label pools.
//!
//! Labels are opaque to the engine: they are only ever substituted into
//! templates. Structure (coordinates, costs, claims) is derived from pool
//! indices alone, so swapping one pack for another changes text and nothing
//! else.

use serde::{Deserialize, Serialize};

use crate::types::{Bell, LocationId, POOL_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePack {
    pub name: String,
    pub locations: Vec<String>,
    pub personas: Vec<Persona>,
    pub relics: Vec<String>,
    pub scents: Vec<String>,
    /// Display name for each bell of the day.
    pub bells: Vec<String>,
    /// Neutral notes; placeholders `{location}` and `{bell}`.
    pub ambient_templates: Vec<String>,
    /// Placeholders `{location}` and `{bell}`.
    pub anchor_template: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("theme pool '{pool}' must have {expected} entries, found {actual}")]
    PoolSize {
        pool: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("theme pool '{pool}' contains an empty label at index {index}")]
    EmptyLabel { pool: &'static str, index: usize },

    #[error("theme has no ambient templates")]
    NoAmbientTemplates,

    #[error("anchor template is missing placeholder '{placeholder}'")]
    MissingPlaceholder { placeholder: &'static str },
}

impl ThemePack {
    /// Check pool sizes and templates. Generation assumes a validated pack.
    pub fn validate(&self) -> Result<(), ThemeError> {
        check_pool("locations", &self.locations)?;
        check_pool("relics", &self.relics)?;
        check_pool("scents", &self.scents)?;
        check_pool("bells", &self.bells)?;

        if self.personas.len() != POOL_SIZE {
            return Err(ThemeError::PoolSize {
                pool: "personas",
                expected: POOL_SIZE,
                actual: self.personas.len(),
            });
        }
        if let Some(index) = self.personas.iter().position(|p| p.name.trim().is_empty()) {
            return Err(ThemeError::EmptyLabel {
                pool: "personas",
                index,
            });
        }

        if self.ambient_templates.is_empty() {
            return Err(ThemeError::NoAmbientTemplates);
        }
        for placeholder in ["{location}", "{bell}"] {
            if !self.anchor_template.contains(placeholder) {
                return Err(ThemeError::MissingPlaceholder { placeholder });
            }
        }
        Ok(())
    }

    pub fn location_label(&self, id: LocationId) -> &str {
        label(&self.locations, usize::from(id.0))
    }

    pub fn bell_label(&self, bell: Bell) -> &str {
        label(&self.bells, usize::from(bell))
    }

    pub fn relic_label(&self, relic: usize) -> &str {
        label(&self.relics, relic)
    }

    pub fn scent_label(&self, scent: usize) -> &str {
        label(&self.scents, scent)
    }

    pub fn persona(&self, index: usize) -> Option<&Persona> {
        self.personas.get(index)
    }
}

fn check_pool(pool: &'static str, labels: &[String]) -> Result<(), ThemeError> {
    if labels.len() != POOL_SIZE {
        return Err(ThemeError::PoolSize {
            pool,
            expected: POOL_SIZE,
            actual: labels.len(),
        });
    }
    if let Some(index) = labels.iter().position(|l| l.trim().is_empty()) {
        return Err(ThemeError::EmptyLabel { pool, index });
    }
    Ok(())
}

fn label(pool: &[String], index: usize) -> &str {
    pool.get(index).map(String::as_str).unwrap_or("?")
}

/// Substitute `{key}` placeholders in `template`.
pub fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

const HARBOR_LOCATIONS: [&str; POOL_SIZE] = ["Ford", "Gate", "Mill", "Chapel", "Quay", "Orchard"];
const HARBOR_PERSONAS: [(&str, &str); POOL_SIZE] = [
    ("Agnes Wick", "ferrywoman"),
    ("Brother Osric", "bell-ringer"),
    ("Celia Marrow", "herbalist"),
    ("Dunstan Hale", "miller"),
    ("Edda Crane", "tollkeeper"),
    ("Fenwick Rowe", "chandler"),
];
const HARBOR_RELICS: [&str; POOL_SIZE] = [
    "silver chalice",
    "saint's finger-bone",
    "iron reliquary key",
    "amber rosary",
    "gilded psalter",
    "pilgrim's lantern",
];
const HARBOR_SCENTS: [&str; POOL_SIZE] = [
    "tar smoke",
    "wet wool",
    "crushed mint",
    "river silt",
    "tallow",
    "bread ovens",
];
const HARBOR_BELLS: [&str; POOL_SIZE] = ["Lauds", "Prime", "Terce", "Sext", "None", "Vespers"];
const HARBOR_AMBIENT: [&str; 3] = [
    "The {location} was quiet at {bell}.",
    "Gulls circled over the {location} around {bell}.",
    "A cart rattled past the {location} near {bell}.",
];
const HARBOR_ANCHOR: &str = "The harbor horn sounded from the {location} at {bell}.";

impl Default for ThemePack {
    /// The built-in harbor pack.
    fn default() -> Self {
        Self {
            name: "harbor".to_string(),
            locations: HARBOR_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            personas: HARBOR_PERSONAS
                .iter()
                .map(|(name, role)| Persona {
                    name: name.to_string(),
                    role: role.to_string(),
                })
                .collect(),
            relics: HARBOR_RELICS.iter().map(|s| s.to_string()).collect(),
            scents: HARBOR_SCENTS.iter().map(|s| s.to_string()).collect(),
            bells: HARBOR_BELLS.iter().map(|s| s.to_string()).collect(),
            ambient_templates: HARBOR_AMBIENT.iter().map(|s| s.to_string()).collect(),
            anchor_template: HARBOR_ANCHOR.to_string(),
        }
    }
}
