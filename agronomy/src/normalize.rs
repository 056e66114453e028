//! Plant name normalization.
//!
//! Farmers type plant names in Arabic, English, or a mix of both, and the
//! probe firmware forwards them verbatim. Every name must map to a stable
//! slug so that target ranges generated once are found again on the next
//! reading. Resolution order: exact alias match, substring containment
//! match, slug fallback.

use tracing::debug;

/// Maximum length of a derived slug, in characters.
const MAX_SLUG_LEN: usize = 50;

/// One canonical plant with its accepted spellings.
struct PlantAliases {
    key: &'static str,
    aliases: &'static [&'static str],
}

/// Canonical plants in fixed match order. Substring matching scans this
/// list top to bottom and returns the first hit, so the order is part of
/// the contract.
const PLANTS: &[PlantAliases] = &[
    PlantAliases {
        key: "tomato",
        aliases: &["tomato", "tomatoes", "طماطم", "طماطة", "بندورة"],
    },
    PlantAliases {
        key: "cucumber",
        aliases: &["cucumber", "خيار"],
    },
    PlantAliases {
        key: "lemon",
        aliases: &["lemon", "ليمون"],
    },
    PlantAliases {
        key: "date-palm",
        aliases: &["date palm", "date", "نخيل تمر", "نخيل", "نخل", "تمر"],
    },
    PlantAliases {
        key: "lettuce",
        aliases: &["lettuce", "خس"],
    },
    PlantAliases {
        key: "pepper",
        aliases: &["pepper", "bell pepper", "فلفل حلو", "فلفل رومي", "فلفل"],
    },
    PlantAliases {
        key: "eggplant",
        aliases: &["eggplant", "aubergine", "باذنجان"],
    },
    PlantAliases {
        key: "strawberry",
        aliases: &["strawberry", "فراولة"],
    },
    PlantAliases {
        key: "olive",
        aliases: &["olive", "زيتون"],
    },
    PlantAliases {
        key: "grape",
        aliases: &["grape", "grapes", "عنب"],
    },
];

/// Error from [`normalize`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum NormalizeError {
    /// Input was empty or whitespace-only
    #[error("plant name is empty")]
    Empty,

    /// Input contained no word characters to build a slug from
    #[error("plant name has no usable characters: {0:?}")]
    NoUsableCharacters(String),
}

/// Map a free-text plant name to a canonical slug key.
///
/// Known plants resolve to their canonical key regardless of which alias or
/// script was used; unknown plants get a deterministic slug derived from
/// the text itself, so any non-degenerate input yields a cache-safe key.
pub fn normalize(raw: &str) -> Result<String, NormalizeError> {
    let name = raw.trim().to_lowercase();
    if name.is_empty() {
        return Err(NormalizeError::Empty);
    }

    // Exact alias match
    for plant in PLANTS {
        if plant.aliases.iter().any(|a| a.to_lowercase() == name) {
            return Ok(plant.key.to_string());
        }
    }

    // Containment match, either direction, first plant in list order wins
    for plant in PLANTS {
        for alias in plant.aliases {
            let alias = alias.to_lowercase();
            if name.contains(&alias) || alias.contains(&name) {
                return Ok(plant.key.to_string());
            }
        }
    }

    // Unknown plant: derive a slug from the text itself
    let slug = slugify(&name);
    if slug.is_empty() {
        return Err(NormalizeError::NoUsableCharacters(raw.to_string()));
    }

    debug!(raw, slug = %slug, "plant name not in alias table, derived slug");
    Ok(slug)
}

/// Keep Unicode word characters, collapse whitespace runs to hyphens, drop
/// everything else, and truncate to [`MAX_SLUG_LEN`] characters.
fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() {
            pending_separator = true;
        }
        // Punctuation and symbols are dropped without acting as separators
    }

    slug.chars().take(MAX_SLUG_LEN).collect()
}
