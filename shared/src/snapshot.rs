//! Fallback option tables for the workspace's dropdown fields.
//!
//! ClickUp dropdown options get reordered and relabelled over time. Tasks
//! created under an older option set can carry an index or id that the live
//! `type_config.options` no longer contains; these tables keep those tasks
//! readable. Live options are always consulted first.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Content Type labels by option order index, as of the last option reshuffle.
const CONTENT_TYPE_BY_INDEX: &[(i64, &str)] = &[
    (0, "Blog Post"),
    (1, "Social Post"),
    (2, "Newsletter"),
    (3, "Video"),
    (4, "Podcast"),
    (5, "Webinar"),
    (6, "Press Release"),
    (7, "Case Study"),
    (8, "Landing Page"),
    (9, "Event"),
];

/// Index tables by the name of the field they belong to. Order indexes are
/// only meaningful within one field.
const LABELS_BY_INDEX: &[(&str, &[(i64, &str)])] = &[("Content Type", CONTENT_TYPE_BY_INDEX)];

/// Option labels by option id across Content Type, Publish Location and
/// Hemisphere, including options that have since been deleted.
const OPTION_NAME_BY_ID: &[(&str, &str)] = &[
    // Content Type
    ("6d1a2f4e-0b3c-4e8a-9f21-3c5d7e9a1b02", "Blog Post"),
    ("9e4b7c12-5a6d-4f3e-8b90-1d2c3e4f5a6b", "Social Post"),
    ("2f8c9d0e-1a2b-4c3d-9e8f-7a6b5c4d3e2f", "Newsletter"),
    ("b7a6c5d4-e3f2-4a1b-8c9d-0e1f2a3b4c5d", "Video"),
    ("4c3d2e1f-0a9b-4c8d-b7e6-f5a4b3c2d1e0", "Podcast"),
    ("e1f2a3b4-c5d6-4e7f-a8b9-c0d1e2f3a4b5", "Webinar"),
    ("7a8b9c0d-1e2f-4a3b-8c4d-5e6f7a8b9c0d", "Press Release"),
    ("0d1e2f3a-4b5c-4d6e-9f7a-8b9c0d1e2f3a", "Case Study"),
    ("5b6c7d8e-9f0a-4b1c-ad2e-3f4a5b6c7d8e", "Landing Page"),
    ("c9d0e1f2-a3b4-4c5d-8e6f-7a8b9c0d1e2f", "Event"),
    ("3e4f5a6b-7c8d-4e9f-a0b1-c2d3e4f5a6b7", "Infographic"),
    // Publish Location
    ("a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d", "Instagram"),
    ("b2c3d4e5-f6a7-4b8c-9d0e-1f2a3b4c5d6e", "Facebook"),
    ("c3d4e5f6-a7b8-4c9d-8e1f-2a3b4c5d6e7f", "LinkedIn"),
    ("d4e5f6a7-b8c9-4d0e-9f2a-3b4c5d6e7f8a", "TikTok"),
    ("e5f6a7b8-c9d0-4e1f-a3b4-4c5d6e7f8a9b", "YouTube"),
    ("f6a7b8c9-d0e1-4f2a-b4c5-5d6e7f8a9b0c", "X / Twitter"),
    ("a7b8c9d0-e1f2-4a3b-85d6-6e7f8a9b0c1d", "Website"),
    ("b8c9d0e1-f2a3-4b4c-96e7-7f8a9b0c1d2e", "Email"),
    ("c9d0e1f2-a3b4-4c5d-a7f8-8a9b0c1d2e3f", "Pinterest"),
    // Hemisphere
    ("d0e1f2a3-b4c5-4d6e-b8a9-9b0c1d2e3f4a", "Northern"),
    ("e1f2a3b4-c5d6-4e7f-89b0-0c1d2e3f4a5b", "Southern"),
    ("f2a3b4c5-d6e7-4f8a-90c1-1d2e3f4a5b6c", "Global"),
];

/// Immutable fallback lookup built once per process.
#[derive(Debug)]
pub struct OptionSnapshot {
    by_index: HashMap<(String, i64), &'static str>,
    by_id: HashMap<&'static str, &'static str>,
}

impl OptionSnapshot {
    fn builtin() -> Self {
        Self {
            by_index: LABELS_BY_INDEX
                .iter()
                .flat_map(|&(field, table)| {
                    table
                        .iter()
                        .map(move |&(index, name)| ((field.to_ascii_lowercase(), index), name))
                })
                .collect(),
            by_id: OPTION_NAME_BY_ID.iter().copied().collect(),
        }
    }

    /// The process-wide snapshot.
    pub fn get() -> &'static OptionSnapshot {
        static SNAPSHOT: OnceLock<OptionSnapshot> = OnceLock::new();
        SNAPSHOT.get_or_init(Self::builtin)
    }

    /// Label of an option index within the named field. Field names match
    /// case-insensitively.
    pub fn name_for_index(&self, field_name: &str, index: i64) -> Option<&'static str> {
        self.by_index
            .get(&(field_name.trim().to_ascii_lowercase(), index))
            .copied()
    }

    pub fn name_for_id(&self, id: &str) -> Option<&'static str> {
        self.by_id.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_lookups() {
        let snapshot = OptionSnapshot::get();
        assert_eq!(snapshot.name_for_index("Content Type", 2), Some("Newsletter"));
        assert_eq!(snapshot.name_for_index("content type ", 2), Some("Newsletter"));
        assert_eq!(snapshot.name_for_index("Content Type", 99), None);
        assert_eq!(
            snapshot.name_for_id("a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d"),
            Some("Instagram")
        );
        assert_eq!(snapshot.name_for_id("missing"), None);
    }

    #[test]
    fn test_snapshot_ids_are_unique() {
        let snapshot = OptionSnapshot::get();
        assert_eq!(snapshot.by_id.len(), OPTION_NAME_BY_ID.len());
        assert_eq!(snapshot.by_index.len(), CONTENT_TYPE_BY_INDEX.len());
    }

    #[test]
    fn test_index_labels_are_scoped_to_their_field() {
        let snapshot = OptionSnapshot::get();
        assert_eq!(snapshot.name_for_index("Parent Campaign", 6), None);
        assert_eq!(snapshot.name_for_index("Publish Location", 2), None);
    }
}
