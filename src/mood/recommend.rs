//! Static lookup tables: mood label to suggestion text, dominant mood to a
//! presentation template, and template key to its ordered section headings.

use crate::mood::scoring::Mood;

const DEFAULT_RECOMMENDATION: &str = "No specific recommendation is available.";

/// Content recommendation for a class whose dominant mood is `mood`.
pub fn recommendation_for(mood: &str) -> &'static str {
    match Mood::parse(mood) {
        Some(Mood::Tired) => "Prefer calmer, more restful content.",
        Some(Mood::Distracted) => "Use short, attention-grabbing materials.",
        Some(Mood::Normal) => "A balanced, standard lesson plan works well.",
        Some(Mood::Curious) => "Add interactive activities and open questions.",
        Some(Mood::Energetic) => "Lean on group work and active discussion.",
        None => DEFAULT_RECOMMENDATION,
    }
}

/// Presentation template key for a dominant mood. Only the extremes get a
/// dedicated template; everything else falls back to the balanced one.
pub fn template_for(mood: &str) -> &'static str {
    match Mood::parse(mood) {
        Some(Mood::Tired) => "relax_focus",
        Some(Mood::Energetic) => "deep_dive",
        _ => "balanced_engagement",
    }
}

/// Ordered section headings for a template key.
pub fn template_sections(key: &str) -> &'static [&'static str] {
    match key {
        "relax_focus" => &["Warm-up", "Guided recap", "Quiet practice", "Reflection"],
        "deep_dive" => &[
            "Hook",
            "Core concept",
            "Group challenge",
            "Open discussion",
            "Stretch goals",
        ],
        _ => &["Warm-up", "Core concept", "Practice", "Wrap-up"],
    }
}
