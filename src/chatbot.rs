//! Canned chatbot text: a per-mood suggestion table keyed off a user's latest
//! quiz result, and a keyword-matched reply for free-form questions.

use crate::mood::scoring::Mood;

const DEFAULT_SUGGESTION: &str = "A good moment to reflect on how your day went.";

/// Suggestion shown to a user based on their most recent mood entry.
pub fn suggestion_for(mood: &str) -> &'static str {
    match Mood::parse(mood) {
        Some(Mood::Tired) => "Don't forget to rest a little today. Tomorrow is a fresh start!",
        Some(Mood::Distracted) => "A short walk can help you clear your head.",
        Some(Mood::Normal) => "Great! Today is a good opportunity to be productive.",
        Some(Mood::Curious) => "Keep exploring! It might be the perfect time to learn something new.",
        Some(Mood::Energetic) => {
            "Put that energy to work! Share what you know and join a project."
        }
        None => DEFAULT_SUGGESTION,
    }
}

/// Keyword-matched canned reply for the /chatbot/ask endpoint. First match
/// in the ladder wins; anything unrecognized gets the generic fallback.
pub fn reply_to(message: &str) -> &'static str {
    let msg = message.to_lowercase();

    if msg.contains("hello") || msg.contains("hi ") || msg == "hi" {
        "Hello! How are you feeling today?"
    } else if msg.contains("tired") || msg.contains("sleep") {
        "Rest matters as much as study. Try a short break before your next task."
    } else if msg.contains("exam") || msg.contains("test") {
        "Break the material into small pieces and review a little every day."
    } else if msg.contains("focus") || msg.contains("distract") {
        "Put your phone away for twenty minutes and try a single small task."
    } else if msg.contains("thank") {
        "You're welcome! I'm here whenever you need me."
    } else if msg.contains("help") {
        "You can ask me about studying, focus, exams, or how you're feeling."
    } else {
        "I'm not sure I understood that, but I'm happy to chat about your day."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mood_has_a_suggestion() {
        for mood in Mood::ALL {
            assert_ne!(suggestion_for(mood.as_str()), DEFAULT_SUGGESTION);
        }
    }

    #[test]
    fn unknown_mood_gets_default_suggestion() {
        assert_eq!(suggestion_for("Grumpy"), DEFAULT_SUGGESTION);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert_eq!(reply_to("HELLO there"), reply_to("hello there"));
    }

    #[test]
    fn exam_keyword_matches() {
        assert!(reply_to("I have an exam tomorrow").contains("small pieces"));
    }

    #[test]
    fn unknown_message_gets_fallback() {
        assert!(reply_to("xyzzy").contains("not sure"));
    }
}
