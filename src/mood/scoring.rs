use std::fmt;

/// The five mood categories a quiz score maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mood {
    Tired,
    Distracted,
    Normal,
    Curious,
    Energetic,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Tired,
        Mood::Distracted,
        Mood::Normal,
        Mood::Curious,
        Mood::Energetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Tired => "Tired",
            Mood::Distracted => "Distracted",
            Mood::Normal => "Normal",
            Mood::Curious => "Curious",
            Mood::Energetic => "Energetic",
        }
    }

    pub fn parse(s: &str) -> Option<Mood> {
        Mood::ALL.iter().copied().find(|m| m.as_str() == s)
    }

    /// Map a summed score onto a mood band. Bands are inclusive on their
    /// upper bound; anything at or below 7 is Tired, 23 and up is Energetic.
    pub fn for_score(score: i64) -> Mood {
        if score <= 7 {
            Mood::Tired
        } else if score <= 12 {
            Mood::Distracted
        } else if score <= 17 {
            Mood::Normal
        } else if score <= 22 {
            Mood::Curious
        } else {
            Mood::Energetic
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sum the quiz answers and derive the mood band. No validation is applied
/// to the answer list; an empty list scores 0 and lands on Tired.
pub fn score_answers(answers: &[i64]) -> (i64, Mood) {
    let score: i64 = answers.iter().sum();
    (score, Mood::for_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(Mood::for_score(7), Mood::Tired);
        assert_eq!(Mood::for_score(8), Mood::Distracted);
        assert_eq!(Mood::for_score(12), Mood::Distracted);
        assert_eq!(Mood::for_score(13), Mood::Normal);
        assert_eq!(Mood::for_score(17), Mood::Normal);
        assert_eq!(Mood::for_score(18), Mood::Curious);
        assert_eq!(Mood::for_score(22), Mood::Curious);
        assert_eq!(Mood::for_score(23), Mood::Energetic);
    }

    #[test]
    fn empty_answers_score_zero_and_are_tired() {
        let (score, mood) = score_answers(&[]);
        assert_eq!(score, 0);
        assert_eq!(mood, Mood::Tired);
    }

    #[test]
    fn negative_answers_are_accepted() {
        let (score, mood) = score_answers(&[-5, -3]);
        assert_eq!(score, -8);
        assert_eq!(mood, Mood::Tired);
    }

    #[test]
    fn typical_answer_list() {
        let (score, mood) = score_answers(&[2, 4, 3, 1, 5]);
        assert_eq!(score, 15);
        assert_eq!(mood, Mood::Normal);
    }

    #[test]
    fn large_scores_are_energetic() {
        let (score, mood) = score_answers(&[10, 10, 10]);
        assert_eq!(score, 30);
        assert_eq!(mood, Mood::Energetic);
    }

    #[test]
    fn parse_round_trips_labels() {
        for mood in Mood::ALL {
            assert_eq!(Mood::parse(mood.as_str()), Some(mood));
        }
        assert_eq!(Mood::parse("Grumpy"), None);
    }
}
