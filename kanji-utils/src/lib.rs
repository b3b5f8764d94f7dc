pub mod feed;
pub mod reading;

/// Difficulty level of a quiz pool. Numbered levels correspond to kanji
/// grade lists; `Extra` is the sentence-based event variant.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Extra,
}

impl Level {
    pub fn is_extra(self) -> bool {
        matches!(self, Level::Extra)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Four => "4",
            Level::Five => "5",
            Level::Six => "6",
            Level::Seven => "7",
            Level::Eight => "8",
            Level::Extra => "extra",
        };
        write!(f, "{name}")
    }
}

/// How the current question is presented to the user.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QuizFormat {
    /// Free-text input of the reading (or the corrected character on the
    /// extra level). Higher base rewards.
    Input,
    /// Four-choice selection among generated distractors.
    Choice,
}

/// Question style of an extra-level item.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Single answer: read the highlighted part of the sentence.
    Reading,
    /// Two answers: spot the wrong character and supply its correction.
    Correction,
}

/// One quiz-able unit, loaded from the item feed.
///
/// `reading` may list multiple acceptable readings separated by `、` and
/// may mark okurigana segments with paired `'` quotes, e.g. `おおき'い'`.
/// Immutable once loaded for a session; absent text fields default to
/// empty strings so the quiz layer never sees missing data.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    /// Stable per-item key, used for deduplication in distractor pools.
    pub filename: String,
    pub reading: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub components: String,
    #[serde(default)]
    pub kanji: Option<String>,
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub katakana: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub answer2: String,
    #[serde(default)]
    pub question_type: Option<QuestionType>,
}

impl Item {
    /// Whether this item can serve as a quiz question or distractor.
    /// An item whose reading yields no non-empty accepted form would
    /// silently produce empty-string choices, so it is excluded.
    pub fn is_quizzable(&self) -> bool {
        reading::has_balanced_marks(&self.reading)
            && reading::accepted_forms(&self.reading)
                .iter()
                .any(|form| !form.is_empty())
    }
}
