use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use super::ids::QuestionId;

/// A single multiple-choice question as it appears in the pool.
///
/// Choice positions are significant: `correct_index` refers to the original,
/// unfiltered position in `choices`, including blank entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, deserialize_with = "choices_or_blank")]
    choices: Vec<String>,
    #[serde(default, deserialize_with = "numeric_index")]
    correct_index: Option<i64>,
}

/// A choice that should be rendered, paired with its original position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleChoice<'a> {
    pub index: usize,
    pub text: &'a str,
}

impl Question {
    #[must_use]
    pub fn new(id: impl Into<QuestionId>, choices: Vec<String>) -> Self {
        Self {
            id: id.into(),
            question: None,
            image: None,
            choices,
            correct_index: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.question = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn with_correct_index(mut self, index: i64) -> Self {
        self.correct_index = Some(index);
        self
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Question text, trimmed. `None` when missing or blank.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        non_blank(self.question.as_deref())
    }

    /// Image reference, trimmed. `None` when missing or blank.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        non_blank(self.image.as_deref())
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_index(&self) -> Option<i64> {
        self.correct_index
    }

    /// Text of the correct choice when `correct_index` points into `choices`.
    #[must_use]
    pub fn correct_choice(&self) -> Option<&str> {
        let index = usize::try_from(self.correct_index?).ok()?;
        self.choice(index)
    }

    /// Whether `index` names a choice the user may pick.
    #[must_use]
    pub fn is_selectable(&self, index: usize) -> bool {
        self.choice(index)
            .is_some_and(|text| !text.trim().is_empty())
    }

    /// Whether a chosen position matches the correct index.
    #[must_use]
    pub fn is_correct_choice(&self, index: usize) -> bool {
        matches_index(self.correct_index, Some(index))
    }

    /// Choices with blank entries skipped. Indices are not renumbered.
    pub fn visible_choices(&self) -> impl Iterator<Item = VisibleChoice<'_>> {
        self.choices
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(index, text)| VisibleChoice {
                index,
                text: text.as_str(),
            })
    }
}

pub(crate) fn matches_index(correct: Option<i64>, chosen: Option<usize>) -> bool {
    match (correct, chosen.and_then(|c| i64::try_from(c).ok())) {
        (Some(correct), Some(chosen)) => correct == chosen,
        _ => false,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn choices_or_blank<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Stored for numeric indices that name no position, such as `1.5`.
/// The value counts as present but never equals a chosen index.
const UNMATCHABLE_INDEX: i64 = i64::MIN;

fn numeric_index<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIndex {
        Integer(i64),
        Float(f64),
        Other(IgnoredAny),
    }

    Ok(match RawIndex::deserialize(deserializer)? {
        RawIndex::Integer(value) => Some(value),
        #[allow(clippy::cast_possible_truncation)]
        RawIndex::Float(value)
            if value.fract() == 0.0 && value.abs() <= 9_007_199_254_740_992.0 =>
        {
            Some(value as i64)
        }
        RawIndex::Float(_) => Some(UNMATCHABLE_INDEX),
        RawIndex::Other(_) => None,
    })
}
