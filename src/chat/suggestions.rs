//! Autocomplete over the predefined-question corpus.
//!
//! [`filter`] is a pure function of its inputs. [`SuggestionList`] layers the
//! keyboard selection on top and is rebuilt on every input change.

use super::language::Language;

pub const MAX_SUGGESTIONS: usize = 5;

/// Case-insensitive substring match against `corpus`, corpus order, first five hits.
pub fn filter_corpus(input: &str, corpus: &'static [&'static str]) -> Vec<&'static str> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    // Untrimmed input participates in matching; only the emptiness test is trimmed.
    let needle = input.to_lowercase();
    corpus
        .iter()
        .copied()
        .filter(|question| question.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect()
}

pub fn filter(input: &str, language: Language) -> Vec<&'static str> {
    filter_corpus(input, language.corpus())
}

/// Outcome of Enter while the suggestion list is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterAction {
    /// A suggestion was highlighted; submit it
    Accept(&'static str),
    /// Nothing highlighted; submit whatever is typed
    SendInput,
}

/// Current suggestions plus the highlighted row (`None` means no selection)
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    items: Vec<&'static str>,
    selected: Option<usize>,
    dismissed: bool,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute(&mut self, input: &str, language: Language) {
        self.items = filter(input, language);
        self.selected = None;
        self.dismissed = false;
    }

    pub fn items(&self) -> &[&'static str] {
        &self.items
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&'static str> {
        self.selected.and_then(|idx| self.items.get(idx).copied())
    }

    pub fn is_visible(&self) -> bool {
        !self.dismissed && !self.items.is_empty()
    }

    pub fn select_next(&mut self) {
        if !self.is_visible() {
            return;
        }
        let last = self.items.len() - 1;
        self.selected = Some(match self.selected {
            None => 0,
            Some(idx) => (idx + 1).min(last),
        });
    }

    pub fn select_prev(&mut self) {
        if !self.is_visible() {
            return;
        }
        self.selected = match self.selected {
            None | Some(0) => None,
            Some(idx) => Some(idx - 1),
        };
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
        self.selected = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = None;
        self.dismissed = false;
    }

    pub fn on_enter(&self) -> EnterAction {
        match self.selected_item() {
            Some(item) if self.is_visible() => EnterAction::Accept(item),
            _ => EnterAction::SendInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_blank_input_is_empty(#[case] input: &str) {
        for lang in Language::ALL {
            assert!(filter(input, *lang).is_empty());
        }
    }

    #[rstest]
    #[case("navyakosh")]
    #[case("HOW")]
    #[case("it")]
    #[case("crop")]
    #[case("?")]
    fn test_results_bounded_and_matching(#[case] input: &str) {
        let results = filter(input, Language::English);
        assert!(results.len() <= MAX_SUGGESTIONS);
        for item in &results {
            assert!(item.to_lowercase().contains(&input.to_lowercase()), "{item} vs {input}");
        }
    }

    #[test]
    fn test_case_insensitive_preserves_corpus_order() {
        assert_eq!(
            filter("NAVYAKOSH", Language::English),
            vec![
                "What is Navyakosh Organic Fertilizer?",
                "What are the benefits of using Navyakosh?",
                "Where can I buy Navyakosh?",
            ]
        );
    }

    #[test]
    fn test_truncated_to_five() {
        // Every English question ends with '?'
        let results = filter("?", Language::English);
        assert_eq!(results.len(), MAX_SUGGESTIONS);
        assert_eq!(results[0], Language::English.corpus()[0]);
        assert_eq!(results[4], Language::English.corpus()[4]);
    }

    #[test]
    fn test_hindi_corpus() {
        let results = filter("नव्यकोश", Language::Hindi);
        assert_eq!(results.len(), 3);
        assert!(filter("navyakosh", Language::Hindi).is_empty());
    }

    #[test]
    fn test_no_match() {
        assert!(filter("tractor", Language::English).is_empty());
    }

    #[test]
    fn test_selection_resets_on_recompute() {
        let mut list = SuggestionList::new();
        list.recompute("how", Language::English);
        list.select_next();
        list.select_next();
        assert_eq!(list.selected(), Some(1));

        list.recompute("how d", Language::English);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut list = SuggestionList::new();
        list.recompute("navyakosh", Language::English);
        assert_eq!(list.items().len(), 3);

        list.select_prev();
        assert_eq!(list.selected(), None);

        list.select_next();
        list.select_next();
        list.select_next();
        list.select_next();
        assert_eq!(list.selected(), Some(2));

        list.select_prev();
        list.select_prev();
        list.select_prev();
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_enter_falls_through_without_selection() {
        let mut list = SuggestionList::new();
        list.recompute("navyakosh", Language::English);
        assert_eq!(list.on_enter(), EnterAction::SendInput);

        list.select_next();
        assert_eq!(
            list.on_enter(),
            EnterAction::Accept("What is Navyakosh Organic Fertilizer?")
        );
    }

    #[test]
    fn test_dismiss_hides_until_recompute() {
        let mut list = SuggestionList::new();
        list.recompute("navyakosh", Language::English);
        list.select_next();
        list.dismiss();
        assert!(!list.is_visible());
        assert_eq!(list.selected(), None);
        assert_eq!(list.on_enter(), EnterAction::SendInput);

        list.select_next();
        assert_eq!(list.selected(), None);

        list.recompute("navyakosh b", Language::English);
        assert!(!list.is_visible());
        list.recompute("buy", Language::English);
        assert!(list.is_visible());
    }

    #[test]
    fn test_blank_input_hides_list() {
        let mut list = SuggestionList::new();
        list.recompute("   ", Language::English);
        assert!(!list.is_visible());
        assert!(list.items().is_empty());
    }
}
