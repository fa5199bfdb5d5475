use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub selected: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>, selected: bool) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            selected,
        }
    }
}

/// Mutually exclusive option list: at most one option is selected at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawSelectList")]
pub struct SelectList {
    options: Vec<SelectOption>,
}

#[derive(Deserialize)]
struct RawSelectList {
    options: Vec<SelectOption>,
}

impl TryFrom<RawSelectList> for SelectList {
    type Error = String;

    fn try_from(raw: RawSelectList) -> Result<Self, Self::Error> {
        let selected = raw.options.iter().filter(|o| o.selected).count();
        if selected > 1 {
            return Err(format!("at most one option may be selected, found {}", selected));
        }
        Ok(Self::new(raw.options))
    }
}

impl SelectList {
    /// Build a list, keeping only the first `selected` flag if several are set.
    pub fn new(options: Vec<SelectOption>) -> Self {
        let mut seen = false;
        let options = options
            .into_iter()
            .map(|mut option| {
                if option.selected {
                    if seen {
                        option.selected = false;
                    }
                    seen = true;
                }
                option
            })
            .collect();
        Self { options }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.selected)
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected().map(|o| o.value.as_str())
    }

    /// Select the option with `value`, deselecting every other one.
    ///
    /// Returns `true` when the selection changed. Unknown values leave the list untouched.
    pub fn select(&mut self, value: &str) -> bool {
        if !self.options.iter().any(|o| o.value == value) {
            return false;
        }
        if self.selected_value() == Some(value) {
            return false;
        }
        for option in &mut self.options {
            option.selected = option.value == value;
        }
        true
    }
}

/// Listing category shown on the home feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NowPlaying,
    Upcoming,
    Popular,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::NowPlaying, Category::Upcoming, Category::Popular];

    pub fn value(&self) -> &'static str {
        match self {
            Category::NowPlaying => "now_playing",
            Category::Upcoming => "upcoming",
            Category::Popular => "popular",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::NowPlaying => "Now Playing",
            Category::Upcoming => "Upcoming",
            Category::Popular => "Popular",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.value() == value)
    }

    pub fn select_list() -> SelectList {
        SelectList::new(
            Self::ALL
                .iter()
                .map(|c| SelectOption::new(c.label(), c.value(), *c == Category::NowPlaying))
                .collect(),
        )
    }
}

/// Server-side ordering for discover listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverSort {
    Title,
    Rating,
    ReleaseDate,
}

impl DiscoverSort {
    pub const ALL: [DiscoverSort; 3] = [DiscoverSort::Title, DiscoverSort::Rating, DiscoverSort::ReleaseDate];

    /// The `sort_by` value sent upstream.
    pub fn value(&self) -> &'static str {
        match self {
            DiscoverSort::Title => "original_title.asc",
            DiscoverSort::Rating => "vote_average.desc",
            DiscoverSort::ReleaseDate => "release_date.desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiscoverSort::Title => "By alphabetical order",
            DiscoverSort::Rating => "By rating",
            DiscoverSort::ReleaseDate => "By release date",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.value() == value)
    }

    pub fn select_list() -> SelectList {
        SelectList::new(
            Self::ALL
                .iter()
                .map(|s| SelectOption::new(s.label(), s.value(), *s == DiscoverSort::Title))
                .collect(),
        )
    }
}

impl Default for DiscoverSort {
    fn default() -> Self {
        DiscoverSort::Title
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::NowPlaying
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_count(list: &SelectList) -> usize {
        list.options().iter().filter(|o| o.selected).count()
    }

    #[test]
    fn test_default_lists_have_single_selection() {
        let categories = Category::select_list();
        assert_eq!(selected_count(&categories), 1);
        assert_eq!(categories.selected_value(), Some("now_playing"));

        let sorts = DiscoverSort::select_list();
        assert_eq!(selected_count(&sorts), 1);
        assert_eq!(sorts.selected_value(), Some("original_title.asc"));
    }

    #[test]
    fn test_select_moves_the_single_selection() {
        let mut categories = Category::select_list();
        assert!(categories.select("popular"));
        assert_eq!(selected_count(&categories), 1);
        assert_eq!(categories.selected_value(), Some("popular"));

        // Reselecting is not a change
        assert!(!categories.select("popular"));
    }

    #[test]
    fn test_select_unknown_value_is_ignored() {
        let mut sorts = DiscoverSort::select_list();
        assert!(!sorts.select("budget.desc"));
        assert_eq!(sorts.selected_value(), Some("original_title.asc"));
    }

    #[test]
    fn test_new_drops_extra_selections() {
        let list = SelectList::new(vec![
            SelectOption::new("A", "a", true),
            SelectOption::new("B", "b", true),
        ]);
        assert_eq!(selected_count(&list), 1);
        assert_eq!(list.selected_value(), Some("a"));
    }

    #[test]
    fn test_deserialize_rejects_multiple_selections() {
        let json = r#"{"options":[
            {"label":"A","value":"a","selected":true},
            {"label":"B","value":"b","selected":true}
        ]}"#;
        assert!(serde_json::from_str::<SelectList>(json).is_err());
    }

    #[test]
    fn test_deserialize_accepts_serialized_list() {
        let categories = Category::select_list();
        let json = serde_json::to_string(&categories).unwrap();
        let parsed: SelectList = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, categories);

        let none: SelectList = serde_json::from_str(r#"{"options":[{"label":"A","value":"a"}]}"#).unwrap();
        assert_eq!(none.selected(), None);
    }

    #[test]
    fn test_value_round_trips_through_lookup() {
        for category in Category::ALL {
            assert_eq!(Category::from_value(category.value()), Some(category));
        }
        assert_eq!(DiscoverSort::from_value("vote_average.desc"), Some(DiscoverSort::Rating));
    }
}
