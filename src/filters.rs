use std::{collections::BTreeMap, fmt};

/// A calendar dropdown and the ids of its input box and option list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterField {
    Years,
    Bodies,
}

impl FilterField {
    /// Dropdowns in the order they are applied.
    pub const ALL: [FilterField; 2] = [FilterField::Years, FilterField::Bodies];

    pub fn name(&self) -> &'static str {
        match self {
            FilterField::Years => "years",
            FilterField::Bodies => "bodies",
        }
    }

    pub fn input_id(&self) -> &'static str {
        match self {
            FilterField::Years => "ctl00_ContentPlaceHolder1_lstYears_Input",
            FilterField::Bodies => "ctl00_ContentPlaceHolder1_lstBodies_Input",
        }
    }

    pub fn dropdown_id(&self) -> &'static str {
        match self {
            FilterField::Years => "ctl00_ContentPlaceHolder1_lstYears_DropDown",
            FilterField::Bodies => "ctl00_ContentPlaceHolder1_lstBodies_DropDown",
        }
    }

    pub fn options_xpath(&self) -> String {
        format!("//div[@id='{}']/div/ul/li", self.dropdown_id())
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display values to select in the calendar dropdowns. Fields without a value
/// keep the dropdown's first option.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(BTreeMap<FilterField, String>);

impl Filters {
    pub fn new() -> Self {
        Filters::default()
    }

    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.0.insert(field, value.into());
        self
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }
}

/// Index of `value` among the dropdown option texts.
pub fn option_index(options: &[String], value: &str) -> Option<usize> {
    options.iter().position(|o| o.trim() == value.trim())
}
