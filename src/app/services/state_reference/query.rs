//! State code resolution and matching

use super::StateReference;

impl StateReference {
    /// Full name for a state code, if the table knows it
    pub fn resolve(&self, code: &str) -> Option<&str> {
        self.names_by_code
            .get(&code.trim().to_uppercase())
            .map(String::as_str)
    }

    /// Expand a code to its full name, passing unknown values through trimmed
    pub fn expand<'a>(&'a self, value: &'a str) -> &'a str {
        self.resolve(value).unwrap_or_else(|| value.trim())
    }

    /// Whether `value` is a full state name in the table
    pub fn is_known_name(&self, value: &str) -> bool {
        let value = value.trim();
        self.names_by_code
            .values()
            .any(|name| name.eq_ignore_ascii_case(value))
    }

    /// Whether a stored state value matches a criterion given as code or name
    ///
    /// `"MH"` matches rows stored as `"MH"` or `"Maharashtra"`; so does
    /// `"maharashtra"`.
    pub fn matches(&self, stored: &str, criterion: &str) -> bool {
        let stored = stored.trim();
        let criterion = criterion.trim();

        stored.eq_ignore_ascii_case(criterion)
            || stored.eq_ignore_ascii_case(self.expand(criterion))
            || self.expand(stored).eq_ignore_ascii_case(self.expand(criterion))
    }

    /// All codes in the table, sorted
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.names_by_code.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}
