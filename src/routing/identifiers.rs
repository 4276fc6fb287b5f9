use regex::Regex;

/// Pulls `T<digits>_<digits>` tokens out of file names.
pub struct IdentifierExtractor {
    token_pattern: Regex,
}

impl IdentifierExtractor {
    pub fn new() -> Self {
        Self {
            token_pattern: Regex::new(r"T[0-9]+_[0-9]+").unwrap(),
        }
    }

    /// Distinct tokens in order of first appearance. Matches never overlap, so
    /// `T1_2_3` yields only `T1_2`.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for m in self.token_pattern.find_iter(text) {
            if !found.iter().any(|f| f == m.as_str()) {
                found.push(m.as_str().to_string());
            }
        }
        found
    }
}

impl Default for IdentifierExtractor {
    fn default() -> Self {
        Self::new()
    }
}
