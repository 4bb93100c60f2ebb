use crate::migration::Dataset;

/// Which side of the substring heuristic produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    NameContainsTag, // Facility name contains the dataset tag
    TagContainsPrefix, // Dataset tag contains the first two chars of the facility name
}

impl MatchRule {
    /// Get display label for match rule
    pub fn label(&self) -> &'static str {
        match self {
            MatchRule::NameContainsTag => "[Name ⊇ Tag]",
            MatchRule::TagContainsPrefix => "[Tag ⊇ Prefix]",
        }
    }
}

/// A dataset selected for a facility
#[derive(Debug, Clone, Copy)]
pub struct FacilityMatch<'a> {
    pub dataset: &'a Dataset,
    pub rule: MatchRule,
}

impl<'a> FacilityMatch<'a> {
    pub fn source_name(&self) -> &'a str {
        &self.dataset.source_name
    }
}
