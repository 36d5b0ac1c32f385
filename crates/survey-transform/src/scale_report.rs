//! Which question groups matched each scale class during cleaning.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use survey_model::ScaleBucket;

/// Question groups detected per scale class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScaleReport {
    groups: BTreeMap<ScaleBucket, BTreeSet<String>>,
}

impl ScaleReport {
    pub fn record(&mut self, bucket: ScaleBucket, group: &str) {
        self.groups
            .entry(bucket)
            .or_default()
            .insert(group.to_string());
    }

    /// Groups recorded for a scale class (empty when none matched).
    pub fn groups(&self, bucket: ScaleBucket) -> BTreeSet<String> {
        self.groups.get(&bucket).cloned().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeSet::is_empty)
    }

    /// One line per scale class, e.g. `5-scale grid questions: {q1, q4}`.
    pub fn lines(&self) -> Vec<String> {
        ScaleBucket::ALL
            .iter()
            .map(|bucket| {
                let groups = self.groups(*bucket);
                if groups.is_empty() {
                    format!("{}: none", bucket.report_heading())
                } else {
                    let joined: Vec<&str> = groups.iter().map(String::as_str).collect();
                    format!("{}: {{{}}}", bucket.report_heading(), joined.join(", "))
                }
            })
            .collect()
    }
}
