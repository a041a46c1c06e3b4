use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{CLIENT_SUFFIX, ClassUnit, MethodUnit, REPOSITORY_SUFFIX};
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Synchronized,
    ClientCall,
    RepositoryCall,
    HighCallCount,
    HighBranchCount,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Synchronized,
        Category::ClientCall,
        Category::RepositoryCall,
        Category::HighCallCount,
        Category::HighBranchCount,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            Category::Synchronized => "Synchronized methods:",
            Category::ClientCall => "Client invocation methods:",
            Category::RepositoryCall => "Repository invocation methods:",
            Category::HighCallCount => "High call count methods:",
            Category::HighBranchCount => "High branch count methods:",
        }
    }

    /// Whether `method` of class `class_name` belongs to this category,
    /// ignoring the exclusion filter.
    pub fn matches(self, method: &MethodUnit, class_name: &str, config: &Config) -> bool {
        let c = &method.counters;
        match self {
            Category::Synchronized => method.is_synchronized || c.monitor_acquire_count > 0,
            Category::ClientCall => {
                c.has_client_style_call && !class_name.ends_with(CLIENT_SUFFIX)
            }
            Category::RepositoryCall => {
                c.has_repository_style_call && !class_name.ends_with(REPOSITORY_SUFFIX)
            }
            Category::HighCallCount => c.invocation_count >= config.call_count_threshold,
            Category::HighBranchCount => c.branch_count >= config.branch_count_threshold,
        }
    }
}

/// Category membership for one class. Every category is present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub class_name: String,
    pub categories: BTreeMap<Category, BTreeSet<String>>,
}

impl ClassificationResult {
    pub fn methods(&self, category: Category) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.categories.get(&category).unwrap_or(&EMPTY)
    }

    /// Union of all five category sets.
    pub fn union(&self) -> BTreeSet<String> {
        self.categories.values().flatten().cloned().collect()
    }

    pub fn is_interesting(&self) -> bool {
        self.categories.values().any(|m| !m.is_empty())
    }
}

pub fn classify_class(unit: &ClassUnit, config: &Config) -> ClassificationResult {
    let mut categories: BTreeMap<Category, BTreeSet<String>> =
        Category::ALL.iter().map(|c| (*c, BTreeSet::new())).collect();

    for method in unit
        .methods
        .iter()
        .filter(|m| !config.filter.is_excluded(&m.name))
    {
        for category in Category::ALL {
            if category.matches(method, &unit.name, config) {
                categories
                    .entry(category)
                    .or_default()
                    .insert(method.name.clone());
            }
        }
    }

    ClassificationResult {
        class_name: unit.name.clone(),
        categories,
    }
}
