//! Aggregation of per-class results and rendering of the final report.
//!
//! Three renderings carry the same content:
//!
//! - per-category listings, for people reading the console
//! - a `-D<property>=` flag value
//! - a shell assignment with one class per continued line

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::rules::{Category, ClassificationResult};

/// Interesting classes only, sorted by class name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedReport {
    pub classes: BTreeMap<String, BTreeSet<String>>,
    pub categories: BTreeMap<Category, BTreeMap<String, BTreeSet<String>>>,
}

impl AggregatedReport {
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = ClassificationResult>,
    {
        let mut report = Self::default();
        for result in results {
            report.insert(result);
        }
        report
    }

    /// Adds one class. Classes whose categories are all empty are dropped;
    /// a class seen twice is merged into its existing entries.
    pub fn insert(&mut self, result: ClassificationResult) {
        let methods = result.union();
        if methods.is_empty() {
            return;
        }

        for (category, names) in result.categories {
            if !names.is_empty() {
                self.categories
                    .entry(category)
                    .or_default()
                    .entry(result.class_name.clone())
                    .or_default()
                    .extend(names);
            }
        }
        self.classes
            .entry(result.class_name)
            .or_default()
            .extend(methods);
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn method_count(&self) -> usize {
        self.classes.values().map(BTreeSet::len).sum()
    }

    pub fn category(&self, category: Category) -> Option<&BTreeMap<String, BTreeSet<String>>> {
        self.categories.get(&category)
    }

    /// One heading per category followed by `\t<Class>[a, b]` lines.
    pub fn render_listing(&self) -> String {
        let mut out = String::new();
        for category in Category::ALL {
            out.push_str(category.heading());
            out.push('\n');
            for (class, methods) in self.category(category).into_iter().flatten() {
                out.push('\t');
                out.push_str(class);
                out.push_str(&bracketed(methods, ", "));
                out.push('\n');
            }
        }
        out
    }

    /// `<Class>[a,b];` for every class, concatenated.
    pub fn flag_value(&self) -> String {
        self.entries().collect()
    }

    pub fn render_property(&self, property_name: &str) -> String {
        format!("-D{property_name}={}", self.flag_value())
    }

    pub fn render_env(&self, var_name: &str) -> String {
        let mut out = format!("{var_name}=\"\\\n");
        for entry in self.entries() {
            out.push_str(&entry);
            out.push_str("\\\n");
        }
        out.push_str("\"\n");
        out
    }

    /// The full console report: listings, then both assignment forms.
    pub fn render_text(&self, property_name: &str, var_name: &str) -> String {
        let mut out = self.render_listing();
        out.push_str("System Property:\n");
        out.push_str(&self.render_property(property_name));
        out.push_str("\n\nEnvironment Variable:\n");
        out.push_str(&self.render_env(var_name));
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn entries(&self) -> impl Iterator<Item = String> + '_ {
        self.classes
            .iter()
            .map(|(class, methods)| format!("{class}{};", bracketed(methods, ",")))
    }
}

fn bracketed(methods: &BTreeSet<String>, separator: &str) -> String {
    let names: Vec<&str> = methods.iter().map(String::as_str).collect();
    format!("[{}]", names.join(separator))
}
