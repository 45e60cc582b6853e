// src/problems/catalog.rs — Static DSA problem catalog and balanced selection

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::DsaProblem;
use crate::infra::errors::{InterviewError, Result};

const BUILTIN_CATALOG: &str = include_str!("catalog.json");

/// Most problems drawn from one topic in a single pass.
const MAX_PER_TOPIC: usize = 3;

/// Immutable set of problems, unique by id.
#[derive(Debug, Clone)]
pub struct ProblemCatalog {
    problems: Vec<DsaProblem>,
}

impl ProblemCatalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let problems: Vec<DsaProblem> = serde_json::from_str(json)
            .map_err(|e| InterviewError::Catalog(format!("invalid catalog JSON: {e}")))?;
        Self::from_problems(problems)
    }

    pub fn from_problems(problems: Vec<DsaProblem>) -> Result<Self> {
        let mut seen = HashSet::new();
        for p in &problems {
            if !seen.insert(p.id.as_str()) {
                return Err(InterviewError::Catalog(format!(
                    "duplicate problem id '{}'",
                    p.id
                )));
            }
        }
        Ok(Self { problems })
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn all(&self) -> &[DsaProblem] {
        &self.problems
    }

    pub fn get(&self, id: &str) -> Option<&DsaProblem> {
        self.problems.iter().find(|p| p.id == id)
    }

    /// Problems grouped by their primary topic, in topic-name order.
    pub fn by_topic(&self) -> BTreeMap<&str, Vec<&DsaProblem>> {
        let mut groups: BTreeMap<&str, Vec<&DsaProblem>> = BTreeMap::new();
        for p in &self.problems {
            groups.entry(p.primary_topic()).or_default().push(p);
        }
        groups
    }

    /// Draw a topic-balanced random set of `count` problems using the thread RNG.
    pub fn select_balanced_set(&self, count: usize) -> Vec<DsaProblem> {
        self.select_balanced_set_with(count, &mut rand::thread_rng())
    }

    /// Draw 1–3 problems per topic, shuffle, and truncate to `count`.
    ///
    /// When the per-topic draw comes up short, the remaining problems are
    /// shuffled in as top-up, so the result always has
    /// `min(count, self.len())` entries and never repeats an id.
    pub fn select_balanced_set_with<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Vec<DsaProblem> {
        if count == 0 || self.problems.is_empty() {
            return Vec::new();
        }

        let mut picked: Vec<&DsaProblem> = Vec::new();
        for group in self.by_topic().values() {
            let take = rng.gen_range(1..=MAX_PER_TOPIC).min(group.len());
            picked.extend(group.choose_multiple(rng, take).copied());
        }
        picked.shuffle(rng);

        if picked.len() < count {
            let chosen: HashSet<&str> = picked.iter().map(|p| p.id.as_str()).collect();
            let mut rest: Vec<&DsaProblem> = self
                .problems
                .iter()
                .filter(|p| !chosen.contains(p.id.as_str()))
                .collect();
            rest.shuffle(rng);
            picked.extend(rest);
        }

        picked.truncate(count);
        picked.into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Difficulty;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problem(id: &str, topic: &str) -> DsaProblem {
        DsaProblem {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            difficulty: Difficulty::Medium,
            topics: vec![topic.into()],
            input_format: String::new(),
            output_format: String::new(),
            samples: vec![],
        }
    }

    fn ids(set: &[DsaProblem]) -> HashSet<String> {
        set.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ProblemCatalog::builtin().unwrap();
        assert!(catalog.len() >= 15);
        assert!(catalog.by_topic().len() >= 6);
        assert!(catalog.get("two-sum").is_some());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ProblemCatalog::from_problems(vec![problem("a", "x"), problem("a", "y")])
            .unwrap_err();
        assert!(matches!(err, InterviewError::Catalog(_)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(ProblemCatalog::from_json("{not json").is_err());
    }

    #[test]
    fn test_selection_has_no_duplicates_and_exact_length() {
        let catalog = ProblemCatalog::builtin().unwrap();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for count in [1, 3, 5, 8] {
                let set = catalog.select_balanced_set_with(count, &mut rng);
                assert_eq!(set.len(), count.min(catalog.len()));
                assert_eq!(ids(&set).len(), set.len());
            }
        }
    }

    #[test]
    fn test_small_catalog_returns_everything() {
        let catalog =
            ProblemCatalog::from_problems(vec![problem("a", "arrays"), problem("b", "arrays")])
                .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let set = catalog.select_balanced_set_with(10, &mut rng);
        assert_eq!(set.len(), 2);
        assert_eq!(ids(&set), ["a", "b"].iter().map(|s| s.to_string()).collect());
    }

    #[test]
    fn test_top_up_when_topics_draw_short() {
        // One topic with many problems: the per-topic draw gives at most 3.
        let problems = (0..10).map(|i| problem(&format!("p{i}"), "graphs")).collect();
        let catalog = ProblemCatalog::from_problems(problems).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let set = catalog.select_balanced_set_with(6, &mut rng);
        assert_eq!(set.len(), 6);
        assert_eq!(ids(&set).len(), 6);
    }

    #[test]
    fn test_zero_and_empty() {
        let catalog = ProblemCatalog::builtin().unwrap();
        assert!(catalog.select_balanced_set(0).is_empty());
        let empty = ProblemCatalog::from_problems(vec![]).unwrap();
        assert!(empty.select_balanced_set(3).is_empty());
    }

    #[test]
    fn test_selection_spans_topics() {
        let catalog = ProblemCatalog::builtin().unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let set = catalog.select_balanced_set_with(6, &mut rng);
        let topics: HashSet<&str> = set.iter().map(|p| p.primary_topic()).collect();
        assert!(topics.len() >= 2);
    }
}
