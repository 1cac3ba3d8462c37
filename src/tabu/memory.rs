use std::collections::HashSet;
use std::hash::Hash;

/// 兩代的禁忌表：上一次與這一次產生的鄰居都不能再被選為候選解
pub struct TabuMemory<S: Hash + Eq> {
    prev: HashSet<S>,
    cur: HashSet<S>,
}

impl<S: Hash + Eq + Clone> TabuMemory<S> {
    pub fn new() -> Self {
        TabuMemory {
            prev: HashSet::new(),
            cur: HashSet::new(),
        }
    }
    pub fn is_tabu(&self, s: &S) -> bool {
        self.prev.contains(s) || self.cur.contains(s)
    }
    /// 濾掉兩代中出現過的與重複的候選解（保留原本的順序），再把結果記成新的一代。
    pub fn admit(&mut self, candidates: Vec<S>) -> Vec<S> {
        let mut seen = HashSet::new();
        let admitted: Vec<S> = candidates
            .into_iter()
            .filter(|s| !self.is_tabu(s) && seen.insert(s.clone()))
            .collect();
        self.prev = std::mem::replace(&mut self.cur, seen);
        admitted
    }
    pub fn len(&self) -> usize {
        self.prev.len() + self.cur.len()
    }
    pub fn is_empty(&self) -> bool {
        self.prev.is_empty() && self.cur.is_empty()
    }
}

impl<S: Hash + Eq + Clone> Default for TabuMemory<S> {
    fn default() -> Self {
        TabuMemory::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_two_generations() {
        let mut memory = TabuMemory::new();
        assert_eq!(vec![1, 2, 3], memory.admit(vec![1, 2, 2, 3]));
        assert!(memory.is_tabu(&2));
        assert_eq!(vec![4], memory.admit(vec![1, 4]));
        // 1, 2, 3 還在上一代
        assert!(memory.is_tabu(&3));
        assert_eq!(vec![5], memory.admit(vec![3, 4, 5]));
        // 1, 2, 3 已經被擠出去
        assert!(!memory.is_tabu(&1));
        assert_eq!(vec![1], memory.admit(vec![1, 5]));
        assert_eq!(2, memory.len());
    }
    #[test]
    fn test_empty_generation_rotates() {
        let mut memory = TabuMemory::new();
        memory.admit(vec!["a"]);
        assert!(memory.admit(vec!["a"]).is_empty());
        assert!(memory.is_tabu(&"a"));
        assert!(memory.admit(vec![]).is_empty());
        assert!(!memory.is_tabu(&"a"));
        assert!(memory.is_empty());
    }
}
