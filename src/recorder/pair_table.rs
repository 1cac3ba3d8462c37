use std::collections::BTreeMap;

/// 以 (key1, key2) 為鍵的稀疏表。費洛蒙和最終的繞路表都存在這裡。
///
/// 每組鍵最多對應一個值；不存在的鍵由呼叫端決定預設值。
/// 呼叫端不應依賴遍歷的順序。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PairTable<K1, K2, V> {
    map: BTreeMap<(K1, K2), V>,
}

impl<K1: Ord + Copy, K2: Ord + Copy, V> PairTable<K1, K2, V> {
    pub fn new() -> Self {
        PairTable {
            map: BTreeMap::new(),
        }
    }
    /// 回傳被取代的舊值
    pub fn insert(&mut self, k1: K1, k2: K2, value: V) -> Option<V> {
        self.map.insert((k1, k2), value)
    }
    pub fn get(&self, k1: K1, k2: K2) -> Option<&V> {
        self.map.get(&(k1, k2))
    }
    pub fn get_or(&self, k1: K1, k2: K2, default: V) -> V
    where
        V: Clone,
    {
        self.map.get(&(k1, k2)).cloned().unwrap_or(default)
    }
    pub fn contains(&self, k1: K1, k2: K2) -> bool {
        self.map.contains_key(&(k1, k2))
    }
    pub fn remove(&mut self, k1: K1, k2: K2) -> Option<V> {
        self.map.remove(&(k1, k2))
    }
    /// 原地更新一個值。鍵不存在時，先以 `default` 代入 `transform`。
    pub fn compute(&mut self, k1: K1, k2: K2, default: V, transform: impl FnOnce(V) -> V) {
        let old = self.map.remove(&(k1, k2)).unwrap_or(default);
        self.map.insert((k1, k2), transform(old));
    }
    /// 對所有值做同一個轉換（例如費洛蒙蒸發）
    pub fn map(&mut self, mut transform: impl FnMut(&V) -> V) {
        for value in self.map.values_mut() {
            *value = transform(value);
        }
    }
    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (K1, K2, &V)> {
        self.map.iter().map(|(&(k1, k2), v)| (k1, k2, v))
    }
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values()
    }
}

impl<K1: Ord + Copy, K2: Ord + Copy, V> Default for PairTable<K1, K2, V> {
    fn default() -> Self {
        PairTable::new()
    }
}
