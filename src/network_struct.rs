use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// 一條實體連線的屬性。頻寬代表剩餘容量。
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkAttr {
    pub delay: f64,
    pub bandwidth: f64,
    pub power: f64,
}

impl LinkAttr {
    pub fn new(delay: f64, bandwidth: f64, power: f64) -> Self {
        LinkAttr {
            delay,
            bandwidth,
            power,
        }
    }
}

pub trait Graph<K: Hash + Eq>: Clone {
    fn add_host(&mut self, cnt: Option<usize>, power: f64) -> Result<Vec<K>, String>;
    fn add_switch(&mut self, cnt: Option<usize>, power: f64) -> Result<Vec<K>, String>;
    /// 雙向連線，兩個方向共用同一個邊 ID
    fn add_edge(&mut self, id_pair: (K, K), attr: LinkAttr) -> Result<usize, String>;
    /// 單向連線
    fn add_arc(&mut self, id_pair: (K, K), attr: LinkAttr) -> Result<usize, String>;
    fn get_node_cnt(&self) -> usize;
    fn get_edge_cnt(&self) -> usize;
    fn foreach_node(&self, callback: impl FnMut(K, bool));
}
