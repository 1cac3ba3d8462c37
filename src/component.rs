use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::graph_util::{Graph, PowerGraph};

/// 元件 i 放在節點 `placement[i]` 上
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Placement(Vec<usize>);

impl From<Vec<usize>> for Placement {
    fn from(nodes: Vec<usize>) -> Self {
        Placement(nodes)
    }
}

impl Placement {
    pub fn get_component_cnt(&self) -> usize {
        self.0.len()
    }
    pub fn node_of(&self, component: usize) -> Option<usize> {
        self.0.get(component).copied()
    }
    pub fn nodes(&self) -> &[usize] {
        &self.0
    }
    /// 把一個元件搬到另一個節點，回傳新的配置
    pub fn moved(&self, component: usize, node: usize) -> Placement {
        let mut nodes = self.0.clone();
        nodes[component] = node;
        Placement(nodes)
    }
    /// 檢查所有元件都放在圖中存在的節點上
    pub fn check(&self, g: &PowerGraph) -> Result<(), String> {
        for (component, &node) in self.0.iter().enumerate() {
            if node >= g.get_node_cnt() {
                return Err(format!("元件 {} 被放在不存在的節點 {}", component, node));
            }
        }
        Ok(())
    }
}

/// 兩個元件之間必需連通，且路徑上每條邊都要滿足延遲與頻寬限制
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub from: usize,
    pub to: usize,
    pub max_delay: f64,
    pub min_bandwidth: f64,
}

impl Demand {
    pub fn new(from: usize, to: usize, max_delay: f64, min_bandwidth: f64) -> Self {
        Demand {
            from,
            to,
            max_delay,
            min_bandwidth,
        }
    }
}

/// 需求必需指向存在的元件，且同一對元件只能出現一次
pub fn check_demands(demands: &[Demand], component_cnt: usize) -> Result<(), String> {
    let mut seen = HashSet::new();
    for d in demands.iter() {
        if d.from >= component_cnt || d.to >= component_cnt {
            return Err(format!(
                "需求 ({}, {}) 指向不存在的元件（共 {} 個元件）",
                d.from, d.to, component_cnt
            ));
        }
        if d.max_delay.is_nan() || d.min_bandwidth.is_nan() {
            return Err(format!("需求 ({}, {}) 的限制不是數字", d.from, d.to));
        }
        if !seen.insert((d.from, d.to)) {
            return Err(format!("需求 ({}, {}) 重複", d.from, d.to));
        }
    }
    Ok(())
}

/// 產生一個配置的鄰居（每次只動一個元件）
pub trait PlacementNeighbors: Sync {
    fn neighbors(&self, placement: &Placement, component: usize) -> Vec<Placement>;
}

/// 把元件搬到其它任一台主機上
pub struct MoveNeighbors {
    hosts: Vec<usize>,
}

impl MoveNeighbors {
    pub fn new(g: &PowerGraph) -> Self {
        let mut hosts = vec![];
        g.foreach_node(|id, is_switch| {
            if !is_switch {
                hosts.push(id);
            }
        });
        MoveNeighbors { hosts }
    }
}

impl PlacementNeighbors for MoveNeighbors {
    fn neighbors(&self, placement: &Placement, component: usize) -> Vec<Placement> {
        let cur = match placement.node_of(component) {
            Some(node) => node,
            None => return vec![],
        };
        self.hosts
            .iter()
            .filter(|&&host| host != cur)
            .map(|&host| placement.moved(component, host))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_move_neighbors() -> Result<(), String> {
        let mut g = PowerGraph::new();
        g.add_host(Some(2), 1.0)?;
        g.add_switch(Some(1), 1.0)?;
        g.add_host(Some(1), 1.0)?;
        let gen = MoveNeighbors::new(&g);
        let p = Placement::from(vec![0, 3]);
        let nbrs = gen.neighbors(&p, 0);
        assert_eq!(
            vec![Placement::from(vec![1, 3]), Placement::from(vec![3, 3])],
            nbrs
        );
        assert!(gen.neighbors(&p, 5).is_empty());
        assert!(p.check(&g).is_ok());
        assert!(Placement::from(vec![4]).check(&g).is_err());
        Ok(())
    }
    #[test]
    fn test_check_demands() {
        let ok = vec![Demand::new(0, 1, 1.0, 1.0), Demand::new(1, 0, 1.0, 1.0)];
        assert!(check_demands(&ok, 2).is_ok());
        assert!(check_demands(&ok, 1).is_err());
        let dup = vec![Demand::new(0, 1, 1.0, 1.0), Demand::new(0, 1, 2.0, 1.0)];
        assert!(check_demands(&dup, 2).is_err());
        let nan = vec![Demand::new(0, 1, std::f64::NAN, 1.0)];
        assert!(check_demands(&nan, 2).is_err());
    }
}
