use std::collections::HashSet;
use std::sync::Arc;

use super::Solution;
use crate::component::Placement;
use crate::graph_util::PowerGraph;

/// 判斷配置是否合法，並替一組解打分數
pub trait Evaluator: Sync {
    fn is_valid(&self, placement: &Placement) -> bool;
    fn fitness(&self, solution: &Solution) -> f64;
    /// `a` 是否比 `b` 好，預設越小越好
    fn is_better(&self, a: f64, b: f64) -> bool {
        a < b
    }
}

/// 以總功耗為分數：放了元件或在路徑上的節點，加上路徑上每條不重複的邊
pub struct PowerEvaluator {
    g: Arc<PowerGraph>,
}

impl PowerEvaluator {
    pub fn new(g: Arc<PowerGraph>) -> Self {
        PowerEvaluator { g }
    }
}

impl Evaluator for PowerEvaluator {
    fn is_valid(&self, placement: &Placement) -> bool {
        placement.nodes().iter().all(|&node| self.g.is_host(node))
    }
    fn fitness(&self, solution: &Solution) -> f64 {
        let mut nodes: HashSet<usize> = solution.placement.nodes().iter().copied().collect();
        let mut links = HashSet::new();
        for route in solution.routing.values() {
            let route = route.get_nodes();
            nodes.extend(route.iter().copied());
            for pair in route.windows(2) {
                if let Some(link) = self.g.get_link(pair[0], pair[1]) {
                    links.insert(link.id);
                }
            }
        }
        let node_power: f64 = nodes.iter().map(|&id| self.g.node_power(id)).sum();
        let link_power: f64 = links.iter().map(|&id| self.g.link_power(id)).sum();
        node_power + link_power
    }
}
