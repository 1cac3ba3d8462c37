use serde::Serialize;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::graph_util::{Activation, Link, PowerGraph};

/// 從起點到終點（皆包含）的節點序列，以及找到它時的邊際功耗
#[derive(Clone, Debug, Serialize)]
pub struct Route {
    nodes: Vec<usize>,
    power: f64,
}

impl Route {
    /// 起點即終點
    pub fn single(node: usize) -> Self {
        Route {
            nodes: vec![node],
            power: 0.0,
        }
    }
    pub fn get_nodes(&self) -> &[usize] {
        &self.nodes
    }
    pub fn get_power(&self) -> f64 {
        self.power
    }
    pub fn src(&self) -> usize {
        self.nodes[0]
    }
    pub fn dst(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }
}

// 功耗取決於找路當下的開關狀態，比較時只看節點序列
impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}
impl Eq for Route {}
impl Hash for Route {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nodes.hash(state);
    }
}

/// 建構中的路徑。記住已經走過的節點與邊，邊際功耗只算一次。
pub struct RouteDraft {
    nodes: Vec<usize>,
    node_set: HashSet<usize>,
    link_set: HashSet<usize>,
    power: f64,
}

impl RouteDraft {
    pub fn new(src: usize) -> Self {
        let mut node_set = HashSet::new();
        node_set.insert(src);
        RouteDraft {
            nodes: vec![src],
            node_set,
            link_set: HashSet::new(),
            power: 0.0,
        }
    }
    pub fn current(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }
    pub fn contains_node(&self, id: usize) -> bool {
        self.node_set.contains(&id)
    }
    pub fn get_power(&self) -> f64 {
        self.power
    }
    pub fn power_up(&self, g: &PowerGraph, state: &Activation, link: &Link) -> f64 {
        g.power_up(link, state, &self.node_set, &self.link_set)
    }
    pub fn push(&mut self, g: &PowerGraph, state: &Activation, link: &Link) {
        self.power += self.power_up(g, state, link);
        self.nodes.push(link.to);
        self.node_set.insert(link.to);
        self.link_set.insert(link.id);
    }
    pub fn finish(self) -> Route {
        Route {
            nodes: self.nodes,
            power: self.power,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph_util::{Graph, LinkAttr};

    #[test]
    fn test_draft_power() -> Result<(), String> {
        let mut g = PowerGraph::new();
        g.add_host(Some(3), 2.0)?;
        g.add_edge((0, 1), LinkAttr::new(1.0, 1.0, 1.0))?;
        g.add_edge((1, 2), LinkAttr::new(1.0, 1.0, 1.0))?;
        let mut state = Activation::new(&g);
        state.activate_node(2);

        let mut draft = RouteDraft::new(0);
        let l01 = g.get_link(0, 1).unwrap().clone();
        let l12 = g.get_link(1, 2).unwrap().clone();
        draft.push(&g, &state, &l01);
        draft.push(&g, &state, &l12);
        assert_eq!(1, draft.nodes[1]);
        assert!(draft.contains_node(0));
        assert_eq!(2, draft.current());
        // 節點 1 與兩條邊要開，節點 2 已經開著
        assert_eq!(4.0, draft.get_power());

        let route = draft.finish();
        assert_eq!(&[0, 1, 2], route.get_nodes());
        assert_eq!((0, 2), (route.src(), route.dst()));
        assert_eq!(4.0, route.get_power());
        assert_eq!(route, Route { nodes: vec![0, 1, 2], power: 99.0 });
        Ok(())
    }
}
