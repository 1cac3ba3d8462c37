use std::collections::HashSet;

use super::Activation;
use crate::network_struct::{Graph, LinkAttr};

/// 鄰接表中的一個項目。雙向連線會在兩端各有一個項目，`id` 相同。
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub id: usize,
    pub to: usize,
    pub attr: LinkAttr,
}

impl Link {
    /// 延遲不超過上限、頻寬不低於需求（兩邊皆含等號）
    pub fn satisfies(&self, max_delay: f64, min_bandwidth: f64) -> bool {
        self.attr.delay <= max_delay && min_bandwidth <= self.attr.bandwidth
    }
}

#[derive(Clone, Debug)]
struct Node {
    is_switch: bool,
    power: f64,
    edges: Vec<Link>,
}

/// 實體拓撲的唯讀視圖。節點與邊的「是否使用中」不記錄在這裡，見 `Activation`。
#[derive(Clone, Debug)]
pub struct PowerGraph {
    nodes: Vec<Node>,
    /// 以邊 ID 為索引
    links: Vec<LinkAttr>,
}

fn check_non_negative(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} 必需為非負的有限值，卻得到 {}", name, value))
    }
}

impl PowerGraph {
    pub fn new() -> Self {
        PowerGraph {
            nodes: vec![],
            links: vec![],
        }
    }
    fn _add_node(
        &mut self,
        cnt: Option<usize>,
        power: f64,
        is_switch: bool,
    ) -> Result<Vec<usize>, String> {
        check_non_negative("節點功耗", power)?;
        let cnt = cnt.unwrap_or(1);
        let mut v = Vec::with_capacity(cnt);
        for _ in 0..cnt {
            let id = self.nodes.len();
            self.nodes.push(Node {
                is_switch,
                power,
                edges: vec![],
            });
            v.push(id);
        }
        Ok(v)
    }
    fn _check_exist(&self, id: usize) -> bool {
        id < self.nodes.len()
    }
    fn _check_new_link(&self, id_pair: (usize, usize), attr: &LinkAttr) -> Result<(), String> {
        if !self._check_exist(id_pair.0) || !self._check_exist(id_pair.1) {
            return Err(format!("加入邊 {:?} 時發現節點不存在", id_pair));
        }
        if id_pair.0 == id_pair.1 {
            return Err(format!("不允許自環 {:?}", id_pair));
        }
        if self.get_link(id_pair.0, id_pair.1).is_some() {
            return Err(format!("邊 {:?} 已存在", id_pair));
        }
        check_non_negative("延遲", attr.delay)?;
        check_non_negative("頻寬", attr.bandwidth)?;
        check_non_negative("連線功耗", attr.power)
    }
    fn _add_single_edge(&mut self, edge_id: usize, id_pair: (usize, usize), attr: LinkAttr) {
        self.nodes[id_pair.0].edges.push(Link {
            id: edge_id,
            to: id_pair.1,
            attr,
        });
    }
    /// 節點不存在時回傳錯誤，供繞路前檢查前置條件
    pub fn check_node(&self, id: usize) -> Result<(), String> {
        if self._check_exist(id) {
            Ok(())
        } else {
            Err(format!(
                "節點 {} 不存在（圖中只有 {} 個節點）",
                id,
                self.nodes.len()
            ))
        }
    }
    pub fn neighbors(&self, id: usize) -> &[Link] {
        match self.nodes.get(id) {
            Some(node) => &node.edges,
            None => &[],
        }
    }
    pub fn out_degree(&self, id: usize) -> usize {
        self.neighbors(id).len()
    }
    pub fn get_link(&self, from: usize, to: usize) -> Option<&Link> {
        self.neighbors(from).iter().find(|link| link.to == to)
    }
    pub fn node_power(&self, id: usize) -> f64 {
        self.nodes.get(id).map(|n| n.power).unwrap_or(0.0)
    }
    pub fn link_power(&self, link_id: usize) -> f64 {
        self.links.get(link_id).map(|attr| attr.power).unwrap_or(0.0)
    }
    /// 邊的總頻寬，雙向連線的兩個方向共用
    pub fn link_bandwidth(&self, link_id: usize) -> f64 {
        self.links.get(link_id).map(|attr| attr.bandwidth).unwrap_or(0.0)
    }
    /// 只有主機能放置元件
    pub fn is_host(&self, id: usize) -> bool {
        self.nodes.get(id).map(|n| !n.is_switch).unwrap_or(false)
    }
    /// 若選擇 `link`，功耗會上升多少。
    ///
    /// 已開啟的連線或節點不再計費；正在建構中的路徑已經走過的也不再計費，避免重複計算。
    /// * `draft_nodes` - 建構中路徑上的節點
    /// * `draft_links` - 建構中路徑上的邊 ID
    pub fn power_up(
        &self,
        link: &Link,
        state: &Activation,
        draft_nodes: &HashSet<usize>,
        draft_links: &HashSet<usize>,
    ) -> f64 {
        let mut power = 0.0;
        if !state.is_link_used(link.id) && !draft_links.contains(&link.id) {
            power += link.attr.power;
        }
        if !state.is_node_used(link.to) && !draft_nodes.contains(&link.to) {
            power += self.node_power(link.to);
        }
        power
    }
}

impl Graph<usize> for PowerGraph {
    fn add_host(&mut self, cnt: Option<usize>, power: f64) -> Result<Vec<usize>, String> {
        self._add_node(cnt, power, false)
    }
    fn add_switch(&mut self, cnt: Option<usize>, power: f64) -> Result<Vec<usize>, String> {
        self._add_node(cnt, power, true)
    }
    fn add_edge(&mut self, id_pair: (usize, usize), attr: LinkAttr) -> Result<usize, String> {
        self._check_new_link(id_pair, &attr)?;
        self._check_new_link((id_pair.1, id_pair.0), &attr)?;
        let edge_id = self.links.len();
        self._add_single_edge(edge_id, id_pair, attr);
        self._add_single_edge(edge_id, (id_pair.1, id_pair.0), attr);
        self.links.push(attr);
        Ok(edge_id)
    }
    fn add_arc(&mut self, id_pair: (usize, usize), attr: LinkAttr) -> Result<usize, String> {
        self._check_new_link(id_pair, &attr)?;
        let edge_id = self.links.len();
        self._add_single_edge(edge_id, id_pair, attr);
        self.links.push(attr);
        Ok(edge_id)
    }
    fn get_node_cnt(&self) -> usize {
        self.nodes.len()
    }
    fn get_edge_cnt(&self) -> usize {
        self.links.len()
    }
    fn foreach_node(&self, mut callback: impl FnMut(usize, bool)) {
        for (id, node) in self.nodes.iter().enumerate() {
            callback(id, node.is_switch);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn attr(delay: f64, bandwidth: f64, power: f64) -> LinkAttr {
        LinkAttr::new(delay, bandwidth, power)
    }

    #[test]
    fn test_satisfies_boundary() -> Result<(), String> {
        let mut g = PowerGraph::new();
        g.add_host(Some(2), 1.0)?;
        g.add_edge((0, 1), attr(3.0, 10.0, 1.0))?;
        let link = g.get_link(0, 1).unwrap();
        assert!(link.satisfies(3.0, 10.0));
        assert!(link.satisfies(4.0, 2.0));
        assert!(!link.satisfies(2.9, 10.0));
        assert!(!link.satisfies(3.0, 10.1));
        Ok(())
    }
    #[test]
    fn test_edge_shares_id() -> Result<(), String> {
        let mut g = PowerGraph::new();
        g.add_host(Some(2), 1.0)?;
        g.add_switch(Some(1), 2.0)?;
        let e0 = g.add_edge((0, 2), attr(1.0, 1.0, 1.0))?;
        let e1 = g.add_arc((2, 1), attr(1.0, 1.0, 5.0))?;
        assert_eq!(e0, g.get_link(2, 0).unwrap().id);
        assert_eq!(e0, g.get_link(0, 2).unwrap().id);
        assert_eq!(e1, g.get_link(2, 1).unwrap().id);
        assert!(g.get_link(1, 2).is_none());
        assert_eq!(2, g.get_edge_cnt());
        assert_eq!(5.0, g.link_power(e1));
        assert_eq!(1.0, g.link_bandwidth(e0));
        assert_eq!(0.0, g.link_bandwidth(9));
        assert_eq!(1, g.out_degree(0));
        assert_eq!(2, g.out_degree(2));
        assert!(g.is_host(0));
        assert!(!g.is_host(2));
        assert!(!g.is_host(9));
        Ok(())
    }
    #[test]
    fn test_reject_bad_input() -> Result<(), String> {
        let mut g = PowerGraph::new();
        g.add_host(Some(2), 1.0)?;
        assert!(g.add_host(None, -1.0).is_err());
        assert!(g.add_edge((0, 5), attr(1.0, 1.0, 1.0)).is_err());
        assert!(g.add_edge((0, 0), attr(1.0, 1.0, 1.0)).is_err());
        assert!(g.add_edge((0, 1), attr(std::f64::NAN, 1.0, 1.0)).is_err());
        g.add_edge((0, 1), attr(1.0, 1.0, 1.0))?;
        assert!(g.add_edge((1, 0), attr(1.0, 1.0, 1.0)).is_err());
        assert!(g.check_node(2).is_err());
        Ok(())
    }
    #[test]
    fn test_power_up_no_double_count() -> Result<(), String> {
        let mut g = PowerGraph::new();
        g.add_host(Some(3), 2.0)?;
        g.add_edge((0, 1), attr(1.0, 1.0, 3.0))?;
        g.add_edge((1, 2), attr(1.0, 1.0, 3.0))?;
        let link = g.get_link(0, 1).unwrap().clone();
        let mut state = Activation::new(&g);
        let mut nodes = HashSet::new();
        let mut links = HashSet::new();

        let cold = g.power_up(&link, &state, &nodes, &links);
        assert_eq!(5.0, cold);

        nodes.insert(1);
        let half = g.power_up(&link, &state, &nodes, &links);
        assert_eq!(3.0, half);
        links.insert(link.id);
        assert_eq!(0.0, g.power_up(&link, &state, &nodes, &links));

        // 使用中的節點越多，邊際成本只會下降
        let (nodes, links) = (HashSet::new(), HashSet::new());
        state.activate_node(1);
        let warm = g.power_up(&link, &state, &nodes, &links);
        assert!(warm <= cold);
        state.activate_link(link.id);
        let hot = g.power_up(&link, &state, &nodes, &links);
        assert!(hot <= warm);
        assert_eq!(0.0, hot);
        Ok(())
    }
}
