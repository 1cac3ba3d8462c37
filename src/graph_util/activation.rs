use super::{Link, PowerGraph};
use crate::network_struct::Graph;

/// 記錄哪些節點與邊已經開啟（耗電中），以及每條邊剩下的頻寬。
///
/// 這是一個普通的值：繞路時傳入一份複本，成功才把複本交回去，失敗就直接丟掉。
#[derive(Clone, Debug, PartialEq)]
pub struct Activation {
    nodes: Vec<bool>,
    links: Vec<bool>,
    /// 以邊 ID 為索引
    bandwidth: Vec<f64>,
}

impl Activation {
    /// 全部關閉、頻寬全滿的狀態
    pub fn new(g: &PowerGraph) -> Self {
        Activation {
            nodes: vec![false; g.get_node_cnt()],
            links: vec![false; g.get_edge_cnt()],
            bandwidth: (0..g.get_edge_cnt()).map(|id| g.link_bandwidth(id)).collect(),
        }
    }
    pub fn remaining_bandwidth(&self, link_id: usize) -> f64 {
        self.bandwidth.get(link_id).copied().unwrap_or(0.0)
    }
    /// 延遲符合，且剩下的頻寬還容得下 `min_bandwidth`
    pub fn fits(&self, link: &Link, max_delay: f64, min_bandwidth: f64) -> bool {
        link.satisfies(max_delay, min_bandwidth)
            && min_bandwidth <= self.remaining_bandwidth(link.id)
    }
    /// 在路徑的每條邊上保留 `bandwidth`。任何一條邊不夠就不做任何保留。
    pub fn reserve_route(
        &mut self,
        g: &PowerGraph,
        route: &[usize],
        bandwidth: f64,
    ) -> Result<(), String> {
        let mut link_ids = Vec::with_capacity(route.len());
        for pair in route.windows(2) {
            let link = g
                .get_link(pair[0], pair[1])
                .ok_or_else(|| format!("{} {} 之間沒有連線", pair[0], pair[1]))?;
            if self.remaining_bandwidth(link.id) < bandwidth {
                return Err(format!(
                    "{} {} 之間剩下的頻寬 {} 不足 {}",
                    pair[0],
                    pair[1],
                    self.remaining_bandwidth(link.id),
                    bandwidth
                ));
            }
            link_ids.push(link.id);
        }
        for id in link_ids.into_iter() {
            self.bandwidth[id] -= bandwidth;
        }
        Ok(())
    }
    pub fn is_node_used(&self, id: usize) -> bool {
        self.nodes.get(id).copied().unwrap_or(false)
    }
    pub fn is_link_used(&self, link_id: usize) -> bool {
        self.links.get(link_id).copied().unwrap_or(false)
    }
    pub fn activate_node(&mut self, id: usize) {
        if let Some(used) = self.nodes.get_mut(id) {
            *used = true;
        }
    }
    pub fn activate_link(&mut self, link_id: usize) {
        if let Some(used) = self.links.get_mut(link_id) {
            *used = true;
        }
    }
    /// 開啟一條路徑上所有的節點與邊（重複開啟沒有副作用）
    pub fn activate_route(&mut self, g: &PowerGraph, route: &[usize]) -> Result<(), String> {
        for &id in route.iter() {
            g.check_node(id)?;
        }
        for pair in route.windows(2) {
            let link = g
                .get_link(pair[0], pair[1])
                .ok_or_else(|| format!("{} {} 之間沒有連線", pair[0], pair[1]))?;
            self.activate_link(link.id);
        }
        for &id in route.iter() {
            self.activate_node(id);
        }
        Ok(())
    }
    pub fn used_node_cnt(&self) -> usize {
        self.nodes.iter().filter(|&&used| used).count()
    }
    pub fn used_link_cnt(&self) -> usize {
        self.links.iter().filter(|&&used| used).count()
    }
    /// 所有開啟中的節點與邊的總功耗
    pub fn power(&self, g: &PowerGraph) -> f64 {
        let node_power: f64 = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, used)| **used)
            .map(|(id, _)| g.node_power(id))
            .sum();
        let link_power: f64 = self
            .links
            .iter()
            .enumerate()
            .filter(|(_, used)| **used)
            .map(|(id, _)| g.link_power(id))
            .sum();
        node_power + link_power
    }
}
