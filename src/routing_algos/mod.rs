use log::debug;
use rayon::prelude::*;
use std::sync::Arc;

use crate::component::{check_demands, Demand, Placement};
use crate::graph_util::{Activation, PowerGraph};
use crate::recorder::PairTable;
use crate::util::aco::ACOParams;

mod route;
pub use route::{Route, RouteDraft};

mod greedy;

mod ant_colony;
pub use ant_colony::AntColony;

/// (元件, 元件) -> 路徑
pub type RoutingTable = PairTable<usize, usize, Route>;

/// 找路策略，建構時決定
pub enum PathStrategy {
    Greedy,
    AntColony(AntColony),
}

impl PathStrategy {
    fn search(
        &mut self,
        g: &PowerGraph,
        state: &Activation,
        src: usize,
        dst: usize,
        max_delay: f64,
        min_bandwidth: f64,
    ) -> Option<Route> {
        match self {
            PathStrategy::Greedy => greedy::find_path(g, state, src, dst, max_delay, min_bandwidth),
            PathStrategy::AntColony(aco) => {
                aco.find_path(g, state, src, dst, max_delay, min_bandwidth)
            }
        }
    }
}

/// 檢查端點，找一條路，成功就把路上的節點與邊開啟，並保留 `bandwidth`
fn locate<F>(
    g: &PowerGraph,
    state: &mut Activation,
    src: usize,
    dst: usize,
    bandwidth: f64,
    search: F,
) -> Result<Option<Route>, String>
where
    F: FnOnce(&Activation, usize, usize) -> Option<Route>,
{
    g.check_node(src)?;
    g.check_node(dst)?;
    let route = if src == dst {
        Some(Route::single(src))
    } else {
        search(state, src, dst)
    };
    if let Some(route) = &route {
        state.reserve_route(g, route.get_nodes(), bandwidth)?;
        state.activate_route(g, route.get_nodes())?;
    }
    Ok(route)
}

/// 依序替每個需求找路。任何一個需求失敗，整個配置就失敗，且 `base` 不受影響。
fn route_placement<F>(
    g: &PowerGraph,
    base: &Activation,
    placement: &Placement,
    demands: &[Demand],
    mut search: F,
) -> Result<Option<(RoutingTable, Activation)>, String>
where
    F: FnMut(&Activation, usize, usize, &Demand) -> Option<Route>,
{
    placement.check(g)?;
    check_demands(demands, placement.get_component_cnt())?;
    let mut state = base.clone();
    // 放了元件的主機必定開機
    for &node in placement.nodes().iter() {
        state.activate_node(node);
    }
    let mut table = RoutingTable::new();
    for demand in demands.iter() {
        let src = placement.nodes()[demand.from];
        let dst = placement.nodes()[demand.to];
        let bandwidth = demand.min_bandwidth;
        let route = locate(g, &mut state, src, dst, bandwidth, |st, s, d| {
            search(st, s, d, demand)
        })?;
        match route {
            Some(route) => {
                table.insert(demand.from, demand.to, route);
            }
            None => {
                debug!(
                    "配置 {:?} 無法滿足需求 ({}, {})",
                    placement.nodes(),
                    demand.from,
                    demand.to
                );
                return Ok(None);
            }
        }
    }
    Ok(Some((table, state)))
}

pub struct Router {
    g: Arc<PowerGraph>,
    strategy: PathStrategy,
}

impl Router {
    pub fn new(g: Arc<PowerGraph>, strategy: PathStrategy) -> Self {
        Router { g, strategy }
    }
    pub fn greedy(g: Arc<PowerGraph>) -> Self {
        Router::new(g, PathStrategy::Greedy)
    }
    pub fn ant_colony(g: Arc<PowerGraph>, params: ACOParams, seed: u64) -> Result<Self, String> {
        params.check()?;
        let aco = AntColony::new(&g, params, seed);
        Ok(Router::new(g, PathStrategy::AntColony(aco)))
    }
    pub fn graph(&self) -> &Arc<PowerGraph> {
        &self.g
    }
    /// 找一條每條邊都滿足限制的路，成功時在 `state` 中開啟路上的節點與邊，並扣掉用掉的頻寬。
    ///
    /// 找不到路是常態，回傳 `Ok(None)`；端點不存在才是錯誤。
    pub fn find_path(
        &mut self,
        state: &mut Activation,
        src: usize,
        dst: usize,
        max_delay: f64,
        min_bandwidth: f64,
    ) -> Result<Option<Route>, String> {
        let g = &*self.g;
        let strategy = &mut self.strategy;
        locate(g, state, src, dst, min_bandwidth, |st, s, d| {
            strategy.search(g, st, s, d, max_delay, min_bandwidth)
        })
    }
    /// 替一個配置的所有需求找路，回傳繞路表以及繞完後的開關狀態。`base` 不會被修改。
    pub fn find_routing(
        &mut self,
        base: &Activation,
        placement: &Placement,
        demands: &[Demand],
    ) -> Result<Option<(RoutingTable, Activation)>, String> {
        let g = &*self.g;
        let strategy = &mut self.strategy;
        route_placement(g, base, placement, demands, |st, s, d, demand| {
            strategy.search(g, st, s, d, demand.max_delay, demand.min_bandwidth)
        })
    }
    /// 對多個配置各自從 `base` 出發找路，只回傳成功的。
    ///
    /// 貪婪法沒有內部狀態，平行處理；蟻群共用費洛蒙，只能依序處理。
    pub fn find_routings(
        &mut self,
        base: &Activation,
        placements: Vec<Placement>,
        demands: &[Demand],
    ) -> Result<Vec<(Placement, RoutingTable, Activation)>, String> {
        let g = &*self.g;
        let routed: Vec<Option<(Placement, RoutingTable, Activation)>> = match &mut self.strategy
        {
            PathStrategy::Greedy => placements
                .into_par_iter()
                .map(|p| {
                    let res = route_placement(g, base, &p, demands, |st, s, d, demand| {
                        greedy::find_path(g, st, s, d, demand.max_delay, demand.min_bandwidth)
                    })?;
                    Ok(res.map(|(table, state)| (p, table, state)))
                })
                .collect::<Result<Vec<_>, String>>()?,
            strategy => placements
                .into_iter()
                .map(|p| {
                    let res = route_placement(g, base, &p, demands, |st, s, d, demand| {
                        strategy.search(g, st, s, d, demand.max_delay, demand.min_bandwidth)
                    })?;
                    Ok(res.map(|(table, state)| (p, table, state)))
                })
                .collect::<Result<Vec<_>, String>>()?,
        };
        Ok(routed.into_iter().flatten().collect())
    }
}
