use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Route, RouteDraft};
use crate::graph_util::{Activation, Graph, Link, PowerGraph};
use crate::util::aco::{
    evaporate, reinforce, select_by_weight, transition_weight, visibility_floor, ACOParams,
    Pheromone,
};

/// 功耗較低者為佳，同分時保留先找到的
fn better(a: Option<Route>, b: Option<Route>) -> Option<Route> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if b.get_power() < a.get_power() {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, None) => a,
        (None, b) => b,
    }
}

/// 以蟻群演算法找路。費洛蒙在整個最佳化過程中只初始化一次，跨越多次找路持續累積。
pub struct AntColony {
    params: ACOParams,
    pheromone: Pheromone,
    /// 每個節點的初始費洛蒙：1 / 出度
    init_tau: Vec<f64>,
    rng: StdRng,
}

impl AntColony {
    pub fn new(g: &PowerGraph, params: ACOParams, seed: u64) -> Self {
        let mut pheromone = Pheromone::new();
        let mut init_tau = vec![0.0; g.get_node_cnt()];
        for id in 0..g.get_node_cnt() {
            if g.out_degree(id) == 0 {
                continue;
            }
            let tau = 1.0 / g.out_degree(id) as f64;
            init_tau[id] = tau;
            for link in g.neighbors(id).iter() {
                pheromone.insert(id, link.to, tau);
            }
        }
        AntColony {
            params,
            pheromone,
            init_tau,
            rng: StdRng::seed_from_u64(seed),
        }
    }
    pub fn get_pheromone(&self) -> &Pheromone {
        &self.pheromone
    }
    /// 計算權重用的費洛蒙，已限制在上下限之間；表中存的值不受影響
    fn tau(&self, from: usize, to: usize) -> f64 {
        let init = self.init_tau.get(from).copied().unwrap_or(0.0);
        self.params.bound(self.pheromone.get_or(from, to, init))
    }
    /// 從 `cur` 出發，每個候選邊的轉移權重。零成本的邊以候選中的成本下限計算。
    pub fn transition_weights(
        &self,
        g: &PowerGraph,
        state: &Activation,
        draft: &RouteDraft,
        candidates: &[&Link],
    ) -> Vec<f64> {
        let cur = draft.current();
        let costs: Vec<f64> = candidates
            .iter()
            .map(|link| draft.power_up(g, state, link))
            .collect();
        let floor = visibility_floor(&costs);
        candidates
            .iter()
            .zip(costs.iter())
            .map(|(link, &cost)| {
                transition_weight(
                    self.tau(cur, link.to),
                    cost.max(floor),
                    self.params.alpha,
                    self.params.beta,
                )
            })
            .collect()
    }
    pub fn find_path(
        &mut self,
        g: &PowerGraph,
        state: &Activation,
        src: usize,
        dst: usize,
        max_delay: f64,
        min_bandwidth: f64,
    ) -> Option<Route> {
        let mut best = None;
        for _ in 0..self.params.iterations {
            let round_best = self.do_single_round(g, state, src, dst, max_delay, min_bandwidth);
            best = better(best, round_best);
        }
        if let Some(route) = &best {
            debug!(
                "蟻群找路 {} -> {}：{:?}，功耗 {}",
                src,
                dst,
                route.get_nodes(),
                route.get_power()
            );
        } else {
            debug!("蟻群找路 {} -> {}：無可行路徑", src, dst);
        }
        best
    }
    /// 派出一輪螞蟻，先蒸發，再由本輪最佳的螞蟻留下費洛蒙
    fn do_single_round(
        &mut self,
        g: &PowerGraph,
        state: &Activation,
        src: usize,
        dst: usize,
        max_delay: f64,
        min_bandwidth: f64,
    ) -> Option<Route> {
        let mut round_best = None;
        for _ in 0..self.params.num_ants {
            let route = self.ant(g, state, src, dst, max_delay, min_bandwidth);
            round_best = better(round_best, route);
        }
        evaporate(&mut self.pheromone, self.params.rho);
        if let Some(route) = &round_best {
            let delta = self.params.deposit(route.get_power());
            let init_tau = &self.init_tau;
            reinforce(&mut self.pheromone, route.get_nodes(), delta, |id| {
                init_tau.get(id).copied().unwrap_or(0.0)
            });
        }
        round_best
    }
    /// 一隻螞蟻的路徑。不走回頭路；卡住就失敗。
    fn ant(
        &mut self,
        g: &PowerGraph,
        state: &Activation,
        src: usize,
        dst: usize,
        max_delay: f64,
        min_bandwidth: f64,
    ) -> Option<Route> {
        let mut draft = RouteDraft::new(src);
        while draft.current() != dst {
            let candidates: Vec<&Link> = g
                .neighbors(draft.current())
                .iter()
                .filter(|link| {
                    state.fits(link, max_delay, min_bandwidth) && !draft.contains_node(link.to)
                })
                .collect();
            let weights = self.transition_weights(g, state, &draft, &candidates);
            let draw = self.rng.gen::<f64>();
            let i = select_by_weight(&weights, draw)?;
            draft.push(g, state, candidates[i]);
        }
        Some(draft.finish())
    }
}
