use log::debug;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use super::evaluator::Evaluator;
use super::memory::TabuMemory;
use super::TabuProblem;
use crate::component::{Demand, Placement, PlacementNeighbors};
use crate::graph_util::{Activation, PowerGraph};
use crate::routing_algos::{Router, RoutingTable};

/// 元件配置加上每個需求的路徑
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Solution {
    pub placement: Placement,
    pub routing: RoutingTable,
}

impl Solution {
    /// 這組解自己用到的節點與邊：放了元件的主機，以及所有路徑。
    ///
    /// 頻寬保持全滿，鄰居會取代這組解的繞路，而不是疊加在上面。
    pub fn footprint(&self, g: &PowerGraph) -> Result<Activation, String> {
        let mut state = Activation::new(g);
        for &node in self.placement.nodes().iter() {
            state.activate_node(node);
        }
        for route in self.routing.values() {
            state.activate_route(g, route.get_nodes())?;
        }
        Ok(state)
    }
}

/// 禁忌搜尋中的一個候選解，建好之後就不再改變
#[derive(Clone, Debug)]
pub struct RoutingSolution {
    solution: Solution,
    fitness: f64,
    activation: Activation,
}

impl RoutingSolution {
    fn new<E: Evaluator>(evaluator: &E, g: &PowerGraph, solution: Solution) -> Result<Self, String> {
        let activation = solution.footprint(g)?;
        let fitness = evaluator.fitness(&solution);
        Ok(RoutingSolution {
            solution,
            fitness,
            activation,
        })
    }
    pub fn get_solution(&self) -> &Solution {
        &self.solution
    }
    pub fn get_placement(&self) -> &Placement {
        &self.solution.placement
    }
    pub fn get_routing(&self) -> &RoutingTable {
        &self.solution.routing
    }
    pub fn get_fitness(&self) -> f64 {
        self.fitness
    }
    pub fn get_activation(&self) -> &Activation {
        &self.activation
    }
}

// 分數與開關狀態都由解本身決定
impl PartialEq for RoutingSolution {
    fn eq(&self, other: &Self) -> bool {
        self.solution == other.solution
    }
}
impl Eq for RoutingSolution {}
impl Hash for RoutingSolution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.solution.hash(state);
    }
}

/// 把「搬元件、重新繞路」包裝成禁忌搜尋的問題。
///
/// 自己持有唯一一份已提交的開關狀態，鄰居都對著它的快照繞路，只有 `update` 會換掉它。
pub struct RoutingProblem<E: Evaluator, N: PlacementNeighbors> {
    evaluator: E,
    neighbors: N,
    router: Router,
    demands: Vec<Demand>,
    initial: RoutingSolution,
    committed: Activation,
    iteration: usize,
    max_iterations: usize,
    memory: TabuMemory<RoutingSolution>,
}

impl<E: Evaluator, N: PlacementNeighbors> RoutingProblem<E, N> {
    pub fn new(
        evaluator: E,
        neighbors: N,
        mut router: Router,
        placement: Placement,
        demands: Vec<Demand>,
        max_iterations: usize,
    ) -> Result<Self, String> {
        let g = router.graph().clone();
        placement.check(&g)?;
        if !evaluator.is_valid(&placement) {
            return Err(format!("初始配置 {:?} 不合法", placement.nodes()));
        }
        let base = Activation::new(&g);
        let routing = match router.find_routing(&base, &placement, &demands)? {
            Some((routing, _)) => routing,
            None => return Err(format!("初始配置 {:?} 無法繞路", placement.nodes())),
        };
        let initial = RoutingSolution::new(&evaluator, &g, Solution { placement, routing })?;
        debug!("初始解功耗 {}", initial.get_fitness());
        Ok(RoutingProblem {
            evaluator,
            neighbors,
            router,
            demands,
            committed: initial.get_activation().clone(),
            initial,
            iteration: 0,
            max_iterations,
            memory: TabuMemory::new(),
        })
    }
    pub fn get_iteration(&self) -> usize {
        self.iteration
    }
    pub fn get_committed(&self) -> &Activation {
        &self.committed
    }
}

impl<E: Evaluator, N: PlacementNeighbors> TabuProblem<RoutingSolution> for RoutingProblem<E, N> {
    fn initial(&self) -> RoutingSolution {
        self.initial.clone()
    }
    fn is_better(&self, a: &RoutingSolution, b: &RoutingSolution) -> bool {
        self.evaluator.is_better(a.fitness, b.fitness)
    }
    fn neighborhood(&mut self, current: &RoutingSolution) -> Result<Vec<RoutingSolution>, String> {
        let placement = current.get_placement();
        let neighbors = &self.neighbors;
        let evaluator = &self.evaluator;
        let placements: BTreeSet<Placement> = (0..placement.get_component_cnt())
            .into_par_iter()
            .flat_map_iter(|component| neighbors.neighbors(placement, component))
            .filter(|p| evaluator.is_valid(p))
            .collect();
        let placement_cnt = placements.len();

        let snapshot = self.committed.clone();
        let routed =
            self.router
                .find_routings(&snapshot, placements.into_iter().collect(), &self.demands)?;
        let g = self.router.graph().clone();
        let mut candidates = Vec::with_capacity(routed.len());
        for (placement, routing, _) in routed.into_iter() {
            let solution = Solution { placement, routing };
            candidates.push(RoutingSolution::new(&self.evaluator, &g, solution)?);
        }
        let routed_cnt = candidates.len();
        let admitted = self.memory.admit(candidates);
        debug!(
            "第 {} 輪：{} 個合法配置，{} 個可繞路，{} 個不在禁忌表中",
            self.iteration,
            placement_cnt,
            routed_cnt,
            admitted.len()
        );
        Ok(admitted)
    }
    fn stop(&self, _best: &RoutingSolution) -> bool {
        self.iteration >= self.max_iterations
    }
    fn update(&mut self, current: &RoutingSolution, best: &RoutingSolution) {
        self.iteration += 1;
        self.committed = current.activation.clone();
        debug!(
            "第 {} 輪：目前功耗 {}，最佳功耗 {}",
            self.iteration, current.fitness, best.fitness
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::component::MoveNeighbors;
    use crate::graph_util::{Graph, LinkAttr};
    use crate::tabu::{search, PowerEvaluator};
    use std::sync::Arc;

    /// 主機 0（耗電 5）、主機 1、主機 2 都接到交換機 3
    fn star() -> Result<Arc<PowerGraph>, String> {
        let mut g = PowerGraph::new();
        g.add_host(Some(1), 5.0)?;
        g.add_host(Some(2), 1.0)?;
        g.add_switch(Some(1), 1.0)?;
        g.add_edge((0, 3), LinkAttr::new(1.0, 10.0, 1.0))?;
        g.add_edge((1, 3), LinkAttr::new(1.0, 10.0, 1.0))?;
        g.add_edge((2, 3), LinkAttr::new(1.0, 10.0, 1.0))?;
        Ok(Arc::new(g))
    }
    fn problem(
        g: &Arc<PowerGraph>,
        placement: Vec<usize>,
        max_iterations: usize,
    ) -> Result<RoutingProblem<PowerEvaluator, MoveNeighbors>, String> {
        RoutingProblem::new(
            PowerEvaluator::new(g.clone()),
            MoveNeighbors::new(g),
            Router::greedy(g.clone()),
            Placement::from(placement),
            vec![Demand::new(0, 1, 5.0, 5.0)],
            max_iterations,
        )
    }

    #[test]
    fn test_initial() -> Result<(), String> {
        let g = star()?;
        let p = problem(&g, vec![0, 1], 10)?;
        let init = p.initial();
        assert_eq!(9.0, init.get_fitness());
        assert_eq!(&[0, 3, 1], init.get_routing().get(0, 1).unwrap().get_nodes());
        assert_eq!(init.get_activation(), p.get_committed());
        assert_eq!(9.0, p.get_committed().power(&g));

        // 放在交換機上、元件數量不對、頻寬不夠都不行
        assert!(problem(&g, vec![0, 3], 10).is_err());
        assert!(problem(&g, vec![0], 10).is_err());
        let too_wide = RoutingProblem::new(
            PowerEvaluator::new(g.clone()),
            MoveNeighbors::new(&g),
            Router::greedy(g.clone()),
            Placement::from(vec![0, 1]),
            vec![Demand::new(0, 1, 5.0, 50.0)],
            10,
        );
        assert!(too_wide.is_err());
        Ok(())
    }
    #[test]
    fn test_neighborhood() -> Result<(), String> {
        let g = star()?;
        let mut p = problem(&g, vec![0, 1], 10)?;
        let init = p.initial();
        let nbrs = p.neighborhood(&init)?;
        let placements: Vec<Placement> = nbrs.iter().map(|s| s.get_placement().clone()).collect();
        let expected: Vec<Placement> = vec![vec![0, 0], vec![0, 2], vec![1, 1], vec![2, 1]]
            .into_iter()
            .map(Placement::from)
            .collect();
        assert_eq!(expected, placements);
        let fitness: Vec<f64> = nbrs.iter().map(|s| s.get_fitness()).collect();
        assert_eq!(vec![5.0, 9.0, 1.0, 5.0], fitness);
        // 沒有 update，已提交的狀態不變
        assert_eq!(init.get_activation(), p.get_committed());

        // 同一批鄰居還在禁忌表中
        assert!(p.neighborhood(&init)?.is_empty());
        Ok(())
    }
    #[test]
    fn test_commit() -> Result<(), String> {
        let g = star()?;
        let mut p = problem(&g, vec![0, 1], 1)?;
        let init = p.initial();
        assert!(!p.stop(&init));
        let nbrs = p.neighborhood(&init)?;
        let target = Placement::from(vec![1, 1]);
        let chosen = nbrs.iter().find(|s| *s.get_placement() == target).unwrap();
        p.update(chosen, chosen);
        assert_eq!(1, p.get_iteration());
        assert!(p.stop(chosen));
        assert_eq!(1, p.get_committed().used_node_cnt());
        assert!(p.get_committed().is_node_used(1));
        assert_eq!(0, p.get_committed().used_link_cnt());
        Ok(())
    }
    #[test]
    fn test_search() -> Result<(), String> {
        let g = star()?;
        let mut p = problem(&g, vec![0, 1], 5)?;
        let best = search(&mut p)?;
        assert_eq!(&Placement::from(vec![1, 1]), best.get_placement());
        assert_eq!(1.0, best.get_fitness());
        assert!(p.get_iteration() <= 5);
        Ok(())
    }
}
