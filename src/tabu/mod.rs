use log::{debug, info};

mod memory;
pub use memory::TabuMemory;

mod evaluator;
pub use evaluator::{Evaluator, PowerEvaluator};

mod routing_problem;
pub use routing_problem::{RoutingProblem, RoutingSolution, Solution};

/// 禁忌搜尋所需要的問題介面
pub trait TabuProblem<S> {
    fn initial(&self) -> S;
    /// `a` 是否嚴格優於 `b`
    fn is_better(&self, a: &S, b: &S) -> bool;
    /// 目前解的鄰居，已經濾掉禁忌表中的解
    fn neighborhood(&mut self, current: &S) -> Result<Vec<S>, String>;
    fn stop(&self, best: &S) -> bool;
    fn update(&mut self, current: &S, best: &S);
}

/// 每一輪都移動到最好的鄰居，即使它比目前的解差；記下看過最好的解。
///
/// 沒有鄰居可走時提早結束。
pub fn search<S: Clone, P: TabuProblem<S>>(problem: &mut P) -> Result<S, String> {
    let mut current = problem.initial();
    let mut best = current.clone();
    let mut round = 0;
    while !problem.stop(&best) {
        let neighborhood = problem.neighborhood(&current)?;
        let mut next: Option<S> = None;
        for s in neighborhood.into_iter() {
            next = match next {
                Some(n) if !problem.is_better(&s, &n) => Some(n),
                _ => Some(s),
            };
        }
        current = match next {
            Some(s) => s,
            None => {
                info!("第 {} 輪沒有可走的鄰居，提早結束", round);
                break;
            }
        };
        if problem.is_better(&current, &best) {
            debug!("第 {} 輪找到更好的解", round);
            best = current.clone();
        }
        problem.update(&current, &best);
        round += 1;
    }
    info!("禁忌搜尋結束，共 {} 輪", round);
    Ok(best)
}
