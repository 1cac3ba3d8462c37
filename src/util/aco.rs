use serde::{Deserialize, Serialize};

use crate::recorder::PairTable;

const NUM_ANTS: usize = 4;
const ITERATIONS: usize = 100;
const ALPHA: f64 = 1.0;
const BETA: f64 = 1.0;
const RHO: f64 = 0.1;
const ZERO_POWER_DEPOSIT: f64 = 1000.0;
const MIN_PH: f64 = 0.1;
const MAX_PH: f64 = 1000.0;
/// 零成本的邊，能見度最多是候選中最便宜的付費邊的幾倍
const FREE_LINK_BONUS: f64 = 2.0;

/// 邊際成本為 0 時，以此值代替以計算能見度
pub const MIN_POWER: f64 = 1e-6;

pub enum ACOArgsF64 {
    Alpha,
    Beta,
    Rho,
    ZeroPowerDeposit,
    MinPheromone,
    MaxPheromone,
}
pub enum ACOArgsUSize {
    NumAnts,
    Iterations,
}

/// 費洛蒙表，以 (起點, 終點) 節點 ID 為鍵
pub type Pheromone = PairTable<usize, usize, f64>;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct ACOParams {
    /// 每一輪派出的螞蟻數
    pub num_ants: usize,
    /// 每次找路要跑幾輪
    pub iterations: usize,
    /// 費洛蒙的權重
    pub alpha: f64,
    /// 能見度（邊際功耗倒數）的權重
    pub beta: f64,
    /// 蒸發率
    pub rho: f64,
    /// 零功耗路徑留下的費洛蒙量
    pub zero_power_deposit: f64,
    /// 計算權重時費洛蒙的下限
    pub min_pheromone: f64,
    /// 計算權重時費洛蒙的上限
    pub max_pheromone: f64,
}

impl Default for ACOParams {
    fn default() -> Self {
        ACOParams {
            num_ants: NUM_ANTS,
            iterations: ITERATIONS,
            alpha: ALPHA,
            beta: BETA,
            rho: RHO,
            zero_power_deposit: ZERO_POWER_DEPOSIT,
            min_pheromone: MIN_PH,
            max_pheromone: MAX_PH,
        }
    }
}

impl ACOParams {
    pub fn set_args_f64(&mut self, arg_type: ACOArgsF64, arg: f64) {
        match arg_type {
            ACOArgsF64::Alpha => self.alpha = arg,
            ACOArgsF64::Beta => self.beta = arg,
            ACOArgsF64::Rho => self.rho = arg,
            ACOArgsF64::ZeroPowerDeposit => self.zero_power_deposit = arg,
            ACOArgsF64::MinPheromone => self.min_pheromone = arg,
            ACOArgsF64::MaxPheromone => self.max_pheromone = arg,
        }
    }
    pub fn set_args_usize(&mut self, arg_type: ACOArgsUSize, arg: usize) {
        match arg_type {
            ACOArgsUSize::NumAnts => self.num_ants = arg,
            ACOArgsUSize::Iterations => self.iterations = arg,
        }
    }
    pub fn check(&self) -> Result<(), String> {
        if self.num_ants == 0 || self.iterations == 0 {
            return Err(format!(
                "螞蟻數與輪數必需為正數，卻得到 {} 與 {}",
                self.num_ants, self.iterations
            ));
        }
        if !(0.0..=1.0).contains(&self.rho) {
            return Err(format!("蒸發率必需介於 0 與 1 之間，卻得到 {}", self.rho));
        }
        if !self.alpha.is_finite() || !self.beta.is_finite() {
            return Err("alpha 與 beta 必需為有限值".to_owned());
        }
        if !(self.zero_power_deposit.is_finite() && self.zero_power_deposit > 0.0) {
            return Err("零功耗的費洛蒙量必需為正數".to_owned());
        }
        if !(self.min_pheromone.is_finite() && self.min_pheromone > 0.0)
            || !(self.max_pheromone >= self.min_pheromone)
        {
            return Err(format!(
                "費洛蒙上下限不合法：[{}, {}]",
                self.min_pheromone, self.max_pheromone
            ));
        }
        Ok(())
    }
    /// 把費洛蒙限制在上下限之間，避免從沒走過的邊再也不被探索
    pub fn bound(&self, tau: f64) -> f64 {
        tau.max(self.min_pheromone).min(self.max_pheromone)
    }
    /// 一條功耗為 `power` 的路徑應留下多少費洛蒙
    pub fn deposit(&self, power: f64) -> f64 {
        if power > 0.0 {
            1.0 / power
        } else {
            self.zero_power_deposit
        }
    }
}

/// 轉移權重 = tau^alpha * (1/cost)^beta
pub fn transition_weight(tau: f64, cost: f64, alpha: f64, beta: f64) -> f64 {
    let visibility = 1.0 / cost.max(MIN_POWER);
    tau.powf(alpha) * visibility.powf(beta)
}

/// 一組候選邊的成本下限：最便宜的付費邊的一半。全部免費時回傳 1。
///
/// 零成本的邊以此代替自己的成本，權重不會壓過所有其它候選。
pub fn visibility_floor(costs: &[f64]) -> f64 {
    let cheapest = costs
        .iter()
        .copied()
        .filter(|&c| c > 0.0 && c.is_finite())
        .fold(std::f64::INFINITY, f64::min);
    if cheapest.is_finite() {
        (cheapest / FREE_LINK_BONUS).max(MIN_POWER)
    } else {
        1.0
    }
}

/// 輪盤選擇。`draw` 為 [0, 1) 的均勻亂數。
///
/// 若有權重為無限大，只在這些候選中平均挑選；若所有權重皆無效（0 或 NaN），就平均挑選。
pub fn select_by_weight(weights: &[f64], draw: f64) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let pick_uniform = |candidates: &[usize]| {
        let i = (draw * candidates.len() as f64) as usize;
        candidates[i.min(candidates.len() - 1)]
    };
    let infinite: Vec<usize> = (0..weights.len())
        .filter(|&i| weights[i] == std::f64::INFINITY)
        .collect();
    if !infinite.is_empty() {
        return Some(pick_uniform(&infinite[..]));
    }
    let valid: Vec<usize> = (0..weights.len())
        .filter(|&i| weights[i].is_finite() && weights[i] > 0.0)
        .collect();
    let sum: f64 = valid.iter().map(|&i| weights[i]).sum();
    if valid.is_empty() || !(sum > 0.0) {
        let all: Vec<usize> = (0..weights.len()).collect();
        return Some(pick_uniform(&all[..]));
    }
    let mut accumulation = 0.0;
    for &i in valid.iter() {
        accumulation += weights[i] / sum;
        if draw < accumulation {
            return Some(i);
        }
    }
    // 浮點誤差
    valid.last().copied()
}

pub fn evaporate(pheromone: &mut Pheromone, rho: f64) {
    pheromone.map(|tau| tau * (1.0 - rho));
}

/// 在路徑上每一對相鄰節點加上 `delta`。表中沒有的邊從 `init_tau(起點)` 開始累加。
pub fn reinforce(
    pheromone: &mut Pheromone,
    route: &[usize],
    delta: f64,
    init_tau: impl Fn(usize) -> f64,
) {
    for pair in route.windows(2) {
        pheromone.compute(pair[0], pair[1], init_tau(pair[0]), |tau| tau + delta);
    }
}
