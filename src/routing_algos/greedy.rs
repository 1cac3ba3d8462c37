use std::cmp::Ordering;

use super::{Route, RouteDraft};
use crate::graph_util::{Activation, Link, PowerGraph};

/// 比較兩個候選邊，回傳 `Less` 代表 x 較好。
///
/// 直接通往終點的邊優先，不論成本；否則邊際功耗低者優先。
fn compare_links(goal: usize, x: (&Link, f64), y: (&Link, f64)) -> Ordering {
    if x.0.to != y.0.to {
        if x.0.to == goal {
            return Ordering::Less;
        }
        if y.0.to == goal {
            return Ordering::Greater;
        }
    }
    x.1.partial_cmp(&y.1).unwrap_or(Ordering::Equal)
}

/// 貪婪的逐步找路：每一步只看眼前邊際功耗最低的邊，不保證全域最佳。
///
/// 不走回已經走過的節點，因此必定會停下來。
pub fn find_path(
    g: &PowerGraph,
    state: &Activation,
    src: usize,
    dst: usize,
    max_delay: f64,
    min_bandwidth: f64,
) -> Option<Route> {
    let mut draft = RouteDraft::new(src);
    while draft.current() != dst {
        let cur = draft.current();
        let next = g
            .neighbors(cur)
            .iter()
            .filter(|link| {
                state.fits(link, max_delay, min_bandwidth) && !draft.contains_node(link.to)
            })
            .map(|link| (link, draft.power_up(g, state, link)))
            .min_by(|&x, &y| compare_links(dst, x, y));
        match next {
            Some((link, _)) => draft.push(g, state, link),
            None => return None,
        }
    }
    Some(draft.finish())
}
