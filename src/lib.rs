use serde::{Deserialize, Serialize};
use std::fs;

pub mod component;
pub mod config;
pub mod graph_util;
pub mod network_struct;
pub mod recorder;
pub mod routing_algos;
pub mod tabu;
pub mod util;

use component::{check_demands, Demand, Placement};
use graph_util::{Graph, LinkAttr, PowerGraph};

fn read_json<T: serde::de::DeserializeOwned>(file_name: &str) -> Result<T, String> {
    let txt = fs::read_to_string(file_name).map_err(|_| format!("找不到檔案: {}", file_name))?;
    serde_json::from_str(&txt).map_err(|e| format!("無法解析檔案: {}: {}", file_name, e))
}

pub fn read_topo_from_file(file_name: &str) -> Result<PowerGraph, String> {
    let json: GraphJSON = read_json(file_name)?;
    let mut g = PowerGraph::new();
    for node in json.nodes.iter() {
        if node.is_switch {
            g.add_switch(None, node.power)?;
        } else {
            g.add_host(None, node.power)?;
        }
    }
    for &(n1, n2, delay, bandwidth, power) in json.edges.iter() {
        let attr = LinkAttr::new(delay, bandwidth, power);
        if json.directed {
            g.add_arc((n1, n2), attr)?;
        } else {
            g.add_edge((n1, n2), attr)?;
        }
    }
    Ok(g)
}

/// 讀入初始配置與需求
pub fn read_demands_from_file(file_name: &str) -> Result<(Placement, Vec<Demand>), String> {
    let json: DemandsJSON = read_json(file_name)?;
    let placement = Placement::from(json.placement);
    let demands: Vec<Demand> = json
        .demands
        .into_iter()
        .map(|(from, to, max_delay, min_bandwidth)| Demand::new(from, to, max_delay, min_bandwidth))
        .collect();
    check_demands(&demands, placement.get_component_cnt())?;
    Ok((placement, demands))
}

#[derive(Serialize, Deserialize)]
struct RawNode {
    power: f64,
    is_switch: bool,
}

#[derive(Serialize, Deserialize)]
struct GraphJSON {
    nodes: Vec<RawNode>,
    edges: Vec<(usize, usize, f64, f64, f64)>,
    #[serde(default)]
    directed: bool,
}

#[derive(Serialize, Deserialize)]
struct DemandsJSON {
    placement: Vec<usize>,
    demands: Vec<(usize, usize, f64, f64)>,
}
