use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use serde::Serialize;
use std::sync::Arc;

use power_leaf::component::MoveNeighbors;
use power_leaf::config::Config;
use power_leaf::graph_util::Graph;
use power_leaf::routing_algos::Router;
use power_leaf::tabu::{search, PowerEvaluator, RoutingProblem, RoutingSolution};
use power_leaf::{read_demands_from_file, read_topo_from_file};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algo {
    /// 貪婪法找路
    Greedy,
    /// 蟻群找路
    Aco,
}

/// 在節能的前提下配置元件並繞路
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 找路的演算法
    #[arg(short, long, value_enum, default_value_t = Algo::Aco)]
    algo: Algo,

    /// 設定檔，預設讀取 config.json 或 config.example.json
    #[arg(short, long)]
    config: Option<String>,

    /// 以 JSON 輸出結果
    #[arg(long)]
    json: bool,

    /// 顯示過程，重複使用可以看到更多細節
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// 拓樸檔
    #[arg(default_value = "test_topo.json")]
    topo: String,

    /// 初始配置與需求檔
    #[arg(default_value = "test_demands.json")]
    demands: String,
}

#[derive(Serialize)]
struct RouteReport<'a> {
    from: usize,
    to: usize,
    nodes: &'a [usize],
    power: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    placement: &'a [usize],
    fitness: f64,
    routes: Vec<RouteReport<'a>>,
}

fn show_results(best: &RoutingSolution) {
    println!("placement = {:?}", best.get_placement().nodes());
    for (from, to, route) in best.get_routing().iter() {
        println!(
            "component {} -> {}, route = {:?}, power = {}",
            from,
            to,
            route.get_nodes(),
            route.get_power()
        );
    }
    println!("total power = {}", best.get_fitness());
}

fn show_json(best: &RoutingSolution) -> Result<(), String> {
    let report = Report {
        placement: best.get_placement().nodes(),
        fitness: best.get_fitness(),
        routes: best
            .get_routing()
            .iter()
            .map(|(from, to, route)| RouteReport {
                from,
                to,
                nodes: route.get_nodes(),
                power: route.get_power(),
            })
            .collect(),
    };
    let txt = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{}", txt);
    Ok(())
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match &cli.config {
        Some(file_name) => Config::load_from(file_name)?,
        None => Config::load()?,
    };
    let g = Arc::new(read_topo_from_file(&cli.topo)?);
    let (placement, demands) = read_demands_from_file(&cli.demands)?;
    info!(
        "{} 個節點，{} 條邊，{} 個元件，{} 個需求",
        g.get_node_cnt(),
        g.get_edge_cnt(),
        placement.get_component_cnt(),
        demands.len()
    );

    let router = match cli.algo {
        Algo::Greedy => Router::greedy(g.clone()),
        Algo::Aco => Router::ant_colony(g.clone(), config.aco, config.seed)?,
    };
    let mut problem = RoutingProblem::new(
        PowerEvaluator::new(g.clone()),
        MoveNeighbors::new(&g),
        router,
        placement,
        demands,
        config.max_iterations,
    )?;
    let best = search(&mut problem)?;

    if cli.json {
        show_json(&best)?;
    } else {
        show_results(&best);
    }
    Ok(())
}
