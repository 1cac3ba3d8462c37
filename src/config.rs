use serde::{Deserialize, Serialize};
use std::fs;

use crate::util::aco::ACOParams;

pub const MAX_ITERATIONS: usize = 1234;
pub const SEED: u64 = 420;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 蟻群找路的參數
    pub aco: ACOParams,
    /// 禁忌搜尋最多執行的輪數
    pub max_iterations: usize,
    /// 蟻群的亂數種子
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            aco: ACOParams::default(),
            max_iterations: MAX_ITERATIONS,
            seed: SEED,
        }
    }
}

impl Config {
    /// 讀取 config.json，找不到就讀 config.example.json
    pub fn load() -> Result<Self, String> {
        match fs::read_to_string("config.json") {
            Ok(txt) => Config::from_json(&txt),
            Err(_) => Config::load_from("config.example.json"),
        }
    }
    pub fn load_from(file_name: &str) -> Result<Self, String> {
        let txt =
            fs::read_to_string(file_name).map_err(|_| format!("找不到設定檔: {}", file_name))?;
        Config::from_json(&txt)
    }
    pub fn from_json(txt: &str) -> Result<Self, String> {
        let config: Config =
            serde_json::from_str(txt).map_err(|e| format!("無法解析設定檔: {}", e))?;
        config.aco.check()?;
        Ok(config)
    }
}
