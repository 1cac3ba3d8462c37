mod power_graph;
pub use power_graph::{Link, PowerGraph};

mod activation;
pub use activation::Activation;

pub use crate::network_struct::{Graph, LinkAttr};
