//! Tunable search parameters, configured through a builder so callers
//! can retune without reaching into the engine's internals.
use derive_builder::Builder;

#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct SearchConfig {
    #[builder(default = "6.0")]
    pub time_limit_secs: f64,
    #[builder(default = "3000")]
    pub max_simulations: u32,
    #[builder(default = "40")]
    pub max_tree_depth: usize,
    #[builder(default = "80")]
    pub max_playout_depth: u32,
    #[builder(default = "1.4")]
    pub exploration_constant: f64,
    #[builder(default = "0.3")]
    pub rl_weight: f64,
    #[builder(default = "None")]
    pub rng_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfigBuilder::default()
            .build()
            .expect("every field has a default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = SearchConfig::default();
        assert_eq!(config.time_limit_secs, 6.0);
        assert_eq!(config.max_simulations, 3000);
        assert_eq!(config.max_tree_depth, 40);
        assert_eq!(config.max_playout_depth, 80);
        assert_eq!(config.exploration_constant, 1.4);
        assert_eq!(config.rl_weight, 0.3);
        assert_eq!(config.rng_seed, None);
    }
}
