use anyhow::Result;
use clarity_core::WidgetProfile;
use rand_chacha::ChaCha8Rng;

pub mod catalog;

/// Everything a check may depend on besides its rng.
#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub profile: WidgetProfile,
    pub verbose: bool,
}

pub type Check = fn(&ScenarioCtx, &mut ChaCha8Rng) -> Result<()>;

// One property, run once per iteration with a fresh seeded rng
#[derive(Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub check: Check,
}

impl std::fmt::Debug for TestScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestScenario")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl TestScenario {
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        check: Check,
    ) -> Self {
        Self {
            key,
            name,
            description,
            check,
        }
    }
}

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    catalog::catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog::catalog_scenarios()
        .iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

pub fn all_keys() -> Vec<&'static str> {
    catalog::catalog_scenarios()
        .iter()
        .map(|scenario| scenario.key)
        .collect()
}
