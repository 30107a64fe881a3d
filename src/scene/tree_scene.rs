//! The whole scene: environment, forest and central tree.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::{CentralTree, Environment, Forest, ForestTree, SceneConfig};
use crate::assets::{AssetCache, AssetLoader};
use crate::core::Result;
use crate::material::SceneMaterial;
use crate::noise_field::NoiseField;
use crate::scatter::PlacementInstance;

/// Counts for logging and the driver's summary line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SceneStats {
    pub grass_written: usize,
    pub grass_visible: usize,
    pub flowers: usize,
    pub rocks: usize,
    pub trees: usize,
    pub shaded_materials: usize,
    pub ground_ready: bool,
}

/// Every generated placement, grouped by what was placed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PlacementDump {
    pub grass: Vec<PlacementInstance>,
    pub flowers: BTreeMap<String, Vec<PlacementInstance>>,
    pub rocks: BTreeMap<String, Vec<PlacementInstance>>,
    pub forest: Vec<ForestTree>,
}

impl PlacementDump {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}

pub struct TreeScene {
    config: SceneConfig,
    noise: Box<dyn NoiseField>,
    pub environment: Environment,
    pub forest: Forest,
    pub central_tree: CentralTree,
}

impl TreeScene {
    /// Build every group, awaiting assets through one shared cache.
    pub async fn build<L: AssetLoader>(config: SceneConfig, loader: L) -> Result<Self> {
        config.validate()?;
        let noise = config.noise.build();
        let mut rng = config.rng();
        let mut cache = AssetCache::new(loader);

        let environment = Environment::build(&config, &mut cache, noise.as_ref(), &mut rng).await;
        let forest = Forest::generate(&config.forest, noise.as_ref(), &mut rng)?;
        let central_tree = CentralTree::build(config.central_tree.clone(), &mut cache).await;

        log::info!("Scene built: {} assets fetched in {} loads", cache.len(), cache.loads());

        Ok(Self {
            config,
            noise,
            environment,
            forest,
            central_tree,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn noise(&self) -> &dyn NoiseField {
        self.noise.as_ref()
    }

    /// Per-frame tick.
    pub fn update(&self, elapsed: f32) {
        self.environment.update(elapsed);
        self.central_tree.update(elapsed);
    }

    /// Every material the scene draws with a per-object program.
    pub fn scene_materials(&self) -> Vec<&SceneMaterial> {
        let grass = &self.environment.grass;
        grass
            .blades()
            .map(|b| &b.material)
            .into_iter()
            .chain(grass.flowers().map(|(_, f)| &f.material))
            .chain(self.environment.rocks.meshes().iter().map(|m| &m.material))
            .chain(self.central_tree.parts())
            .collect()
    }

    pub fn stats(&self) -> SceneStats {
        let grass = &self.environment.grass;
        SceneStats {
            grass_written: grass.blades().map_or(0, |b| b.instances.written()),
            grass_visible: grass.blades().map_or(0, |b| b.instances.active()),
            flowers: grass.flowers().map(|(_, f)| f.placements.len()).sum(),
            rocks: self.environment.rocks.total_instances(),
            trees: self.forest.len() + 1,
            shaded_materials: grass.registry().len() + self.central_tree.registry().len(),
            ground_ready: self.environment.ground.is_ready(),
        }
    }

    pub fn placements(&self) -> PlacementDump {
        let grass = &self.environment.grass;
        PlacementDump {
            grass: grass.blades().map(|b| b.placements.clone()).unwrap_or_default(),
            flowers: grass
                .flowers()
                .map(|(_, f)| (f.label.clone(), f.placements.clone()))
                .collect(),
            rocks: self
                .environment
                .rocks
                .meshes()
                .iter()
                .map(|m| (m.label.clone(), m.placements.clone()))
                .collect(),
            forest: self.forest.trees().to_vec(),
        }
    }
}
