//! Ground, clouds, grass and rocks.

use rand::Rng;

use super::{Clouds, GrassField, Ground, Rocks, SceneConfig};
use crate::assets::{AssetCache, AssetLoader};
use crate::noise_field::NoiseField;

#[derive(Debug)]
pub struct Environment {
    pub ground: Ground,
    pub clouds: Clouds,
    pub grass: GrassField,
    pub rocks: Rocks,
}

impl Environment {
    pub async fn build<L, N, R>(config: &SceneConfig, cache: &mut AssetCache<L>, noise: &N, rng: &mut R) -> Self
    where
        L: AssetLoader,
        N: NoiseField + ?Sized,
        R: Rng + ?Sized,
    {
        let ground = Ground::build(config.ground.clone(), cache).await;
        let clouds = Clouds::new(config.clouds.clone());
        let grass = GrassField::build(config.grass.clone(), cache, noise, rng).await;
        let rocks = Rocks::build(&config.rocks, cache, noise, rng).await;
        Self { ground, clouds, grass, rocks }
    }

    /// Forward scene time to the animated parts.
    pub fn update(&self, elapsed: f32) {
        self.clouds.update(elapsed);
        self.grass.update(elapsed);
    }
}
