//! Surrounding forest of procedurally generated trees.
//!
//! Tree geometry comes from an external generator driven by a preset and a
//! seed; this module only decides where each tree stands and what it is.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::noise_field::NoiseField;
use crate::scatter::{scatter, PlacementInstance, PlacementOptions};

/// Presets understood by the tree generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreePreset {
    AshSmall,
    AshMedium,
    AshLarge,
    AspenSmall,
    AspenMedium,
    AspenLarge,
    Bush1,
    Bush2,
    Bush3,
    OakSmall,
    OakMedium,
    OakLarge,
    PineSmall,
    PineMedium,
    PineLarge,
}

impl TreePreset {
    pub const ALL: [TreePreset; 15] = [
        Self::AshSmall,
        Self::AshMedium,
        Self::AshLarge,
        Self::AspenSmall,
        Self::AspenMedium,
        Self::AspenLarge,
        Self::Bush1,
        Self::Bush2,
        Self::Bush3,
        Self::OakSmall,
        Self::OakMedium,
        Self::OakLarge,
        Self::PineSmall,
        Self::PineMedium,
        Self::PineLarge,
    ];

    /// Name as the generator spells it.
    pub fn name(self) -> &'static str {
        match self {
            Self::AshSmall => "Ash Small",
            Self::AshMedium => "Ash Medium",
            Self::AshLarge => "Ash Large",
            Self::AspenSmall => "Aspen Small",
            Self::AspenMedium => "Aspen Medium",
            Self::AspenLarge => "Aspen Large",
            Self::Bush1 => "Bush 1",
            Self::Bush2 => "Bush 2",
            Self::Bush3 => "Bush 3",
            Self::OakSmall => "Oak Small",
            Self::OakMedium => "Oak Medium",
            Self::OakLarge => "Oak Large",
            Self::PineSmall => "Pine Small",
            Self::PineMedium => "Pine Medium",
            Self::PineLarge => "Pine Large",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Bark texture for the trunk and branches.
    pub fn bark_texture(self) -> &'static str {
        match self {
            Self::AshSmall | Self::AshMedium | Self::AshLarge => "textures/bark/birch_color.jpg",
            Self::AspenSmall | Self::AspenMedium | Self::AspenLarge => "textures/bark/willow_color.jpg",
            Self::PineSmall | Self::PineMedium | Self::PineLarge => "textures/bark/pine_color.jpg",
            _ => "textures/bark/oak_color.jpg",
        }
    }

    /// Alpha-tested leaf card texture.
    pub fn leaf_texture(self) -> &'static str {
        match self {
            Self::AshSmall | Self::AshMedium | Self::AshLarge => "textures/leaves/ash_color.png",
            Self::AspenSmall | Self::AspenMedium | Self::AspenLarge => "textures/leaves/aspen_color.png",
            Self::PineSmall | Self::PineMedium | Self::PineLarge => "textures/leaves/pine_color.png",
            _ => "textures/leaves/oak_color.png",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestOptions {
    pub tree_count: usize,
    pub radius_min: f32,
    pub radius_max: f32,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            tree_count: 50,
            radius_min: 175.0,
            radius_max: 675.0,
        }
    }
}

impl ForestOptions {
    pub fn placement(&self) -> PlacementOptions {
        PlacementOptions::annulus(self.tree_count, self.radius_min, self.radius_max)
    }
}

/// A tree to hand to the generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestTree {
    pub preset: TreePreset,
    pub seed: u32,
    pub placement: PlacementInstance,
}

#[derive(Debug, Default)]
pub struct Forest {
    trees: Vec<ForestTree>,
}

impl Forest {
    /// Place trees with a random preset and seed each. No assets involved.
    pub fn generate<N, R>(options: &ForestOptions, noise: &N, rng: &mut R) -> Result<Self>
    where
        N: NoiseField + ?Sized,
        R: Rng + ?Sized,
    {
        let trees = scatter(&options.placement(), noise, rng)?
            .into_iter()
            .map(|placement| ForestTree {
                preset: TreePreset::random(&mut *rng),
                seed: (10000.0 * rng.r#gen::<f64>()) as u32,
                placement,
            })
            .collect::<Vec<_>>();
        log::info!("Forest: {} trees", trees.len());
        Ok(Self { trees })
    }

    pub fn trees(&self) -> &[ForestTree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
