use std::path::{Path, PathBuf};

use crate::catalog::descriptor::EffectId;
use crate::foundation::error::{ChaosError, ChaosResult};

/// Overlay image consumed by [`EffectId::RainbowOverlay`].
pub const OVERLAY_RAINBOW: &str = "rainbow_overlay.png";

/// SFX clip consumed by [`EffectId::SfxBlast`].
pub const SFX_BOOP: &str = "boop.wav";

/// Read-only lookup of overlay images and SFX clips under an assets root.
///
/// Construction never touches the filesystem; a missing asset only fails the
/// step that references it, not startup.
#[derive(Clone, Debug)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Store rooted at `root` (conventionally `assets/`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of an overlay image under `overlays/`.
    pub fn overlay(&self, name: &str) -> PathBuf {
        self.root.join("overlays").join(name)
    }

    /// Path of a sound clip under `sounds/`.
    pub fn sound(&self, name: &str) -> PathBuf {
        self.root.join("sounds").join(name)
    }

    /// Require that `path` exists, attributing the failure to `effect`.
    pub fn require(&self, effect: EffectId, path: PathBuf) -> ChaosResult<PathBuf> {
        if path.is_file() {
            Ok(path)
        } else {
            Err(ChaosError::asset_missing(effect.name(), path))
        }
    }

    /// The assets root this store resolves under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
