//! Rendering-camera ownership.
//!
//! At most one projectile renders through a script camera at a time. The
//! slot changes hands only through [`CameraManager::hand_off`] and is
//! given back through [`CameraManager::release`].

use std::collections::BTreeMap;

use tracing::{debug, info};

use missileworks_core::enums::CameraMode;
use missileworks_core::types::{CameraHandle, ProjectileId};
use missileworks_core::world::WorldServices;

/// Current holder of the rendering slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveCamera {
    pub owner: ProjectileId,
    pub camera: CameraHandle,
    pub mode: CameraMode,
}

/// Owns the rendering slot and remembers which cameras each projectile created.
#[derive(Debug, Default)]
pub struct CameraManager {
    active: Option<ActiveCamera>,
    owned: BTreeMap<ProjectileId, Vec<CameraHandle>>,
}

impl CameraManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ActiveCamera> {
        self.active
    }

    /// Mode of `owner`'s camera if it currently holds the slot.
    pub fn mode_of(&self, owner: ProjectileId) -> Option<CameraMode> {
        self.active
            .filter(|a| a.owner == owner)
            .map(|a| a.mode)
    }

    /// Cameras created by `owner` that have not been released yet.
    pub fn cameras_of(&self, owner: ProjectileId) -> &[CameraHandle] {
        self.owned.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Give the slot to `owner`, rendering through `camera`.
    ///
    /// Any previous holder loses the slot; its cameras stay alive until it
    /// releases them.
    pub fn hand_off(
        &mut self,
        owner: ProjectileId,
        camera: CameraHandle,
        mode: CameraMode,
        world: &mut dyn WorldServices,
    ) {
        let owned = self.owned.entry(owner).or_default();
        if !owned.contains(&camera) {
            owned.push(camera);
        }

        let next = ActiveCamera {
            owner,
            camera,
            mode,
        };
        if let Some(prev) = self.active.replace(next) {
            if prev.owner != owner {
                info!(projectile = %owner, previous = %prev.owner, "camera slot overridden");
            }
        }
        world.set_rendering_camera(Some(camera));
        debug!(projectile = %owner, ?mode, "camera handed off");
    }

    /// Destroy one of `owner`'s cameras that no longer renders.
    pub fn retire(&mut self, owner: ProjectileId, camera: CameraHandle, world: &mut dyn WorldServices) {
        if self.active.is_some_and(|a| a.camera == camera) {
            return;
        }
        if let Some(owned) = self.owned.get_mut(&owner) {
            owned.retain(|c| *c != camera);
        }
        if let Err(err) = world.destroy_camera(camera) {
            debug!(projectile = %owner, %err, "camera already gone");
        }
    }

    /// Drop everything `owner` holds. Safe to call repeatedly.
    ///
    /// A holder gives the default camera back. When no projectile keeps a
    /// camera afterwards, every script camera is destroyed.
    pub fn release(&mut self, owner: ProjectileId, world: &mut dyn WorldServices) {
        let owned = self.owned.remove(&owner).unwrap_or_default();

        if self.active.is_some_and(|a| a.owner == owner) {
            self.active = None;
            world.set_rendering_camera(None);
            debug!(projectile = %owner, "default camera restored");
        }

        if self.active.is_none() && self.owned.is_empty() {
            world.destroy_all_script_cameras();
            return;
        }
        for camera in owned {
            if let Err(err) = world.destroy_camera(camera) {
                debug!(projectile = %owner, %err, "camera already gone");
            }
        }
    }
}
