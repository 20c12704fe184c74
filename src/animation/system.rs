use crate::scene::Scene;

/// Animation system.
///
/// Drives updates for every `AnimationMixer` registered in a scene.
pub struct AnimationSystem;

impl AnimationSystem {
    /// Advances all animation mixers by `dt` seconds.
    ///
    /// Mixers are moved out of the scene for the duration of the update so
    /// they can write node transforms without aliasing `scene`.
    pub fn update(scene: &mut Scene, dt: f32) {
        let mut mixers = std::mem::take(&mut scene.animation_mixers);

        for (_key, mixer) in &mut mixers {
            mixer.update(dt, scene);
        }

        scene.animation_mixers = mixers;
    }
}
