// Target (cushion) generation and circular layout.

use std::f32::consts::TAU;

use crate::config::SamplingPolicy;
use crate::data::{VARIANTS, Variant};
use crate::rng::RandomSource;

/// A clickable cushion, live for exactly one round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Target {
    pub variant: &'static Variant,
    /// `[x, y, z]`; targets sit on the ground plane so `y` is always 0.
    pub position: [f32; 3],
    /// Euler angles; only the yaw is used and it faces outward.
    pub rotation: [f32; 3],
    pub activated: bool,
}

/// Target count for the round after `rounds_survived` completed rounds.
pub fn target_count(base: usize, rounds_survived: u32, capacity: usize) -> usize {
    (base + rounds_survived as usize / 2).min(capacity)
}

/// Builds `count` fresh targets evenly spaced on a circle of `radius`.
pub fn generate_targets(
    count: usize,
    radius: f32,
    policy: SamplingPolicy,
    rng: &mut dyn RandomSource,
) -> Vec<Target> {
    let variants = pick_variants(count, policy, rng);
    variants
        .into_iter()
        .enumerate()
        .map(|(i, variant)| {
            let angle = TAU * i as f32 / count as f32;
            Target {
                variant,
                position: [angle.cos() * radius, 0.0, angle.sin() * radius],
                rotation: [0.0, angle, 0.0],
                activated: false,
            }
        })
        .collect()
}

fn pick_variants(count: usize, policy: SamplingPolicy, rng: &mut dyn RandomSource) -> Vec<&'static Variant> {
    match policy {
        SamplingPolicy::Independent => (0..count).map(|_| &VARIANTS[rng.next_index(VARIANTS.len())]).collect(),
        SamplingPolicy::WithoutReplacement => {
            let mut out = Vec::with_capacity(count);
            let mut bag: Vec<&'static Variant> = Vec::new();
            while out.len() < count {
                if bag.is_empty() {
                    bag = VARIANTS.iter().collect();
                }
                // Partial Fisher-Yates: move a random remaining entry out of the bag.
                let idx = rng.next_index(bag.len());
                out.push(bag.swap_remove(idx));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    #[test]
    fn count_grows_every_two_rounds_and_caps() {
        let counts: Vec<usize> = (0..12).map(|r| target_count(3, r, 7)).collect();
        assert_eq!(counts, vec![3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 7, 7]);
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(target_count(3, 100, 5), 5);
    }

    #[test]
    fn layout_is_even_around_circle() {
        let mut rng = ScriptedRandom::new(vec![0]);
        let targets = generate_targets(4, 3.0, SamplingPolicy::Independent, &mut rng);
        assert_eq!(targets.len(), 4);
        assert_relative_eq!(targets[0].position[0], 3.0);
        assert_relative_eq!(targets[0].position[2], 0.0);
        assert_relative_eq!(targets[1].position[0], 0.0, epsilon = 1e-5);
        assert_relative_eq!(targets[1].position[2], 3.0, epsilon = 1e-5);
        assert_relative_eq!(targets[2].position[0], -3.0, epsilon = 1e-5);
        assert_relative_eq!(targets[3].rotation[1], 3.0 * TAU / 4.0);
        assert!(targets.iter().all(|t| !t.activated && t.position[1] == 0.0));
    }

    #[test]
    fn scripted_rng_picks_exact_variants() {
        let mut rng = ScriptedRandom::new(vec![2, 5, 2]);
        let ids: Vec<u32> = generate_targets(3, 3.0, SamplingPolicy::Independent, &mut rng)
            .iter()
            .map(|t| t.variant.id)
            .collect();
        assert_eq!(ids, vec![2, 5, 2]);
    }

    #[test]
    fn without_replacement_has_no_duplicates_up_to_table_size() {
        let mut rng = ScriptedRandom::new(vec![0]);
        let targets = generate_targets(VARIANTS.len(), 3.0, SamplingPolicy::WithoutReplacement, &mut rng);
        let ids: HashSet<u32> = targets.iter().map(|t| t.variant.id).collect();
        assert_eq!(ids.len(), VARIANTS.len());

        // Past the table size the bag refills.
        let more = generate_targets(VARIANTS.len() + 2, 3.0, SamplingPolicy::WithoutReplacement, &mut rng);
        assert_eq!(more.len(), VARIANTS.len() + 2);
    }
}
