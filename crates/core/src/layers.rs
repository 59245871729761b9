//! Collision layers used to filter ray and overlap queries.

use bitflags::bitflags;

use crate::ConfigError;

bitflags! {
    /// Set of collision layers an object sits on or a query accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayerMask: u32 {
        /// Ordinary scenery.
        const DEFAULT = 1 << 0;
        /// Objects the reticle can target.
        const INTERACTION = 1 << 1;
        /// Surfaces that accept placed objects.
        const PLACEMENT = 1 << 2;
        /// Walkable ground.
        const GROUND = 1 << 3;
        /// The player body itself.
        const PLAYER = 1 << 4;
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::DEFAULT
    }
}

impl LayerMask {
    /// Resolve a single layer by name (`"Interaction"`, `"Placement"`, ...).
    pub fn from_layer_name(name: &str) -> Result<Self, ConfigError> {
        Ok(match name {
            "Default" => LayerMask::DEFAULT,
            "Interaction" => LayerMask::INTERACTION,
            "Placement" => LayerMask::PLACEMENT,
            "Ground" => LayerMask::GROUND,
            "Player" => LayerMask::PLAYER,
            "Everything" => LayerMask::all(),
            _ => return Err(ConfigError::UnknownLayer(name.to_string())),
        })
    }

    /// Union of the named layers. Stops at the first unknown name.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        names.iter().try_fold(LayerMask::empty(), |mask, name| {
            Ok(mask | LayerMask::from_layer_name(name.as_ref())?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NAMES: [&str; 5] = ["Default", "Interaction", "Placement", "Ground", "Player"];

    #[test]
    fn single_names_map_to_one_flag() {
        assert_eq!(LayerMask::from_layer_name("Interaction"), Ok(LayerMask::INTERACTION));
        assert_eq!(LayerMask::from_layer_name("Everything"), Ok(LayerMask::all()));
        assert_eq!(
            LayerMask::from_layer_name("interaction"),
            Err(ConfigError::UnknownLayer("interaction".into()))
        );
    }

    #[test]
    fn names_resolve_to_flags() {
        let mask = LayerMask::from_names(&["Placement", "Ground"]).unwrap();
        assert!(mask.contains(LayerMask::PLACEMENT));
        assert!(mask.contains(LayerMask::GROUND));
        assert!(!mask.contains(LayerMask::INTERACTION));
    }

    #[test]
    fn unknown_layer_is_reported() {
        let err = LayerMask::from_names(&["Interaction", "Lava"]).unwrap_err();
        assert_eq!(err, ConfigError::UnknownLayer("Lava".into()));
    }

    proptest! {
        #[test]
        fn names_union_matches_single_lookups(
            picks in prop::collection::vec(0usize..NAMES.len(), 0..8)
        ) {
            let names: Vec<&str> = picks.iter().map(|&i| NAMES[i]).collect();
            let expected = names.iter().fold(LayerMask::empty(), |mask, name| {
                mask | LayerMask::from_layer_name(name).unwrap()
            });
            prop_assert_eq!(LayerMask::from_names(names.as_slice()).unwrap(), expected);
        }
    }
}
