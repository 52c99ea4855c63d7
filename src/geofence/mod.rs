//! Geo-fence evaluation
//!
//! A position is `Inside` when it lies within at least one fence. Points
//! exactly on an edge or vertex count as inside. Concave and self-crossing
//! outlines are supported: each lobe of a bow-tie is inside and its
//! crossing point lies on the boundary.

mod fence;

pub use fence::GeoFence;

use std::collections::HashSet;

use crate::core::config::FenceConfig;
use crate::core::error::{HerdError, Result};
use crate::core::types::GeoPoint;
use crate::herd::animal::BoundaryStatus;

/// The fixed set of fences animals are checked against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FenceSet {
    fences: Vec<GeoFence>,
}

impl FenceSet {
    /// Build a set, rejecting duplicate fence ids
    pub fn new(fences: Vec<GeoFence>) -> Result<Self> {
        let mut seen = HashSet::new();
        for fence in &fences {
            if !seen.insert(fence.id.as_str()) {
                return Err(HerdError::invalid(format!("duplicate fence id '{}'", fence.id)));
            }
        }
        Ok(Self { fences })
    }

    /// Fences from config, or the built-in farm layout when none are given
    pub fn from_config(fences: Option<&[FenceConfig]>) -> Result<Self> {
        match fences {
            Some(configs) => Self::new(
                configs
                    .iter()
                    .map(GeoFence::from_config)
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => Ok(Self::default_farm()),
        }
    }

    /// Main Pasture with North Field above it and South Pen below
    pub fn default_farm() -> Self {
        Self {
            fences: default_fences(),
        }
    }

    pub fn fences(&self) -> &[GeoFence] {
        &self.fences
    }

    pub fn len(&self) -> usize {
        self.fences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }

    /// First fence containing `point`, in declaration order
    pub fn locate(&self, point: GeoPoint) -> Option<&GeoFence> {
        self.fences.iter().find(|f| f.contains(point))
    }
}

/// Classify a point against every fence; an empty set classifies everything outside
pub fn classify(point: GeoPoint, fences: &FenceSet) -> BoundaryStatus {
    if fences.locate(point).is_some() {
        BoundaryStatus::Inside
    } else {
        BoundaryStatus::Outside
    }
}

/// The dashboard's farm: three adjacent paddocks around the default center
pub fn default_fences() -> Vec<GeoFence> {
    vec![
        GeoFence::rectangle("main-pasture", "Main Pasture", "#10b981", 26.1208, 26.1108, 91.7036, 91.7136),
        GeoFence::rectangle("north-field", "North Field", "#3b82f6", 26.1258, 26.1208, 91.7036, 91.7136),
        GeoFence::rectangle("south-pen", "South Pen", "#f59e0b", 26.1108, 26.1058, 91.7036, 91.7136),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_farm_covers_center() {
        let fences = FenceSet::default_farm();
        assert_eq!(fences.len(), 3);
        let center = GeoPoint::new(26.1158, 91.7086);
        assert_eq!(classify(center, &fences), BoundaryStatus::Inside);
        assert_eq!(fences.locate(center).map(|f| f.id.as_str()), Some("main-pasture"));
    }

    #[test]
    fn test_shared_edge_is_inside() {
        let fences = FenceSet::default_farm();
        let on_shared_edge = GeoPoint::new(26.1208, 91.7086);
        assert_eq!(classify(on_shared_edge, &fences), BoundaryStatus::Inside);
    }

    #[test]
    fn test_far_point_is_outside() {
        let fences = FenceSet::default_farm();
        assert_eq!(classify(GeoPoint::new(36.1158, 91.7086), &fences), BoundaryStatus::Outside);
        assert_eq!(classify(GeoPoint::new(26.1158, 81.7086), &fences), BoundaryStatus::Outside);
    }

    #[test]
    fn test_empty_set_is_outside_everywhere() {
        let fences = FenceSet::new(vec![]).unwrap();
        assert_eq!(classify(GeoPoint::new(26.1158, 91.7086), &fences), BoundaryStatus::Outside);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut fences = default_fences();
        fences.push(fences[0].clone());
        assert!(matches!(FenceSet::new(fences), Err(HerdError::InvalidArgument(_))));
    }

    #[test]
    fn test_bow_tie_lobes_are_inside() {
        let bow_tie = GeoFence::new(
            "bow",
            "Bow",
            "",
            vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(2.0, 2.0),
                GeoPoint::new(2.0, 0.0),
                GeoPoint::new(0.0, 2.0),
            ],
        )
        .unwrap();
        let fences = FenceSet::new(vec![bow_tie]).unwrap();
        // lobes sit south and north of the crossing at (1, 1)
        assert_eq!(classify(GeoPoint::new(0.3, 1.0), &fences), BoundaryStatus::Inside);
        assert_eq!(classify(GeoPoint::new(1.7, 1.0), &fences), BoundaryStatus::Inside);
        assert_eq!(classify(GeoPoint::new(1.0, 1.0), &fences), BoundaryStatus::Inside);
        assert_eq!(classify(GeoPoint::new(1.0, 0.2), &fences), BoundaryStatus::Outside);
    }

    #[test]
    fn test_from_config_falls_back_to_farm() {
        assert_eq!(FenceSet::from_config(None).unwrap(), FenceSet::default_farm());
        let custom = vec![default_fences()[1].to_config()];
        let fences = FenceSet::from_config(Some(&custom)).unwrap();
        assert_eq!(fences.len(), 1);
        assert_eq!(fences.fences()[0].name, "North Field");
    }
}
