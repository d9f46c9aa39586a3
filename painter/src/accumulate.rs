use std::collections::btree_map::{BTreeMap, Entry};

use base::defs::{Error, ErrorKind::*, Result};

use crate::misc::Point3;
use crate::snapshot::VertexPositionTable;
use crate::visibility::VisibilityMask;

// Minimum camera distance ever observed per vertex. Only vertices seen in at
// least one frame have an entry, and entries never increase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistanceMap {
    distances: BTreeMap<usize, f64>,
}

impl DistanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.distances.get(&index).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.distances.iter().map(|(&i, &d)| (i, d))
    }

    // Returns whether the entry was inserted or lowered.
    pub fn record(&mut self, index: usize, distance: f64) -> bool {
        match self.distances.entry(index) {
            Entry::Vacant(e) => {
                e.insert(distance);
                true
            }
            Entry::Occupied(mut e) => {
                if distance < *e.get() {
                    e.insert(distance);
                    true
                } else {
                    false
                }
            }
        }
    }

    // Folds one frame into the map, visiting only the visible vertices.
    // Returns the number of entries inserted or lowered.
    pub fn update(
        &mut self,
        mask: &VisibilityMask,
        positions: &VertexPositionTable,
        camera: &Point3,
    ) -> Result<usize> {
        let mut num_changed = 0;
        for &i in mask {
            let position = positions.get(i).ok_or_else(|| {
                let desc = format!(
                    "visible vertex {} is out of {} captured positions",
                    i,
                    positions.len()
                );
                Error::new(InconsistentState, desc)
            })?;
            if self.record(i, nalgebra::distance(camera, position)) {
                num_changed += 1;
            }
        }
        Ok(num_changed)
    }

    pub fn min_entry(&self) -> Option<(usize, f64)> {
        self.iter().min_by(|p, q| p.1.total_cmp(&q.1))
    }

    pub fn max_entry(&self) -> Option<(usize, f64)> {
        self.iter().max_by(|p, q| p.1.total_cmp(&q.1))
    }
}
