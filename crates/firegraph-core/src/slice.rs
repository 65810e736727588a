//! Per-source views of an event for reconciliation.
//!
//! A slice groups an event's fires by source and carries the effective
//! weighting for that (source, stream) pair. Reconciliation methods pick a
//! winning slice per field by sorting with the comparators below.

use std::cmp::Ordering;

use crate::{
  error::Result,
  event::EventId,
  fire::FireId,
  graph::FireGraph,
  source::SourceId,
  weighting::Weighting,
};

/// One source's contribution to an event.
#[derive(Debug, Clone)]
pub struct EventSlice {
  pub event:   EventId,
  pub source:  SourceId,
  pub weights: Weighting,
  /// The event's fires from this source, largest area first.
  pub fires:   Vec<FireId>,
}

impl FireGraph {
  /// Build one slice per participating source of the event's stream, in
  /// the stream's weighting order. Sources that contribute no fire with at
  /// least one clump are skipped.
  pub fn build_slices(&self, event: EventId) -> Result<Vec<EventSlice>> {
    let e = self.event(event)?;
    let stream = e.stream;
    let member_fires = self.event_fires(event);

    let sources: Vec<SourceId> = self.stream(stream)?.sources().collect();
    let mut slices = Vec::with_capacity(sources.len());
    for source in sources {
      let mut fires: Vec<&crate::fire::Fire> = Vec::new();
      for &fire in &member_fires {
        let f = self.fire(fire)?;
        if f.source == source && f.num_clumps() > 0 {
          fires.push(f);
        }
      }
      if fires.is_empty() {
        continue;
      }
      fires.sort_by(|a, b| crate::fire::Fire::by_area_desc(a, b));
      slices.push(EventSlice {
        event,
        source,
        weights: self.weighting_for_source(stream, source)?,
        fires: fires.into_iter().map(|f| f.id).collect(),
      });
    }
    Ok(slices)
  }
}

// ─── slice comparators ───
//
// Each orders slices so the preferred slice for one reconciled field comes
// first. Weight comparators sort descending (higher weight wins);
// uncertainty comparators sort ascending (lower uncertainty wins).

pub fn by_detection_rate_desc(a: &EventSlice, b: &EventSlice) -> Ordering {
  b.weights.detection_rate.total_cmp(&a.weights.detection_rate)
}

pub fn by_false_alarm_rate_desc(a: &EventSlice, b: &EventSlice) -> Ordering {
  b.weights
    .false_alarm_rate
    .total_cmp(&a.weights.false_alarm_rate)
}

pub fn by_location_weight_desc(a: &EventSlice, b: &EventSlice) -> Ordering {
  b.weights
    .location_weight
    .total_cmp(&a.weights.location_weight)
}

pub fn by_size_weight_desc(a: &EventSlice, b: &EventSlice) -> Ordering {
  b.weights.size_weight.total_cmp(&a.weights.size_weight)
}

pub fn by_shape_weight_desc(a: &EventSlice, b: &EventSlice) -> Ordering {
  b.weights.shape_weight.total_cmp(&a.weights.shape_weight)
}

pub fn by_growth_weight_desc(a: &EventSlice, b: &EventSlice) -> Ordering {
  b.weights.growth_weight.total_cmp(&a.weights.growth_weight)
}

pub fn by_name_weight_desc(a: &EventSlice, b: &EventSlice) -> Ordering {
  b.weights.name_weight.total_cmp(&a.weights.name_weight)
}

pub fn by_name_weight_asc(a: &EventSlice, b: &EventSlice) -> Ordering {
  a.weights.name_weight.total_cmp(&b.weights.name_weight)
}

pub fn by_type_weight_desc(a: &EventSlice, b: &EventSlice) -> Ordering {
  b.weights.type_weight.total_cmp(&a.weights.type_weight)
}

pub fn by_start_date_uncertainty_asc(
  a: &EventSlice,
  b: &EventSlice,
) -> Ordering {
  a.weights
    .start_date_uncertainty
    .cmp(&b.weights.start_date_uncertainty)
}

pub fn by_end_date_uncertainty_asc(
  a: &EventSlice,
  b: &EventSlice,
) -> Ordering {
  a.weights
    .end_date_uncertainty
    .cmp(&b.weights.end_date_uncertainty)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn slice(source: u64, weights: Weighting) -> EventSlice {
    EventSlice {
      event: EventId(1),
      source: SourceId(source),
      weights,
      fires: Vec::new(),
    }
  }

  #[test]
  fn weight_comparators_prefer_higher() {
    let low = slice(1, Weighting {
      size_weight: 0.2,
      ..Weighting::default()
    });
    let high = slice(2, Weighting {
      size_weight: 0.9,
      ..Weighting::default()
    });
    let mut slices = vec![low, high];
    slices.sort_by(by_size_weight_desc);
    assert_eq!(slices[0].source, SourceId(2));
  }

  #[test]
  fn uncertainty_comparators_prefer_lower() {
    let vague = slice(1, Weighting {
      start_date_uncertainty: 7,
      ..Weighting::default()
    });
    let precise = slice(2, Weighting {
      start_date_uncertainty: 1,
      ..Weighting::default()
    });
    let mut slices = vec![vague, precise];
    slices.sort_by(by_start_date_uncertainty_asc);
    assert_eq!(slices[0].source, SourceId(2));
  }

  #[test]
  fn detection_rate_sorts_descending() {
    let mut slices: Vec<EventSlice> = [0.3, 0.9, 0.6]
      .into_iter()
      .enumerate()
      .map(|(i, detection_rate)| {
        slice(i as u64 + 1, Weighting {
          detection_rate,
          ..Weighting::default()
        })
      })
      .collect();
    slices.sort_by(by_detection_rate_desc);
    let rates: Vec<f64> =
      slices.iter().map(|s| s.weights.detection_rate).collect();
    assert_eq!(rates, vec![0.9, 0.6, 0.3]);
  }

  #[test]
  fn every_comparator_orders_its_own_field() {
    let weak = slice(1, Weighting {
      detection_rate: 0.1,
      false_alarm_rate: 0.1,
      location_weight: 0.1,
      size_weight: 0.1,
      shape_weight: 0.1,
      growth_weight: 0.1,
      name_weight: 0.1,
      type_weight: 0.1,
      start_date_uncertainty: 9,
      end_date_uncertainty: 9,
      ..Weighting::default()
    });
    let strong = slice(2, Weighting {
      detection_rate: 0.8,
      false_alarm_rate: 0.8,
      location_weight: 0.8,
      size_weight: 0.8,
      shape_weight: 0.8,
      growth_weight: 0.8,
      name_weight: 0.8,
      type_weight: 0.8,
      start_date_uncertainty: 2,
      end_date_uncertainty: 2,
      ..Weighting::default()
    });

    type Cmp = fn(&EventSlice, &EventSlice) -> Ordering;
    let descending: [Cmp; 8] = [
      by_detection_rate_desc,
      by_false_alarm_rate_desc,
      by_location_weight_desc,
      by_size_weight_desc,
      by_shape_weight_desc,
      by_growth_weight_desc,
      by_name_weight_desc,
      by_type_weight_desc,
    ];
    for cmp in descending {
      assert_eq!(cmp(&strong, &weak), Ordering::Less);
      assert_eq!(cmp(&weak, &strong), Ordering::Greater);
      assert_eq!(cmp(&strong, &strong), Ordering::Equal);
    }

    let ascending: [Cmp; 3] = [
      by_name_weight_asc,
      by_start_date_uncertainty_asc,
      by_end_date_uncertainty_asc,
    ];
    for cmp in ascending {
      assert_eq!(cmp(&weak, &strong), Ordering::Less);
      assert_eq!(cmp(&strong, &weak), Ordering::Greater);
      assert_eq!(cmp(&weak, &weak), Ordering::Equal);
    }
  }
}
