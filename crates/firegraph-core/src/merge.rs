//! Merging fires and events.
//!
//! Both merges follow the same shape: validate every precondition against
//! an immutable graph, snapshot what the survivor needs, then mutate. A
//! precondition failure therefore leaves the graph exactly as it was.

use firegraph_gis as gis;
use geo::Geometry;
use tracing::debug;

use crate::{
  attrs::AttributeBag,
  error::{Error, Result},
  event::EventId,
  fire::FireId,
  graph::FireGraph,
};

impl FireGraph {
  /// Merge fires into one new fire, deleting the inputs.
  ///
  /// All inputs must belong to the same source. The merged fire absorbs
  /// every input clump, the union of all input attributes (later inputs win
  /// on key collisions), and every event association the inputs held.
  /// Probability and fire type follow the largest input by area.
  pub fn merge_fires(&mut self, inputs: &[FireId]) -> Result<FireId> {
    if inputs.is_empty() {
      return Err(Error::EmptyMerge("fires"));
    }
    let source = self.fire(inputs[0])?.source;
    for &id in &inputs[1..] {
      let other = self.fire(id)?.source;
      if other != source {
        return Err(Error::IncompatibleSources(
          self.source(source)?.name.clone(),
          self.source(other)?.name.clone(),
        ));
      }
    }

    let mut attrs = AttributeBag::new();
    let mut clumps = Vec::new();
    let mut event_links = Vec::new();
    let mut largest = inputs[0];
    let mut largest_area = f64::NEG_INFINITY;
    for &id in inputs {
      let f = self.fire(id)?;
      attrs.extend(&f.attrs);
      clumps.extend(f.clumps.iter().copied());
      if f.area > largest_area {
        largest = id;
        largest_area = f.area;
      }
      for event in self.fire_events(id) {
        event_links.push(event);
      }
    }
    let (probability, fire_type) = {
      let f = self.fire(largest)?;
      (f.probability, f.fire_type.clone())
    };

    let merged = self.create_fire(source)?;
    {
      let f = self.fire_mut(merged)?;
      f.attrs = attrs;
      f.probability = probability;
      f.fire_type = fire_type;
    }
    for clump in clumps {
      self.add_clump(merged, clump)?;
    }
    for event in event_links {
      self.add_fire_to_event(event, merged)?;
    }
    for &id in inputs {
      self.delete_fire(id)?;
    }
    debug!(fire = %merged, inputs = inputs.len(), "merged fires");
    Ok(merged)
  }

  /// Merge events into one new event, deleting the inputs.
  ///
  /// All inputs must belong to the same stream. The merged event covers the
  /// earliest start through the latest end of the inputs, the polygonal
  /// union of their outlines, and every fire association they held. Display
  /// name and total area follow the largest input by total area (ties keep
  /// the earliest input), and its days are copies of that input's days.
  /// Probability and fire type are not inherited; reconciliation assigns
  /// them afresh.
  pub fn merge_events(&mut self, inputs: &[EventId]) -> Result<EventId> {
    if inputs.is_empty() {
      return Err(Error::EmptyMerge("events"));
    }
    let stream = self.event(inputs[0])?.stream;
    for &id in &inputs[1..] {
      let other = self.event(id)?.stream;
      if other != stream {
        return Err(Error::IncompatibleStreams(
          self.stream(stream)?.name.clone(),
          self.stream(other)?.name.clone(),
        ));
      }
    }

    let mut attrs = AttributeBag::new();
    let mut fire_links = Vec::new();
    let mut largest = inputs[0];
    let mut largest_area = self.event(largest)?.total_area;
    let mut start = self.event(inputs[0])?.start_date;
    let mut end = self.event(inputs[0])?.end_date;
    let mut outline = Geometry::MultiPolygon(
      self.event(inputs[0])?.outline_shape.clone(),
    );
    for &id in inputs {
      let e = self.event(id)?;
      attrs.extend(&e.attrs);
      start = start.min(e.start_date);
      end = end.max(e.end_date);
      if e.total_area > largest_area {
        largest = id;
        largest_area = e.total_area;
      }
      for fire in self.event_fires(id) {
        fire_links.push(fire);
      }
    }
    for &id in &inputs[1..] {
      let shape = Geometry::MultiPolygon(self.event(id)?.outline_shape.clone());
      outline = gis::union(&outline, &shape)?;
    }
    let outline = gis::to_multi_polygon(&outline)?;

    let (display_name, total_area, day_values) = {
      let e = self.event(largest)?;
      let days = e.event_days.clone();
      let mut day_values = Vec::with_capacity(days.len());
      for day in days {
        let d = self.event_day(day)?;
        day_values.push((d.date, d.daily_area));
      }
      let e = self.event(largest)?;
      (e.display_name.clone(), e.total_area, day_values)
    };

    let merged = self.create_event(stream)?;
    {
      let e = self.event_mut(merged)?;
      e.attrs = attrs;
      e.display_name = display_name;
      e.outline_shape = outline;
      e.total_area = total_area;
      e.start_date = start;
      e.end_date = end;
    }
    let new_days = day_values
      .into_iter()
      .map(|(date, area)| self.create_event_day(date, area))
      .collect();
    self.set_event_days(merged, new_days)?;
    for fire in fire_links {
      self.add_fire_to_event(merged, fire)?;
    }
    for &id in inputs {
      self.delete_event(id)?;
    }
    debug!(event = %merged, inputs = inputs.len(), "merged events");
    Ok(merged)
  }
}
