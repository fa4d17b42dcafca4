//! Overlay timeline simulation
//!
//! Replays every message as an arrival and an expiry event against a bounded
//! stack. Arrivals push the stack up (dropping the topmost message when the
//! stack is full), expiries remove a message and let the ones above it drop
//! down. Every slot change closes the message's open segment and starts a new
//! one, so each emitted `Segment` covers exactly one slot.

use crate::{ChatMessage, Error, MessageTrack, Result, Segment, SimulationConfig, Timeline};

/// Closing a segment within this many seconds of its start discards it
const CLOSE_EPSILON: f64 = 1e-6;

/// Event kinds, ordered so that expiries run before arrivals at equal times
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Expiry,
    Arrival,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    time: f64,
    index: usize,
    kind: EventKind,
}

/// Per-message simulation state
#[derive(Debug, Clone, Copy, PartialEq)]
enum SlotState {
    Inactive,
    Active {
        slot: usize,
        open_start: f64,
        moved_from: Option<usize>,
    },
}

/// Simulates the chat stack for the given messages.
///
/// Messages must be sorted by arrival time. Every message gets a track in the
/// result, possibly with no segments if it was evicted the instant it arrived.
pub fn simulate(messages: &[ChatMessage], config: &SimulationConfig) -> Result<Timeline> {
    config.validate()?;
    validate_messages(messages)?;

    let mut sim = Simulation::new(messages, config);
    for event in build_events(messages, config.hold) {
        match event.kind {
            EventKind::Arrival => sim.arrive(event.index, event.time),
            EventKind::Expiry => sim.expire(event.index, event.time),
        }
    }

    let timeline = sim.finish();
    tracing::debug!(
        messages = timeline.tracks.len(),
        segments = timeline.segment_count(),
        "simulated chat stack"
    );
    Ok(timeline)
}

fn validate_messages(messages: &[ChatMessage]) -> Result<()> {
    let mut previous = 0.0;
    for (index, message) in messages.iter().enumerate() {
        if !message.time.is_finite() || message.time < 0.0 {
            return Err(Error::Validation(format!(
                "message {} has invalid arrival time {}",
                index, message.time
            )));
        }
        if message.is_blank() {
            return Err(Error::Validation(format!(
                "message {} has neither a sender name nor a body",
                index
            )));
        }
        if message.time < previous {
            return Err(Error::Validation(format!(
                "message {} arrives at {} before the previous message at {}",
                index, message.time, previous
            )));
        }
        previous = message.time;
    }
    Ok(())
}

fn build_events(messages: &[ChatMessage], hold: f64) -> Vec<Event> {
    let mut events = Vec::with_capacity(messages.len() * 2);
    for (index, message) in messages.iter().enumerate() {
        events.push(Event {
            time: message.time,
            index,
            kind: EventKind::Arrival,
        });
        events.push(Event {
            time: message.expiry(hold),
            index,
            kind: EventKind::Expiry,
        });
    }

    events.sort_by(|a, b| {
        a.time
            .total_cmp(&b.time)
            .then(a.kind.cmp(&b.kind))
            .then(a.index.cmp(&b.index))
    });
    events
}

struct Simulation {
    hold: f64,
    max_slots: usize,
    tracks: Vec<MessageTrack>,
    states: Vec<SlotState>,
    /// Active message indices, bottom to top; position equals slot
    stack: Vec<usize>,
}

impl Simulation {
    fn new(messages: &[ChatMessage], config: &SimulationConfig) -> Self {
        Self {
            hold: config.hold,
            max_slots: config.max_slots,
            tracks: messages.iter().cloned().map(MessageTrack::new).collect(),
            states: vec![SlotState::Inactive; messages.len()],
            stack: Vec::with_capacity(config.max_slots),
        }
    }

    fn expiry_of(&self, index: usize) -> f64 {
        self.tracks[index].message.expiry(self.hold)
    }

    fn arrive(&mut self, index: usize, time: f64) {
        tracing::trace!(index, time, "arrival");

        if self.expiry_of(index) <= time {
            return;
        }

        if self.stack.len() >= self.max_slots {
            if let Some(top) = self.stack.pop() {
                tracing::debug!(evicted = top, by = index, time, "stack full, evicting top message");
                self.retire(top, time);
            }
        }

        for pos in 0..self.stack.len() {
            let moving = self.stack[pos];
            self.move_to(moving, time, pos + 1);
        }

        self.states[index] = SlotState::Active {
            slot: 0,
            open_start: time,
            moved_from: None,
        };
        self.stack.insert(0, index);
    }

    fn expire(&mut self, index: usize, time: f64) {
        tracing::trace!(index, time, "expiry");

        let Some(pos) = self.stack.iter().position(|&i| i == index) else {
            return;
        };
        self.stack.remove(pos);
        self.retire(index, time);

        for slot in pos..self.stack.len() {
            let moving = self.stack[slot];
            self.move_to(moving, time, slot);
        }
    }

    /// Closes the open segment at `time` and reopens it in `new_slot`.
    fn move_to(&mut self, index: usize, time: f64, new_slot: usize) {
        if let SlotState::Active { slot, .. } = self.states[index] {
            self.close_open(index, time);
            self.states[index] = SlotState::Active {
                slot: new_slot,
                open_start: time,
                moved_from: Some(slot),
            };
        }
    }

    /// Closes the open segment at `time` and leaves the message inactive.
    fn retire(&mut self, index: usize, time: f64) {
        self.close_open(index, time);
        self.states[index] = SlotState::Inactive;
    }

    fn close_open(&mut self, index: usize, time: f64) {
        if let SlotState::Active {
            slot,
            open_start,
            moved_from,
        } = self.states[index]
        {
            if time > open_start + CLOSE_EPSILON {
                self.tracks[index]
                    .segments
                    .push(Segment::new(open_start, time, slot, moved_from));
            }
            self.states[index] = SlotState::Active {
                slot,
                open_start: time,
                moved_from,
            };
        }
    }

    fn finish(mut self) -> Timeline {
        for index in std::mem::take(&mut self.stack) {
            let expiry = self.expiry_of(index);
            self.retire(index, expiry);
        }

        for track in &mut self.tracks {
            if let Some(last) = track.segments.last_mut() {
                last.is_final = true;
            }
        }

        Timeline::new(
            SimulationConfig::new(self.hold, self.max_slots),
            self.tracks,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(times: &[f64]) -> Vec<ChatMessage> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| ChatMessage::new(i as u32, t, format!("U{}", i + 1), "m"))
            .collect()
    }

    fn seg(start: f64, end: f64, slot: usize, moved_from: Option<usize>, is_final: bool) -> Segment {
        Segment {
            start,
            end,
            slot,
            moved_from,
            is_final,
        }
    }

    #[test]
    fn test_single_message() {
        let timeline = simulate(&messages(&[0.0]), &SimulationConfig::new(5.0, 1)).unwrap();

        assert_eq!(timeline.tracks.len(), 1);
        assert_eq!(timeline.tracks[0].segments, vec![seg(0.0, 5.0, 0, None, true)]);
    }

    #[test]
    fn test_eviction_when_full() {
        let timeline =
            simulate(&messages(&[0.0, 1.0, 2.0]), &SimulationConfig::new(10.0, 2)).unwrap();

        // U1: pushed up at 1, evicted at 2
        assert_eq!(
            timeline.tracks[0].segments,
            vec![seg(0.0, 1.0, 0, None, false), seg(1.0, 2.0, 1, Some(0), true)]
        );
        // U2: pushed up at 2, expires at 11
        assert_eq!(
            timeline.tracks[1].segments,
            vec![seg(1.0, 2.0, 0, None, false), seg(2.0, 11.0, 1, Some(0), true)]
        );
        // U3: stays at the bottom, U2 leaves from above it
        assert_eq!(timeline.tracks[2].segments, vec![seg(2.0, 12.0, 0, None, true)]);
    }

    #[test]
    fn test_simultaneous_arrivals_evict_earlier() {
        let timeline = simulate(&messages(&[3.0, 3.0]), &SimulationConfig::new(4.0, 1)).unwrap();

        assert!(timeline.tracks[0].is_hidden());
        assert_eq!(timeline.tracks[1].segments, vec![seg(3.0, 7.0, 0, None, true)]);
    }

    #[test]
    fn test_expiry_runs_before_arrival_at_same_time() {
        // Second message arrives exactly when the first expires.
        let timeline = simulate(&messages(&[0.0, 2.0]), &SimulationConfig::new(2.0, 1)).unwrap();

        assert_eq!(timeline.tracks[0].segments, vec![seg(0.0, 2.0, 0, None, true)]);
        assert_eq!(timeline.tracks[1].segments, vec![seg(2.0, 4.0, 0, None, true)]);
    }

    #[test]
    fn test_oldest_message_expires_from_top() {
        // Room for all three; U1 expires at 10 from the top slot so nobody moves.
        let timeline =
            simulate(&messages(&[0.0, 5.0, 6.0]), &SimulationConfig::new(10.0, 3)).unwrap();

        assert_eq!(
            timeline.tracks[0].segments,
            vec![
                seg(0.0, 5.0, 0, None, false),
                seg(5.0, 6.0, 1, Some(0), false),
                seg(6.0, 10.0, 2, Some(1), true),
            ]
        );
        assert_eq!(
            timeline.tracks[1].segments,
            vec![seg(5.0, 6.0, 0, None, false), seg(6.0, 15.0, 1, Some(0), true)]
        );
        assert_eq!(timeline.tracks[2].segments, vec![seg(6.0, 16.0, 0, None, true)]);
    }

    #[test]
    fn test_expiry_below_top_slides_stack_down() {
        let mut sim = Simulation::new(&messages(&[0.0, 1.0, 2.0]), &SimulationConfig::new(10.0, 3));
        sim.arrive(0, 0.0);
        sim.arrive(1, 1.0);
        sim.arrive(2, 2.0);
        // Drop the bottom message early; the two above it slide down.
        sim.expire(2, 4.0);
        assert_eq!(sim.stack, vec![1, 0]);

        let timeline = sim.finish();
        assert_eq!(
            timeline.tracks[0].segments.last(),
            Some(&seg(4.0, 10.0, 1, Some(2), true))
        );
        assert_eq!(
            timeline.tracks[1].segments.last(),
            Some(&seg(4.0, 11.0, 0, Some(1), true))
        );
        assert_eq!(timeline.tracks[2].segments, vec![seg(2.0, 4.0, 0, None, true)]);
    }

    #[test]
    fn test_empty_input() {
        let timeline = simulate(&[], &SimulationConfig::default()).unwrap();
        assert!(timeline.tracks.is_empty());
        assert_eq!(timeline.segment_count(), 0);
    }

    #[test]
    fn test_rejects_unsorted_input() {
        let err = simulate(&messages(&[2.0, 1.0]), &SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_rejects_blank_message() {
        let mut input = messages(&[0.0, 1.0]);
        input[1] = ChatMessage::new(1, 1.0, "", "");

        let err = simulate(&input, &SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Either part alone is enough to display.
        input[1] = ChatMessage::new(1, 1.0, "", "body only");
        assert!(simulate(&input, &SimulationConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_negative_time() {
        let err = simulate(&messages(&[-1.0]), &SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let err = simulate(&messages(&[0.0]), &SimulationConfig::new(0.0, 1)).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_degenerate_arrival_is_noop() {
        let mut sim = Simulation::new(&messages(&[0.0]), &SimulationConfig::new(1.0, 1));
        sim.hold = 0.0;
        sim.arrive(0, 0.0);
        assert!(sim.stack.is_empty());
        assert_eq!(sim.states[0], SlotState::Inactive);

        let timeline = sim.finish();
        assert!(timeline.tracks[0].is_hidden());
    }

    #[test]
    fn test_events_sort_expiry_first() {
        let events = build_events(&messages(&[0.0, 1.0]), 1.0);
        let order: Vec<(usize, EventKind)> = events.iter().map(|e| (e.index, e.kind)).collect();
        assert_eq!(
            order,
            vec![
                (0, EventKind::Arrival),
                (0, EventKind::Expiry),
                (1, EventKind::Arrival),
                (1, EventKind::Expiry),
            ]
        );
    }
}
