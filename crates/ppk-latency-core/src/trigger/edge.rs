//! Rising-edge detection on a digital trigger channel
//!
//! Converts a channel's per-sample levels into discrete trigger events.
//! Each sample is compared only with the immediately preceding level, so
//! detection is a single linear pass with one level of state.
//!
//! # First sample convention
//!
//! A recording may start while a trigger line is already high. With the
//! default [`EdgePolicy::SeedFromFirstSample`] the first sample only seeds the
//! previous level and never produces an event: `[1, 1, 1]` yields no edges.
//! [`EdgePolicy::AssumeLow`] treats the line as low before the recording
//! started, so the same sequence yields one edge at the first sample.

use serde::{Deserialize, Serialize};

use super::event::{Channel, Level, Sample, TriggerEvent};

/// How the level before the first sample is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// The first sample initialises the previous level; it is never an edge
    #[default]
    SeedFromFirstSample,
    /// The line is assumed low before the first sample
    AssumeLow,
}

/// Streaming 0 -> 1 transition detector for one channel
///
/// # Example
/// ```
/// use ppk_latency_core::trigger::edge::{EdgeDetector, EdgePolicy};
/// use ppk_latency_core::trigger::event::{Channel, Level, Sample};
///
/// let mut detector = EdgeDetector::new(Channel::Send, EdgePolicy::default());
/// assert!(detector.process(Sample::new(0.0, Level::Low)).is_none());
/// let edge = detector.process(Sample::new(1.0, Level::High)).unwrap();
/// assert_eq!(edge.timestamp, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    channel: Channel,
    policy: EdgePolicy,
    /// Level of the previous sample (`None` until the first sample is seen)
    previous: Option<Level>,
    edge_count: usize,
}

impl EdgeDetector {
    /// Create a detector for `channel`
    pub fn new(channel: Channel, policy: EdgePolicy) -> Self {
        Self {
            channel,
            policy,
            previous: Self::initial_level(policy),
            edge_count: 0,
        }
    }

    fn initial_level(policy: EdgePolicy) -> Option<Level> {
        match policy {
            EdgePolicy::SeedFromFirstSample => None,
            EdgePolicy::AssumeLow => Some(Level::Low),
        }
    }

    /// Feed one sample
    ///
    /// Returns a trigger event if this sample is high and the previous level was low.
    pub fn process(&mut self, sample: Sample) -> Option<TriggerEvent> {
        let rising = matches!(self.previous, Some(Level::Low)) && sample.level.is_high();
        self.previous = Some(sample.level);

        if rising {
            self.edge_count += 1;
            Some(TriggerEvent::new(sample.timestamp, self.channel))
        } else {
            None
        }
    }

    /// Run the detector over a whole buffer, collecting every edge
    pub fn process_buffer(&mut self, samples: &[Sample]) -> Vec<TriggerEvent> {
        samples.iter().filter_map(|&s| self.process(s)).collect()
    }

    /// Number of edges emitted since creation or the last reset
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Forget the previous level and the edge count
    pub fn reset(&mut self) {
        self.previous = Self::initial_level(self.policy);
        self.edge_count = 0;
    }
}

/// Lazy iterator over the rising edges of a sample stream
///
/// Created by [`rising_edges`].
#[derive(Debug, Clone)]
pub struct RisingEdges<I> {
    samples: I,
    detector: EdgeDetector,
}

impl<I> Iterator for RisingEdges<I>
where
    I: Iterator<Item = Sample>,
{
    type Item = TriggerEvent;

    fn next(&mut self) -> Option<Self::Item> {
        for sample in self.samples.by_ref() {
            if let Some(event) = self.detector.process(sample) {
                return Some(event);
            }
        }
        None
    }
}

/// Lazily detect rising edges in an ordered sample stream
pub fn rising_edges<I>(channel: Channel, policy: EdgePolicy, samples: I) -> RisingEdges<I::IntoIter>
where
    I: IntoIterator<Item = Sample>,
{
    RisingEdges {
        samples: samples.into_iter(),
        detector: EdgeDetector::new(channel, policy),
    }
}

/// Detect all rising edges in a channel's samples
pub fn detect_rising_edges(
    channel: Channel,
    policy: EdgePolicy,
    samples: &[Sample],
) -> Vec<TriggerEvent> {
    EdgeDetector::new(channel, policy).process_buffer(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(levels: &[u8]) -> Vec<Sample> {
        levels
            .iter()
            .enumerate()
            .map(|(i, &l)| Sample::new(i as f64, Level::from(l == 1)))
            .collect()
    }

    fn edge_times(policy: EdgePolicy, levels: &[u8]) -> Vec<f64> {
        detect_rising_edges(Channel::Send, policy, &samples(levels))
            .into_iter()
            .map(|e| e.timestamp)
            .collect()
    }

    #[test]
    fn test_edges_at_transitions() {
        let edges = edge_times(EdgePolicy::default(), &[0, 0, 1, 1, 0, 1]);
        assert_eq!(edges, vec![2.0, 5.0]);
    }

    #[test]
    fn test_all_low_has_no_edges() {
        assert!(edge_times(EdgePolicy::SeedFromFirstSample, &[0, 0, 0]).is_empty());
        assert!(edge_times(EdgePolicy::AssumeLow, &[0, 0, 0]).is_empty());
    }

    #[test]
    fn test_leading_high_is_not_an_edge_by_default() {
        assert!(edge_times(EdgePolicy::SeedFromFirstSample, &[1, 1, 1]).is_empty());
    }

    #[test]
    fn test_leading_high_counts_when_assuming_low() {
        assert_eq!(edge_times(EdgePolicy::AssumeLow, &[1, 1, 1]), vec![0.0]);
    }

    #[test]
    fn test_leading_high_then_pulse() {
        let levels = [1, 0, 1, 1, 0];
        assert_eq!(edge_times(EdgePolicy::SeedFromFirstSample, &levels), vec![2.0]);
        assert_eq!(edge_times(EdgePolicy::AssumeLow, &levels), vec![0.0, 2.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(edge_times(EdgePolicy::default(), &[]).is_empty());
    }

    #[test]
    fn test_events_carry_channel() {
        let input = samples(&[0, 1]);
        let events = detect_rising_edges(Channel::Receive, EdgePolicy::default(), &input);
        assert_eq!(events, vec![TriggerEvent::new(1.0, Channel::Receive)]);
    }

    #[test]
    fn test_lazy_iterator_matches_buffer() {
        let input = samples(&[0, 1, 0, 1, 0, 0, 1]);
        let lazy: Vec<_> =
            rising_edges(Channel::Send, EdgePolicy::default(), input.clone()).collect();
        let eager = detect_rising_edges(Channel::Send, EdgePolicy::default(), &input);
        assert_eq!(lazy, eager);
        assert_eq!(lazy.len(), 3);
    }

    #[test]
    fn test_edge_count_and_reset() {
        let mut detector = EdgeDetector::new(Channel::Send, EdgePolicy::AssumeLow);
        detector.process_buffer(&samples(&[1, 0, 1]));
        assert_eq!(detector.edge_count(), 2);

        detector.reset();
        assert_eq!(detector.edge_count(), 0);
        // Reset restores the assumed-low previous level
        assert!(detector.process(Sample::new(10.0, Level::High)).is_some());
    }

    #[test]
    fn test_does_not_resort_input() {
        // Out-of-order timestamps are passed through in input order
        let input = vec![
            Sample::new(5.0, Level::Low),
            Sample::new(9.0, Level::High),
            Sample::new(1.0, Level::Low),
            Sample::new(3.0, Level::High),
        ];
        let times: Vec<f64> = detect_rising_edges(Channel::Send, EdgePolicy::default(), &input)
            .into_iter()
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(times, vec![9.0, 3.0]);
    }
}
