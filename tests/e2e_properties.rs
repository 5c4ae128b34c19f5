//! Property tests for edge detection and trigger matching invariants

use ppk_latency::diagnostics::NoopObserver;
use ppk_latency::trigger::edge::{detect_rising_edges, EdgePolicy};
use ppk_latency::trigger::event::{events_from_timestamps, Channel, Level, Sample};
use ppk_latency::trigger::matcher::{MatchConfig, MatchOutcome, TriggerMatcher};
use proptest::prelude::*;

/// Strictly increasing timestamps on a 0.25 ms grid (exact in binary)
fn timestamps(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1u32..40, 0..max_len).prop_map(|deltas| {
        let mut t = 0u32;
        deltas
            .into_iter()
            .map(|d| {
                t += d;
                f64::from(t) * 0.25
            })
            .collect()
    })
}

fn samples(levels: &[bool]) -> Vec<Sample> {
    levels
        .iter()
        .enumerate()
        .map(|(i, &high)| Sample::new(i as f64, Level::from(high)))
        .collect()
}

/// Count runs of high samples, optionally counting a run at index 0
fn count_runs(levels: &[bool], count_leading: bool) -> usize {
    levels
        .iter()
        .enumerate()
        .filter(|&(i, &high)| {
            high && if i == 0 {
                count_leading
            } else {
                !levels[i - 1]
            }
        })
        .count()
}

fn run_matcher(send: &[f64], receive: &[f64], max_latency_ms: f64) -> MatchOutcome {
    TriggerMatcher::new(MatchConfig::new(max_latency_ms).unwrap()).pair(
        &events_from_timestamps(Channel::Send, send),
        &events_from_timestamps(Channel::Receive, receive),
        &mut NoopObserver,
    )
}

proptest! {
    #[test]
    fn edge_count_matches_high_runs(levels in prop::collection::vec(any::<bool>(), 0..200)) {
        let input = samples(&levels);

        let seeded = detect_rising_edges(Channel::Send, EdgePolicy::SeedFromFirstSample, &input);
        prop_assert_eq!(seeded.len(), count_runs(&levels, false));

        let assume_low = detect_rising_edges(Channel::Send, EdgePolicy::AssumeLow, &input);
        prop_assert_eq!(assume_low.len(), count_runs(&levels, true));
    }

    #[test]
    fn edges_land_on_high_samples_after_low(
        levels in prop::collection::vec(any::<bool>(), 1..200),
    ) {
        let input = samples(&levels);
        for edge in detect_rising_edges(Channel::Receive, EdgePolicy::default(), &input) {
            let i = edge.timestamp as usize;
            prop_assert!(levels[i]);
            prop_assert!(i > 0 && !levels[i - 1]);
            prop_assert_eq!(edge.channel, Channel::Receive);
        }
    }

    #[test]
    fn measurements_are_causal_bounded_and_one_to_one(
        send in timestamps(40),
        receive in timestamps(40),
        max_latency_ms in 0.25f64..20.0,
    ) {
        let outcome = run_matcher(&send, &receive, max_latency_ms);

        for m in &outcome.measurements {
            prop_assert!(m.receive_time > m.send_time);
            prop_assert!(m.latency > 0.0);
            prop_assert!(m.latency <= max_latency_ms);
            prop_assert_eq!(m.latency, m.receive_time - m.send_time);
        }

        let mut used: Vec<f64> = outcome.measurements.iter().map(|m| m.receive_time).collect();
        used.sort_by(f64::total_cmp);
        used.dedup();
        prop_assert_eq!(used.len(), outcome.measurements.len());

        // Every send event is accounted for exactly once
        prop_assert_eq!(outcome.measurements.len() + outcome.unmatched.len(), send.len());
    }

    #[test]
    fn each_choice_is_the_nearest_available(
        send in timestamps(30),
        receive in timestamps(30),
        max_latency_ms in 0.25f64..20.0,
    ) {
        let outcome = run_matcher(&send, &receive, max_latency_ms);
        let mut consumed: Vec<f64> = Vec::new();
        let mut matched = outcome.measurements.iter().peekable();

        for (index, &t_s) in send.iter().enumerate() {
            let chosen = matched.next_if(|m| m.index == index);

            let best_available = receive
                .iter()
                .filter(|&&r| !consumed.contains(&r))
                .map(|&r| r - t_s)
                .filter(|&lat| lat > 0.0 && lat <= max_latency_ms)
                .fold(None, |best: Option<f64>, lat| Some(best.map_or(lat, |b| b.min(lat))));

            prop_assert_eq!(chosen.map(|m| m.latency), best_available);
            if let Some(m) = chosen {
                consumed.push(m.receive_time);
            }
        }
    }

    #[test]
    fn measurement_indices_follow_send_order(
        send in timestamps(30),
        receive in timestamps(30),
    ) {
        let outcome = run_matcher(&send, &receive, 10.0);
        let indices: Vec<usize> = outcome.measurements.iter().map(|m| m.index).collect();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        for m in &outcome.measurements {
            prop_assert_eq!(m.send_time, send[m.index]);
        }
    }
}
