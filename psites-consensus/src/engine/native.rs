//! In-process interval engine.
//!
//! Coverage and merge are sweep lines over sorted interval endpoints; the two
//! overlap operations query a [`MultiChromOverlapper`] built over `b`.

use std::collections::BTreeMap;

use psites_core::models::{Region, RegionSet};
use psites_overlaprs::MultiChromOverlapper;
use psites_overlaprs::multi_chrom_overlapper::try_index_region_set;

use super::{CoverageSpan, IntervalEngine, NO_OVERLAP};
use crate::errors::ConsensusResult;

/// A start or end of one sample's interval.
#[derive(Debug, Clone, Copy)]
struct Event {
    pos: u32,
    is_start: bool,
    sample: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEngine;

impl NativeEngine {
    /// Sweep the events of one chromosome, appending spans to `out`.
    fn sweep_chromosome(chr: &str, mut events: Vec<Event>, n_samples: usize, out: &mut Vec<CoverageSpan>) {
        events.sort_by_key(|e| e.pos);

        let mut depth = vec![0u32; n_samples];
        let mut distinct: u32 = 0;
        let mut prev_pos: Option<u32> = None;
        let mut i = 0;

        while i < events.len() {
            let pos = events[i].pos;

            if let Some(prev) = prev_pos {
                if distinct > 0 && pos > prev {
                    let presence: Vec<bool> = depth.iter().map(|&d| d > 0).collect();
                    // same sample set straight after the previous span: extend it
                    let extends = matches!(
                        out.last(),
                        Some(last) if last.chr == chr && last.end == prev && last.presence == presence
                    );
                    if extends {
                        if let Some(last) = out.last_mut() {
                            last.end = pos;
                        }
                    } else {
                        out.push(CoverageSpan {
                            chr: chr.to_string(),
                            start: prev,
                            end: pos,
                            num: distinct,
                            presence,
                        });
                    }
                }
            }

            // apply every event at this position before the next span opens
            while i < events.len() && events[i].pos == pos {
                let e = events[i];
                if e.is_start {
                    depth[e.sample] += 1;
                    if depth[e.sample] == 1 {
                        distinct += 1;
                    }
                } else {
                    depth[e.sample] -= 1;
                    if depth[e.sample] == 0 {
                        distinct -= 1;
                    }
                }
                i += 1;
            }

            prev_pos = Some(pos);
        }
    }

    /// Index `b`, failing on records the index cannot hold.
    fn index(b: &RegionSet) -> ConsensusResult<MultiChromOverlapper<u32, usize>> {
        Ok(try_index_region_set(b)?)
    }
}

impl IntervalEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    fn multi_coverage(&self, samples: &[(String, RegionSet)]) -> ConsensusResult<Vec<CoverageSpan>> {
        // chromosome -> events; BTreeMap keeps chromosomes in sorted order
        let mut events: BTreeMap<&str, Vec<Event>> = BTreeMap::new();

        for (sample, (_, rs)) in samples.iter().enumerate() {
            for region in rs.iter().filter(|r| r.end > r.start) {
                let chr_events = events.entry(region.chr.as_str()).or_default();
                chr_events.push(Event {
                    pos: region.start,
                    is_start: true,
                    sample,
                });
                chr_events.push(Event {
                    pos: region.end,
                    is_start: false,
                    sample,
                });
            }
        }

        let mut spans = Vec::new();
        for (chr, chr_events) in events {
            Self::sweep_chromosome(chr, chr_events, samples.len(), &mut spans);
        }

        Ok(spans)
    }

    fn merge(&self, regions: &RegionSet, gap: u32) -> ConsensusResult<RegionSet> {
        if regions.is_empty() {
            return Ok(RegionSet::default());
        }

        let mut sorted = RegionSet::from(regions.regions.clone());
        sorted.sort();

        let mut merged: Vec<Region> = Vec::new();
        let mut iter = sorted.regions.into_iter();
        let Some(mut current) = iter.next() else {
            return Ok(RegionSet::default());
        };
        current.rest = None;

        for r in iter {
            if r.chr == current.chr && r.start <= current.end.saturating_add(gap) {
                current.end = current.end.max(r.end);
            } else {
                merged.push(current);
                current = Region {
                    rest: None,
                    ..r
                };
            }
        }
        merged.push(current);

        Ok(RegionSet::from(merged))
    }

    fn overlap_aggregate(
        &self,
        a: &RegionSet,
        b: &RegionSet,
        column: usize,
    ) -> ConsensusResult<RegionSet> {
        let index = Self::index(b)?;

        let mut any_overlap = false;
        let mut rows: Vec<Region> = Vec::with_capacity(a.len());

        for region in a {
            let hits = index.find_record_indices(region);
            let collapsed = match hits.is_empty() {
                true => NO_OVERLAP.to_string(),
                false => {
                    any_overlap = true;
                    hits.iter()
                        .map(|&i| b.regions[i].required_column(column))
                        .collect::<Result<Vec<_>, _>>()?
                        .join(",")
                }
            };
            rows.push(region.with_appended(&collapsed));
        }

        // nothing overlapped anywhere: no rows at all
        if !any_overlap {
            return Ok(RegionSet::default());
        }

        Ok(RegionSet::from(rows))
    }

    fn overlap_join(&self, a: &RegionSet, b: &RegionSet) -> ConsensusResult<Vec<(Region, Region)>> {
        let index = Self::index(b)?;

        Ok(a.iter()
            .flat_map(|region| {
                index
                    .find_record_indices(region)
                    .into_iter()
                    .map(move |i| (region.clone(), b.regions[i].clone()))
            })
            .collect())
    }
}
