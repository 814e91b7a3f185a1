//! Placement of classified consensus regions within reference genes.
//!
//! Each region is paired with every gene feature it overlaps. Per gene, the
//! regions are numbered in transcription order: upstream first on `+` genes,
//! and counting down from the last one on `-` genes.

use std::collections::HashSet;

use log::debug;
use psites_core::models::{GeneFeature, Region, RegionSet, Strand, class_label};

use crate::engine::{IntervalEngine, NAME_COLUMN};
use crate::errors::ConsensusResult;
use crate::models::{AnnotatedRegion, GeneAssignedPeak};

/// One overlap between a region and a gene feature.
struct Hit {
    region: Region,
    /// `"<region_id>:<class>"`
    name: String,
    gene: GeneFeature,
}

impl Hit {
    fn into_peak(self, ordinal: u32) -> GeneAssignedPeak {
        let region_id = match self.name.rsplit_once(':') {
            Some((id, _)) => id.to_string(),
            None => self.name.clone(),
        };
        GeneAssignedPeak {
            chr: self.region.chr,
            start: self.region.start,
            end: self.region.end,
            resolved_class: class_label(&self.name).to_string(),
            gene: self.gene.gene,
            ordinal,
            region_id,
            strand: self.gene.strand,
        }
    }
}

pub struct GeneAssigner<'a> {
    engine: &'a dyn IntervalEngine,
}

impl<'a> GeneAssigner<'a> {
    pub fn new(engine: &'a dyn IntervalEngine) -> Self {
        GeneAssigner { engine }
    }

    ///
    /// Assign `regions` to the genes of `reference` (BED6, gene symbol as name).
    ///
    /// A region overlapping several features of the same gene is reported
    /// once for that gene, through its first feature by start position.
    /// Within a gene, `+` rows come first numbered `1..=n`, then `-` rows
    /// numbered `k` down to `1`.
    ///
    pub fn assign(
        &self,
        regions: &[AnnotatedRegion],
        reference: &RegionSet,
    ) -> ConsensusResult<Vec<GeneAssignedPeak>> {
        if regions.is_empty() || reference.is_empty() {
            return Ok(Vec::new());
        }

        let named = RegionSet::from(
            regions
                .iter()
                .map(AnnotatedRegion::to_region)
                .collect::<Vec<_>>(),
        );

        let mut hits = self
            .engine
            .overlap_join(&named, reference)?
            .into_iter()
            .map(|(region, feature)| {
                Ok(Hit {
                    name: region.required_column(NAME_COLUMN)?.to_string(),
                    gene: GeneFeature::try_from(&feature)?,
                    region,
                })
            })
            .collect::<ConsensusResult<Vec<_>>>()?;

        debug!("{} region/gene overlaps", hits.len());

        // stable: equal keys keep the engine's order
        hits.sort_by(|a, b| {
            a.region
                .chr
                .cmp(&b.region.chr)
                .then_with(|| a.gene.gene.cmp(&b.gene.gene))
                .then_with(|| a.region.start.cmp(&b.region.start))
        });

        let mut assigned = Vec::with_capacity(hits.len());
        let mut hits = hits.into_iter().peekable();

        while let Some(first) = hits.next() {
            let mut group = vec![first];
            while let Some(next) = hits.next_if(|h| {
                h.region.chr == group[0].region.chr && h.gene.gene == group[0].gene.gene
            }) {
                group.push(next);
            }
            number_gene_group(group, &mut assigned);
        }

        Ok(assigned)
    }
}

/// Deduplicate one gene's hits by region and number them along the strand.
fn number_gene_group(group: Vec<Hit>, out: &mut Vec<GeneAssignedPeak>) {
    let mut seen: HashSet<String> = HashSet::new();
    let (forward, reverse): (Vec<Hit>, Vec<Hit>) = group
        .into_iter()
        .filter(|hit| seen.insert(hit.name.clone()))
        .partition(|hit| hit.gene.strand == Strand::Forward);

    out.extend(
        forward
            .into_iter()
            .zip(1u32..)
            .map(|(hit, ordinal)| hit.into_peak(ordinal)),
    );

    let k = reverse.len() as u32;
    out.extend(
        reverse
            .into_iter()
            .zip((1..=k).rev())
            .map(|(hit, ordinal)| hit.into_peak(ordinal)),
    );
}
