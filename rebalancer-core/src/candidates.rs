//! Candidate plate sets shared between generation and retrofit.
//!
//! Generation appends to a [`CandidateSetBuilder`]; retrofit only ever sees
//! the frozen [`CandidateSnapshot`].

use std::collections::HashSet;

use crate::plates::Coverage;

/// Which bot tier a candidate list is meant for.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CandidateTier {
    All,
    Scav,
    Boss,
}

#[derive(Debug, Clone)]
pub struct CandidateSetBuilder {
    max_scav_class: u32,
    min_boss_class: Option<u32>,
    torso: Vec<String>,
    full: Vec<String>,
    scav_torso: Vec<String>,
    scav_full: Vec<String>,
    boss_torso: Vec<String>,
    boss_full: Vec<String>,
    seen: HashSet<String>,
}

impl CandidateSetBuilder {
    pub fn new(max_scav_class: u32, min_boss_class: Option<u32>) -> Self {
        Self {
            max_scav_class,
            min_boss_class,
            torso: Vec::new(),
            full: Vec::new(),
            scav_torso: Vec::new(),
            scav_full: Vec::new(),
            boss_torso: Vec::new(),
            boss_full: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Records a freshly generated plate. Returns `false` and records nothing
    /// if the id was already seen.
    ///
    /// Chest plates also fit full-size carriers, so they go to both the torso
    /// and the full lists; full plates only go to the full lists.
    pub fn push(&mut self, id: &str, class: u32, coverage: Coverage) -> bool {
        if !self.seen.insert(id.to_string()) {
            return false;
        }

        let scav = class <= self.max_scav_class;
        let boss = self.min_boss_class.map_or(false, |min| class >= min);

        if coverage == Coverage::Torso {
            self.torso.push(id.to_string());
            if scav {
                self.scav_torso.push(id.to_string());
            }
            if boss {
                self.boss_torso.push(id.to_string());
            }
        }

        self.full.push(id.to_string());
        if scav {
            self.scav_full.push(id.to_string());
        }
        if boss {
            self.boss_full.push(id.to_string());
        }
        true
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn finalize(self) -> CandidateSnapshot {
        CandidateSnapshot {
            boss_tier: self.min_boss_class.is_some(),
            torso: self.torso,
            full: self.full,
            scav_torso: self.scav_torso,
            scav_full: self.scav_full,
            boss_torso: self.boss_torso,
            boss_full: self.boss_full,
            generated: self.seen,
        }
    }
}

/// Read-only candidate sets, available once generation is complete.
#[derive(Debug, Clone)]
pub struct CandidateSnapshot {
    boss_tier: bool,
    torso: Vec<String>,
    full: Vec<String>,
    scav_torso: Vec<String>,
    scav_full: Vec<String>,
    boss_torso: Vec<String>,
    boss_full: Vec<String>,
    generated: HashSet<String>,
}

impl CandidateSnapshot {
    pub fn get(&self, tier: CandidateTier, coverage: Coverage) -> &[String] {
        match (tier, coverage) {
            (CandidateTier::All, Coverage::Torso) => &self.torso,
            (CandidateTier::All, Coverage::Full) => &self.full,
            (CandidateTier::Scav, Coverage::Torso) => &self.scav_torso,
            (CandidateTier::Scav, Coverage::Full) => &self.scav_full,
            (CandidateTier::Boss, Coverage::Torso) => &self.boss_torso,
            (CandidateTier::Boss, Coverage::Full) => &self.boss_full,
        }
    }

    pub fn has_boss_tier(&self) -> bool {
        self.boss_tier
    }

    pub fn is_generated(&self, id: &str) -> bool {
        self.generated.contains(id)
    }

    pub fn plate_count(&self) -> usize {
        self.generated.len()
    }
}
