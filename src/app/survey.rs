use alloc::vec::Vec;

use super::types::{ScanHit, SecurityMode, SSID_MAX};

pub struct NetworkRecord {
    pub ssid: heapless::String<SSID_MAX>,
    pub first_seen_ms: u64,
    pub last_seen_ms: u64,
    pub total_sightings: u32,
    pub last_rssi: i8,
    pub rssi_sum: i64,
    pub channel: u8,
    pub security: SecurityMode,
    pub cycles_observed: u32,
    pub unique_cycle_hits: u32,
    epoch_tag: u32,
    mesh_run: u32,
    pub mesh_peak: u32,
}

impl NetworkRecord {
    pub fn average_rssi(&self) -> i64 {
        if self.total_sightings == 0 {
            return 0;
        }
        self.rssi_sum / i64::from(self.total_sightings)
    }

    /// Fraction of cycles since creation without a fresh re-observation.
    /// Mesh-duplicate-only cycles count as lost, same as true absence.
    pub fn loss_percent(&self) -> u32 {
        if self.cycles_observed == 0 {
            return 0;
        }
        100 * (self.cycles_observed - self.unique_cycle_hits.min(self.cycles_observed))
            / self.cycles_observed
    }

    pub fn idle_seconds(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_seen_ms) / 1_000
    }

    // Average signal weighted up for networks re-observed nearly every
    // cycle and down for mesh-duplicate noise. Zero divisors cannot occur
    // after merge, but this is a precondition rather than a typed invariant.
    fn rank_key(&self) -> i64 {
        if self.total_sightings == 0 || self.unique_cycle_hits == 0 {
            return i64::MIN;
        }
        self.rssi_sum * i64::from(self.cycles_observed)
            / i64::from(self.total_sightings)
            / i64::from(self.unique_cycle_hits)
    }
}

pub struct SurveyStore {
    records: Vec<NetworkRecord>,
    epoch: u32,
}

impl SurveyStore {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            epoch: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[NetworkRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&NetworkRecord> {
        self.records.get(index)
    }

    /// Opens a new aggregation epoch. Called once per full scan cycle,
    /// before any merge of that cycle's observations.
    pub fn begin_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        for record in &mut self.records {
            record.cycles_observed += 1;
        }
    }

    pub fn merge(&mut self, hit: &ScanHit, now_ms: u64) {
        if let Some(record) = self.records.iter_mut().find(|r| r.ssid == hit.ssid) {
            record.last_seen_ms = now_ms;
            record.last_rssi = hit.signal_dbm;
            record.rssi_sum += i64::from(hit.signal_dbm);
            record.total_sightings += 1;
            record.channel = hit.channel;
            record.security = hit.security;
            if record.epoch_tag == self.epoch {
                // Repeated entry within one physical scan: another access
                // point advertising the same name.
                record.mesh_run += 1;
            } else {
                record.epoch_tag = self.epoch;
                record.mesh_run = 1;
                record.unique_cycle_hits += 1;
            }
            if record.mesh_peak < record.mesh_run {
                record.mesh_peak = record.mesh_run;
            }
        } else {
            self.records.push(NetworkRecord {
                ssid: hit.ssid.clone(),
                first_seen_ms: now_ms,
                last_seen_ms: now_ms,
                total_sightings: 1,
                last_rssi: hit.signal_dbm,
                rssi_sum: i64::from(hit.signal_dbm),
                channel: hit.channel,
                security: hit.security,
                cycles_observed: 1,
                unique_cycle_hits: 1,
                epoch_tag: self.epoch,
                mesh_run: 1,
                mesh_peak: 1,
            });
        }
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn sort_best_first(&mut self) {
        self.records
            .sort_unstable_by(|a, b| b.rank_key().cmp(&a.rank_key()));
    }

    pub fn sort_worst_first(&mut self) {
        self.records
            .sort_unstable_by(|a, b| a.rank_key().cmp(&b.rank_key()));
    }
}
