//! In-memory dump writer with deterministic failure injection.

use std::collections::HashMap;

use crate::dump::DumpWriter;
use crate::errors::WriteError;
use crate::models::{
    DumpKind, DumpRecord, EventRecord, LinkRecord, MeasureRecord, MetricRecord,
    NewCodePeriodRecord, SettingRecord,
};

/// Keeps every accepted record, per stream, in write order.
#[derive(Debug, Default)]
pub struct MemoryDumpWriter {
    records: HashMap<DumpKind, Vec<DumpRecord>>,
    attempts: HashMap<DumpKind, u64>,
    fail_at: HashMap<DumpKind, u64>,
}

impl MemoryDumpWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `nth` (1-based) write attempt to the stream of `kind`, and
    /// every attempt after it.
    pub fn fail_on(mut self, kind: DumpKind, nth: u64) -> Self {
        self.fail_at.insert(kind, nth);
        self
    }

    pub fn records(&self, kind: DumpKind) -> &[DumpRecord] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn events(&self) -> Vec<&EventRecord> {
        self.records(DumpKind::Events)
            .iter()
            .filter_map(|r| match r {
                DumpRecord::Event(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    pub fn links(&self) -> Vec<&LinkRecord> {
        self.records(DumpKind::Links)
            .iter()
            .filter_map(|r| match r {
                DumpRecord::Link(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    pub fn measures(&self) -> Vec<&MeasureRecord> {
        self.records(DumpKind::Measures)
            .iter()
            .filter_map(|r| match r {
                DumpRecord::Measure(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn metrics(&self) -> Vec<&MetricRecord> {
        self.records(DumpKind::Metrics)
            .iter()
            .filter_map(|r| match r {
                DumpRecord::Metric(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn settings(&self) -> Vec<&SettingRecord> {
        self.records(DumpKind::Settings)
            .iter()
            .filter_map(|r| match r {
                DumpRecord::Setting(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn new_code_periods(&self) -> Vec<&NewCodePeriodRecord> {
        self.records(DumpKind::NewCodePeriods)
            .iter()
            .filter_map(|r| match r {
                DumpRecord::NewCodePeriod(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl DumpWriter for MemoryDumpWriter {
    fn write(&mut self, record: DumpRecord) -> Result<(), WriteError> {
        let kind = record.kind();
        let attempt = self.attempts.entry(kind).or_insert(0);
        *attempt += 1;
        if matches!(self.fail_at.get(&kind), Some(&nth) if *attempt >= nth) {
            return Err(WriteError::Rejected {
                kind,
                position: *attempt,
            });
        }
        self.records.entry(kind).or_default().push(record);
        Ok(())
    }

    fn written(&self, kind: DumpKind) -> u64 {
        self.records(kind).len() as u64
    }
}
