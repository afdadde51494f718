// 📈 Trend Analyzer - Recent attendance rate, bucketed by day

use crate::models::AttendanceEntry;
use crate::stats::round2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_TREND_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Excellent,
    Good,
    Average,
    Poor,
    NoData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Excellent => "excellent",
            Trend::Good => "good",
            Trend::Average => "average",
            Trend::Poor => "poor",
            Trend::NoData => "no_data",
        }
    }
}

/// >= 95 excellent, >= 85 good, >= 75 average, otherwise poor
pub fn classify_rate(rate: f64) -> Trend {
    if rate >= 95.0 {
        Trend::Excellent
    } else if rate >= 85.0 {
        Trend::Good
    } else if rate >= 75.0 {
        Trend::Average
    } else {
        Trend::Poor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyCounts {
    pub present: usize,
    pub absent: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub period_days: usize,
    /// Distinct calendar days in the window
    pub total_days: usize,
    /// Present records in the window (may exceed `total_days` for team data)
    pub present_days: usize,
    pub attendance_rate: f64,
    pub trend: Trend,
    pub daily_breakdown: BTreeMap<String, DailyCounts>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoTrendData {
    pub trend: Trend,
    pub message: String,
}

/// Either a computed analysis or the bare `no_data` marker.
/// Serialized untagged: the `no_data` form carries no numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrendReport {
    Analysis(TrendAnalysis),
    NoData(NoTrendData),
}

impl TrendReport {
    pub fn trend(&self) -> Trend {
        match self {
            TrendReport::Analysis(a) => a.trend,
            TrendReport::NoData(n) => n.trend,
        }
    }

    pub fn analysis(&self) -> Option<&TrendAnalysis> {
        match self {
            TrendReport::Analysis(a) => Some(a),
            TrendReport::NoData(_) => None,
        }
    }
}

/// Analyze the trailing `days` entries (by ISO date order).
///
/// The rate divides present records by the number of distinct dates in the
/// window. A window of 0 keeps every entry.
pub fn get_attendance_trends(entries: &[AttendanceEntry], days: usize) -> TrendReport {
    if entries.is_empty() {
        return TrendReport::NoData(NoTrendData {
            trend: Trend::NoData,
            message: "No attendance data available".to_string(),
        });
    }

    let mut sorted: Vec<&AttendanceEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let skip = if days == 0 {
        0
    } else {
        sorted.len().saturating_sub(days)
    };

    let mut daily_breakdown: BTreeMap<String, DailyCounts> = BTreeMap::new();
    for entry in &sorted[skip..] {
        let counts = daily_breakdown.entry(entry.date.clone()).or_default();
        if entry.status.is_present() {
            counts.present += 1;
        } else {
            counts.absent += 1;
        }
    }

    let total_days = daily_breakdown.len();
    let present_days: usize = daily_breakdown.values().map(|c| c.present).sum();
    let rate = if total_days > 0 {
        present_days as f64 / total_days as f64 * 100.0
    } else {
        0.0
    };

    TrendReport::Analysis(TrendAnalysis {
        period_days: days,
        total_days,
        present_days,
        attendance_rate: round2(rate),
        trend: classify_rate(rate),
        daily_breakdown,
    })
}

// ============================================================================
// TESTS
// ============================================================================
