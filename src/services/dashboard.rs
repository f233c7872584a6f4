use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{repo_activity_point, user_contribution_day};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearHeatmap {
    pub year: i32,
    /// Every date of the year, days without data count as zero
    pub days: Vec<HeatmapDay>,
    pub max_count: i32,
    pub total_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityDay {
    pub day: NaiveDate,
    pub commits: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityChart {
    pub points: Vec<ActivityDay>,
    pub max_commits: i32,
}

/// Lay cached contribution days out over a full calendar year
pub fn year_heatmap(year: i32, rows: &[user_contribution_day::Model]) -> YearHeatmap {
    let counts: HashMap<NaiveDate, i32> = rows
        .iter()
        .filter(|row| row.day.year() == year)
        .map(|row| (row.day, row.count))
        .collect();

    let days: Vec<HeatmapDay> = NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|start| {
            start
                .iter_days()
                .take_while(|date| date.year() == year)
                .map(|date| HeatmapDay {
                    date,
                    count: counts.get(&date).copied().unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default();

    YearHeatmap {
        year,
        max_count: counts.values().copied().max().unwrap_or(0).max(1),
        total_count: counts.values().sum(),
        days,
    }
}

pub fn activity_chart(rows: &[repo_activity_point::Model]) -> ActivityChart {
    let points: Vec<ActivityDay> = rows
        .iter()
        .map(|row| ActivityDay {
            day: row.day,
            commits: row.commits,
        })
        .collect();

    ActivityChart {
        max_commits: points.iter().map(|p| p.commits).fold(1, i32::max),
        points,
    }
}
