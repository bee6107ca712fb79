use crate::domain::model::{
    DateRange, FilterCriteria, Frequency, PeriodFilter, RawSelections, ReportId,
};
use crate::domain::records::ComplianceType;
use std::collections::{BTreeSet, HashMap};

/// Turns raw user selections into the normalized filter for one report.
///
/// Inputs that do not apply to the report (or to the selected sub-type's
/// frequency) are dropped, not just hidden.
#[derive(Debug, Clone, Default)]
pub struct FilterResolver {
    frequencies: HashMap<String, Option<Frequency>>,
}

impl FilterResolver {
    pub fn new(compliance_types: &[ComplianceType]) -> Self {
        Self {
            frequencies: compliance_types
                .iter()
                .map(|t| (t.id.clone(), t.frequency()))
                .collect(),
        }
    }

    pub fn frequency_of(&self, sub_type: &str) -> Option<Frequency> {
        self.frequencies.get(sub_type).copied().flatten()
    }

    pub fn resolve(&self, report: ReportId, raw: &RawSelections) -> FilterCriteria {
        let branch = normalize_branch(raw.branch.as_deref());

        let criteria = match report {
            ReportId::Employees | ReportId::Documents => FilterCriteria {
                branch,
                ..FilterCriteria::default()
            },
            ReportId::Leaves => {
                let range = DateRange {
                    from: raw.from,
                    to: raw.to,
                };
                FilterCriteria {
                    branch,
                    sub_type: normalize_text(raw.sub_type.as_deref()),
                    date_range: (!range.is_empty()).then_some(range),
                    ..FilterCriteria::default()
                }
            }
            ReportId::Compliance => self.resolve_compliance(branch, raw),
        };

        tracing::debug!("🔎 Resolved filter for {}: {:?}", report, criteria);
        criteria
    }

    fn resolve_compliance(&self, branch: Option<String>, raw: &RawSelections) -> FilterCriteria {
        let sub_type = normalize_text(raw.sub_type.as_deref());
        let year = normalize_text(raw.year.as_deref()).filter(|y| {
            let valid = y.len() == 4 && y.chars().all(|c| c.is_ascii_digit());
            if !valid {
                tracing::warn!("⚠️ Ignoring invalid year selection '{}'", y);
            }
            valid
        });
        let frequency = sub_type.as_deref().and_then(|s| self.frequency_of(s));

        let months: BTreeSet<String> = if frequency == Some(Frequency::Monthly) {
            raw.months.iter().filter_map(|m| normalize_month(m)).collect()
        } else {
            if !raw.months.is_empty() {
                tracing::debug!("Ignoring month selection for {:?} sub-type", frequency);
            }
            BTreeSet::new()
        };

        let quarters: BTreeSet<String> = if frequency == Some(Frequency::Quarterly) {
            raw.quarters.iter().filter_map(|q| normalize_quarter(q)).collect()
        } else {
            if !raw.quarters.is_empty() {
                tracing::debug!("Ignoring quarter selection for {:?} sub-type", frequency);
            }
            BTreeSet::new()
        };

        let period = year
            .as_deref()
            .and_then(|y| period_filter(y, frequency, &months, &quarters));

        FilterCriteria {
            branch,
            sub_type,
            date_range: None,
            year,
            months,
            quarters,
            period,
        }
    }
}

/// 依頻率建立期間識別碼條件；沒有勾選月份或季度時不限制期間
pub fn period_filter(
    year: &str,
    frequency: Option<Frequency>,
    months: &BTreeSet<String>,
    quarters: &BTreeSet<String>,
) -> Option<PeriodFilter> {
    let bucketed = |buckets: &BTreeSet<String>| {
        (!buckets.is_empty()).then(|| {
            PeriodFilter::AnyOf(buckets.iter().map(|b| format!("{}-{}", year, b)).collect())
        })
    };

    match frequency? {
        Frequency::Annual | Frequency::Weekly | Frequency::BiAnnual => {
            Some(PeriodFilter::Prefix(year.to_string()))
        }
        Frequency::Monthly => bucketed(months),
        Frequency::Quarterly => bucketed(quarters),
    }
}

fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn normalize_branch(value: Option<&str>) -> Option<String> {
    normalize_text(value).filter(|b| !b.eq_ignore_ascii_case("all"))
}

fn normalize_month(month: &str) -> Option<String> {
    match month.trim().parse::<u32>() {
        Ok(m @ 1..=12) => Some(format!("{:02}", m)),
        _ => {
            tracing::warn!("⚠️ Ignoring invalid month selection '{}'", month);
            None
        }
    }
}

fn normalize_quarter(quarter: &str) -> Option<String> {
    match quarter.trim().trim_start_matches(['Q', 'q']).parse::<u32>() {
        Ok(q @ 1..=4) => Some(format!("Q{}", q)),
        _ => {
            tracing::warn!("⚠️ Ignoring invalid quarter selection '{}'", quarter);
            None
        }
    }
}
