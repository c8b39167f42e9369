//! cron schedule parsing for schedule predicates
//!
//! supports the five-field form `minute hour day-of-month month day-of-week`
//! where each field is a comma list of:
//! - `*` or `*/step`
//! - a single value: `5`, `mon`, `jan`
//! - a range with optional step: `1-5`, `mon-fri`, `0-30/10`

/// one field of a cron expression, as the sorted set of values it admits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronField {
    pub values: Vec<u8>,
}

impl CronField {
    pub fn contains(&self, value: u8) -> bool {
        self.values.binary_search(&value).is_ok()
    }
}

/// a parsed five-field cron schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    pub minute: CronField,
    pub hour: CronField,
    pub day_of_month: CronField,
    pub month: CronField,
    pub day_of_week: CronField,
}

struct FieldSpec {
    name: &'static str,
    min: u8,
    max: u8,
    names: &'static [&'static str],
}

const MONTH_NAMES: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const DAY_NAMES: &[&str] = &["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

const FIELDS: [FieldSpec; 5] = [
    FieldSpec { name: "minute", min: 0, max: 59, names: &[] },
    FieldSpec { name: "hour", min: 0, max: 23, names: &[] },
    FieldSpec { name: "day of month", min: 1, max: 31, names: &[] },
    FieldSpec { name: "month", min: 1, max: 12, names: MONTH_NAMES },
    FieldSpec { name: "day of week", min: 0, max: 7, names: DAY_NAMES },
];

impl CronSchedule {
    /// parse a cron expression, returning a description of the first problem
    pub fn parse(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != FIELDS.len() {
            return Err(format!(
                "expected {} fields, got {}",
                FIELDS.len(),
                parts.len()
            ));
        }

        let mut fields = Vec::with_capacity(FIELDS.len());
        for (part, spec) in parts.iter().zip(FIELDS.iter()) {
            let field = parse_field(part, spec).ok_or_else(|| {
                format!("invalid {} field '{}'", spec.name, part)
            })?;
            fields.push(field);
        }

        let [minute, hour, day_of_month, month, mut day_of_week]: [CronField; 5] = fields
            .try_into()
            .map_err(|_| "expected 5 fields".to_string())?;

        // day of week 7 is sunday
        if day_of_week.contains(7) {
            day_of_week.values.retain(|v| *v != 7);
            if !day_of_week.contains(0) {
                day_of_week.values.insert(0, 0);
            }
        }

        Ok(Self {
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
        })
    }
}

fn parse_field(s: &str, spec: &FieldSpec) -> Option<CronField> {
    let mut values = Vec::new();

    for item in s.split(',') {
        let (range, step) = match item.split_once('/') {
            Some((range, step)) => {
                let step: u8 = step.parse().ok()?;
                if step == 0 {
                    return None;
                }
                (range, step)
            }
            None => (item, 1),
        };

        let (start, end) = if range == "*" {
            (spec.min, spec.max)
        } else if let Some((a, b)) = range.split_once('-') {
            let a = parse_value(a, spec)?;
            let b = parse_value(b, spec)?;
            if a > b {
                return None;
            }
            (a, b)
        } else {
            let v = parse_value(range, spec)?;
            // "5/10" means from 5 to the end in steps of 10
            if step > 1 {
                (v, spec.max)
            } else {
                (v, v)
            }
        };

        let mut v = start;
        while v <= end {
            values.push(v);
            match v.checked_add(step) {
                Some(next) => v = next,
                None => break,
            }
        }
    }

    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    values.dedup();
    Some(CronField { values })
}

fn parse_value(s: &str, spec: &FieldSpec) -> Option<u8> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let lower = s.to_lowercase();
    if let Some(pos) = spec.names.iter().position(|n| *n == lower) {
        // month names start at 1, day names at 0
        return Some(pos as u8 + spec.min);
    }

    let v: u8 = s.parse().ok()?;
    if v < spec.min || v > spec.max {
        return None;
    }
    Some(v)
}
