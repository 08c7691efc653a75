use std::collections::BTreeMap;
use chrono::NaiveTime;
use crate::models::{Kpi, Mode, PriceRecord, SeriesPoint, Summary};

/// Summarizes raw price records into a chart ready series and its key figures
///
/// Malformed records (missing or non-finite price, missing time or date) are dropped,
/// never failing the whole computation. An empty series gives a summary without KPI.
///
/// # Arguments
///
/// * 'records' - raw records in chronological order as delivered by the API
/// * 'mode' - whether to keep hourly values or to aggregate to a daily average
pub fn summarize(records: &[PriceRecord], mode: Mode) -> Summary {
    let series = match mode {
        Mode::Hourly => hourly_series(records),
        Mode::DailyAverage => daily_average_series(records),
    };
    let kpi = kpi(&series);

    Summary { series, kpi }
}

/// Maps each record to a point labeled with its HH:MM, input order is preserved
///
/// # Arguments
///
/// * 'records' - raw hourly records
pub fn hourly_series(records: &[PriceRecord]) -> Vec<SeriesPoint> {
    records
        .iter()
        .filter_map(|r| {
            let label = hour_label(r.time_start()?)?;
            let price = r.price()?;
            Some(SeriesPoint { label, price })
        })
        .collect()
}

/// Groups records per date and returns the daily average price, ascending by date
///
/// # Arguments
///
/// * 'records' - raw historical records
pub fn daily_average_series(records: &[PriceRecord]) -> Vec<SeriesPoint> {
    let mut by_date: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for r in records {
        let (Some(date), Some(price)) = (r.date(), r.price()) else {
            continue;
        };
        if date.is_empty() {
            continue;
        }

        by_date
            .entry(date)
            .and_modify(|v| { v.0 += price; v.1 += 1; })
            .or_insert((price, 1));
    }

    by_date
        .into_iter()
        .map(|(date, (sum, n))| SeriesPoint {
            label: date.to_string(),
            price: round_to_three_decimals(sum / n as f64),
        })
        .collect()
}

/// Computes cheapest, priciest and average over a series
///
/// Ties on the extremes resolve to the first occurrence in series order.
///
/// # Arguments
///
/// * 'series' - the series to compute key figures for
pub fn kpi(series: &[SeriesPoint]) -> Option<Kpi> {
    let first = series.first()?;

    let mut cheapest = first;
    let mut priciest = first;
    let mut sum = 0.0;
    for p in series {
        if p.price < cheapest.price {
            cheapest = p;
        }
        if p.price > priciest.price {
            priciest = p;
        }
        sum += p.price;
    }

    Some(Kpi {
        cheapest: cheapest.clone(),
        priciest: priciest.clone(),
        average: round_to_three_decimals(sum / series.len() as f64),
    })
}

/// Extracts the wall clock HH:MM from an ISO-8601 timestamp without any timezone conversion
///
/// # Arguments
///
/// * 'time_start' - timestamp such as 2024-01-01T03:00:00+01:00
fn hour_label(time_start: &str) -> Option<String> {
    let hh_mm = time_start.get(11..16)?;
    let time = NaiveTime::parse_from_str(hh_mm, "%H:%M").ok()?;

    Some(time.format("%H:%M").to_string())
}

/// Rounds values to three decimals
///
/// # Arguments
///
/// * 'value' - the value to round to three decimals
pub fn round_to_three_decimals(value: f64) -> f64 {
    (value * 1000f64).round() / 1000f64
}
