use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::SyntheticConfig;
use crate::models::PriceBar;

/// Closes never drop below this share of the base price.
const CLOSE_FLOOR_RATIO: f64 = 0.01;

fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The last `count` Monday-to-Friday dates on or before `end`, oldest first.
pub fn business_days_ending(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut day = end;

    while days.len() < count {
        if is_business_day(day) {
            days.push(day);
        }
        day = day - Duration::days(1);
    }

    days.reverse();
    days
}

/// Random walk around `config.base_price`: each close adds a standard normal
/// step scaled by `config.step_scale` to the previous one.
///
/// Open, high and low are fixed offsets of the close (99%, 101%, 98%).
pub fn generate_bars<R: Rng>(
    config: &SyntheticConfig,
    end: NaiveDate,
    rng: &mut R,
) -> Vec<PriceBar> {
    let floor = config.base_price * CLOSE_FLOOR_RATIO;

    business_days_ending(end, config.periods)
        .into_iter()
        .scan(0.0_f64, |walk, date| {
            let step: f64 = rng.sample(StandardNormal);
            *walk += step;

            let close = (config.base_price + *walk * config.step_scale).max(floor);

            Some(PriceBar {
                date,
                open: close * 0.99,
                high: close * 1.01,
                low: close * 0.98,
                close,
                volume: rng.random_range(config.volume_min..config.volume_max),
            })
        })
        .collect()
}

/// Synthetic bars ending today, drawn from the thread-local RNG.
pub fn generate_recent_bars(config: &SyntheticConfig) -> Vec<PriceBar> {
    generate_bars(config, Local::now().date_naive(), &mut rand::rng())
}
