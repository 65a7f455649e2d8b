use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// The month view is a fixed 6x7 grid.
pub const GRID_CELLS: usize = 42;

/// One cell of the month grid. Transient; rebuilt on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CalendarDay {
    pub day: u32,
    pub is_current_month: bool,
    pub date: NaiveDate,
}

/// Builds the 42-cell grid for a month: leading days of the previous month
/// (oldest first) up to the weekday of the 1st (0 = Sunday), the month itself,
/// then days of the next month as padding. Returns an empty vector for an
/// invalid (year, month) pair.
pub fn month_grid(year: i32, month: u32) -> Vec<CalendarDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let mut cells = Vec::with_capacity(GRID_CELLS);

    let lead = i64::from(first.weekday().num_days_from_sunday());
    for offset in (1..=lead).rev() {
        let date = first - Duration::days(offset);
        cells.push(CalendarDay {
            day: date.day(),
            is_current_month: false,
            date,
        });
    }

    let mut date = first;
    while date.month() == month {
        cells.push(CalendarDay {
            day: date.day(),
            is_current_month: true,
            date,
        });
        date += Duration::days(1);
    }

    while cells.len() < GRID_CELLS {
        cells.push(CalendarDay {
            day: date.day(),
            is_current_month: false,
            date,
        });
        date += Duration::days(1);
    }

    cells
}

/// Month arithmetic with year carry, for the visible-month navigation arrows.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let new_year = zero_based.div_euclid(12);
    let new_month = zero_based.rem_euclid(12) + 1;
    (new_year as i32, new_month as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_in_month(year: i32, month: u32) -> u32 {
        let (next_year, next_month) = shift_month(year, month, 1);
        let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap();
        (first_next - Duration::days(1)).day()
    }

    #[test]
    fn every_month_yields_exactly_42_cells_with_contiguous_current_run() {
        for year in 2020..=2030 {
            for month in 1..=12 {
                let cells = month_grid(year, month);
                assert_eq!(cells.len(), GRID_CELLS, "{year}-{month}");

                let current: Vec<_> = cells.iter().filter(|c| c.is_current_month).collect();
                assert_eq!(current.len() as u32, days_in_month(year, month), "{year}-{month}");
                for (index, cell) in current.iter().enumerate() {
                    assert_eq!(cell.day, index as u32 + 1, "{year}-{month}");
                    assert_eq!(cell.date.month(), month, "{year}-{month}");
                }

                // Current-month cells form one contiguous block.
                let first_current = cells.iter().position(|c| c.is_current_month).unwrap();
                let last_current = cells.iter().rposition(|c| c.is_current_month).unwrap();
                assert_eq!(last_current - first_current + 1, current.len());
            }
        }
    }

    #[test]
    fn leading_cells_are_previous_month_days_oldest_first() {
        // January 2024 starts on a Monday: one leading cell, 2023-12-31.
        let cells = month_grid(2024, 1);
        assert_eq!(cells[0].day, 31);
        assert!(!cells[0].is_current_month);
        assert_eq!(cells[0].date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(cells[1].day, 1);
        assert!(cells[1].is_current_month);
    }

    #[test]
    fn maximum_lead_month_still_fits_in_42_cells() {
        // August 2026 starts on a Saturday: 6 leading + 31 + 5 trailing.
        let cells = month_grid(2026, 8);
        assert_eq!(cells.len(), GRID_CELLS);
        assert_eq!(cells.iter().filter(|c| !c.is_current_month).count(), 11);
        assert_eq!(cells[6].date, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        assert_eq!(cells[41].date, NaiveDate::from_ymd_opt(2026, 9, 5).unwrap());
    }

    #[test]
    fn zero_lead_month_pads_with_two_weeks_of_next_month() {
        // February 2026 starts on a Sunday: no leading cells, 28 + 14 trailing.
        let cells = month_grid(2026, 2);
        assert!(cells[0].is_current_month);
        assert_eq!(cells[0].day, 1);
        let trailing: Vec<_> = cells.iter().skip(28).collect();
        assert_eq!(trailing.len(), 14);
        for (index, cell) in trailing.iter().enumerate() {
            assert!(!cell.is_current_month);
            assert_eq!(cell.day, index as u32 + 1);
            assert_eq!(cell.date.month(), 3);
        }
    }

    #[test]
    fn leap_february_keeps_the_invariant() {
        let cells = month_grid(2024, 2);
        assert_eq!(cells.len(), GRID_CELLS);
        assert_eq!(cells.iter().filter(|c| c.is_current_month).count(), 29);
    }

    #[test]
    fn grid_is_referentially_transparent() {
        assert_eq!(month_grid(2025, 7), month_grid(2025, 7));
    }

    #[test]
    fn invalid_month_yields_no_cells() {
        assert!(month_grid(2024, 13).is_empty());
        assert!(month_grid(2024, 0).is_empty());
    }

    #[test]
    fn shift_month_wraps_year_boundaries() {
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 6, 18), (2025, 12));
        assert_eq!(shift_month(2024, 6, -18), (2022, 12));
        assert_eq!(shift_month(2024, 6, 0), (2024, 6));
    }
}
