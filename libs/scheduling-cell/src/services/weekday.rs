// libs/scheduling-cell/src/services/weekday.rs
//
// Single authority for the two weekday numbering systems in the data model.
// Office hours and provider availability are keyed Sunday-based (0 = Sunday
// .. 6 = Saturday); preferred windows are keyed Monday-based (1 = Monday ..
// 6 = Saturday) with no Sunday value at all, since offices never open Sunday.
// Looking a table up with the wrong system silently returns zero rows, so
// every call site must go through `reconcile`.

use chrono::{Datelike, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayNumbers {
    /// Sunday-based number used by office hours and provider availability.
    pub office_day: u32,
    /// Monday-based number used by preferred windows; `None` on Sunday,
    /// meaning no preferred-window lookup happens at all.
    pub preferred_day: Option<u32>,
}

pub fn reconcile(date: NaiveDate) -> WeekdayNumbers {
    let office_day = match date.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    };

    // Monday through Saturday coincide numerically; only Sunday diverges.
    let preferred_day = if office_day == 0 { None } else { Some(office_day) };

    WeekdayNumbers {
        office_day,
        preferred_day,
    }
}
