use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

pub fn local_time(tz: &Tz) -> NaiveTime {
    now_in_timezone(tz).time()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_in_timezone_carries_the_zone() {
        let tz: Tz = "Asia/Ho_Chi_Minh".parse().unwrap();
        let now = now_in_timezone(&tz);
        assert_eq!(now.timezone(), tz);
    }

    #[test]
    fn today_matches_utc_for_utc_zone() {
        let tz = chrono_tz::UTC;
        assert_eq!(today_local(&tz), Utc::now().date_naive());
    }
}
